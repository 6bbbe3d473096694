use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use sqlx::sqlite::SqliteJournalMode;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::analyzer::host::GlobalSettings;
use crate::analyzer::mafrepo::MafRepoProcedureAnalyzer;
use crate::analyzer::MAFREPO_URL_SETTING;
use crate::catalog::repository::RepositoryStore;
use crate::repository::interface::tests::SEED_STATEMENTS;
use crate::repository::interface::Repository;
use crate::repository::sqlite::SqliteRepository;

/// In-memory SQLite with the catalogue fixture: OS.MolDokumentation → 1011,
/// OS.MolGenErgebnis → 1021, OS.MolDiagFusionChromosome → 1031, OS.Molekulargenetik → 1041
pub async fn seeded_sqlite_repository() -> Arc<dyn Repository> {
    let repository =
        SqliteRepository::try_new("sqlite::memory:".to_string(), SqliteJournalMode::Wal)
            .await
            .unwrap();

    for statement in SEED_STATEMENTS {
        sqlx::query(statement)
            .execute(&repository.executor)
            .await
            .unwrap();
    }

    Arc::new(repository)
}

/// The EGFR finding used throughout the tests: everything but chromosome, symbol,
/// positions, depth and frequency is null
pub fn egfr_variant() -> Value {
    json!({
        "tumorSampleBarcode": null,
        "hugoSymbol": "EGFR",
        "chromosome": "7",
        "gene": null,
        "startPosition": 55019017,
        "endPosition": 55019017,
        "referenceAllele": null,
        "tumorSeqAllele2": null,
        "hgvsc": null,
        "hgvsp": null,
        "exon": null,
        "tdepth": 1234,
        "dbSnpRs": null,
        "panel": null,
        "allelicFrequency": 0.45,
        "cosmicId": null,
        "interpretation": null,
        "hgncId": null,
        "geneName": null,
        "nmNumber": null
    })
}

pub fn kras_variant() -> Value {
    json!({
        "tumorSampleBarcode": "H0815-23",
        "hugoSymbol": "KRAS",
        "chromosome": "12",
        "gene": "ENSG00000133703",
        "startPosition": 25245350,
        "endPosition": 25245350,
        "referenceAllele": "C",
        "tumorSeqAllele2": "A",
        "hgvsc": "c.35G>T",
        "hgvsp": "p.G12V",
        "exon": "2/6",
        "tdepth": 812,
        "dbSnpRs": "rs121913529",
        "panel": "TruSight Oncology 500",
        "allelicFrequency": 0.123456,
        "cosmicId": "COSM520",
        "interpretation": "pathogen",
        "hgncId": "HGNC:6407",
        "geneName": "KRAS proto-oncogene, GTPase",
        "nmNumber": "NM_004985.5"
    })
}

/// MAF repository stand-in answering `GET {request_path}` with `body`
pub async fn make_mock_mafrepo(request_path: &str, body: Value) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(request_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    mock_server
}

/// Analyzer against the seeded SQLite catalogue, with `mafrepo_url` set to `mafrepo_url`
pub async fn make_analyzer(mafrepo_url: Option<String>) -> MafRepoProcedureAnalyzer {
    let settings = GlobalSettings::new(
        mafrepo_url
            .map(|url| HashMap::from([(MAFREPO_URL_SETTING.to_string(), url)]))
            .unwrap_or_default(),
    );

    MafRepoProcedureAnalyzer::new(
        Arc::new(settings),
        Arc::new(RepositoryStore {
            repository: seeded_sqlite_repository().await,
        }),
        reqwest::Client::new(),
    )
}

/// Formatted log output of the events recorded while a `capture_logs` guard is alive
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Record the current thread's log events until the guard is dropped. `#[tokio::test]`
/// runs on a single thread, so async code under test is covered too.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    (logs, tracing::subscriber::set_default(subscriber))
}
