use serde::{Deserialize, Serialize};

pub type CatalogVersionId = i64;

/// Version id handed out when a catalog version can't be resolved. Indistinguishable
/// from a genuine version 0.
pub const UNRESOLVED_CATALOG_VERSION: CatalogVersionId = 0;

/// A single simple variant as returned by the MAF repository
/// (`GET /samples/{sampleId}/simplevariants`).
///
/// Every field is optional: missing JSON keys and explicit nulls both end up as `None`,
/// unknown keys are ignored. Scalars are coerced the way the repository's own clients
/// read them: numbers and booleans are accepted for text fields, numeric strings for
/// number fields.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub tumor_sample_barcode: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub hugo_symbol: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub chromosome: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub gene: Option<String>,
    #[serde(deserialize_with = "lenient::integer")]
    pub start_position: Option<i64>,
    #[serde(deserialize_with = "lenient::integer")]
    pub end_position: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub reference_allele: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub tumor_seq_allele2: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub hgvsc: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub hgvsp: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub exon: Option<String>,
    #[serde(deserialize_with = "lenient::integer")]
    pub tdepth: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub db_snp_rs: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub panel: Option<String>,
    #[serde(deserialize_with = "lenient::float")]
    pub allelic_frequency: Option<f64>,
    #[serde(deserialize_with = "lenient::string")]
    pub cosmic_id: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub interpretation: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub hgnc_id: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub gene_name: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub nm_number: Option<String>,
}

mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value @ (Value::Array(_) | Value::Object(_))) => Err(D::Error::custom(
                format!("expected a scalar, found {value}"),
            )),
            value => Ok(value),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match scalar(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
            None => None,
        })
    }

    /// Fractional numbers are truncated, blank strings read as missing
    pub fn integer<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match scalar(deserializer)? {
            None => Ok(None),
            Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Some(i)),
                (None, Some(f)) if f.is_finite() && f.abs() < i64::MAX as f64 => {
                    Ok(Some(f.trunc() as i64))
                }
                _ => Err(D::Error::custom(format!("integer out of range: {n}"))),
            },
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected an integer, found {s:?}"))),
            Some(other) => Err(D::Error::custom(format!(
                "expected an integer, found {other}"
            ))),
        }
    }

    pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match scalar(deserializer)? {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected a number, found {n}"))),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, found {s:?}"))),
            Some(other) => Err(D::Error::custom(format!(
                "expected a number, found {other}"
            ))),
        }
    }
}

/// A catalog-backed field value, pinned to the catalog version it was taken from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub val: String,
    pub version: CatalogVersionId,
}

impl VersionedValue {
    pub fn new(val: impl Into<String>, version: CatalogVersionId) -> Self {
        Self {
            val: val.into(),
            version,
        }
    }
}

/// Documentation fields of a single molecular genetics finding, keyed by the
/// field names of the documentation form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    #[serde(rename = "Dokumentation")]
    pub dokumentation: VersionedValue,
    #[serde(rename = "Ergebnis")]
    pub ergebnis: VersionedValue,
    #[serde(rename = "EVChromosom")]
    pub ev_chromosom: VersionedValue,
    #[serde(rename = "Untersucht")]
    pub untersucht: VersionedValue,
    #[serde(rename = "cDNANomenklatur")]
    pub cdna_nomenklatur: String,
    #[serde(rename = "ProteinebeneNomenklatur")]
    pub proteinebene_nomenklatur: String,
    #[serde(rename = "ExonInt")]
    pub exon_int: String,
    #[serde(rename = "ExonText")]
    pub exon_text: String,
    #[serde(rename = "EVENSEMBLID")]
    pub ev_ensembl_id: String,
    #[serde(rename = "EVHGNCID")]
    pub ev_hgnc_id: String,
    #[serde(rename = "EVHGNCSymbol")]
    pub ev_hgnc_symbol: String,
    #[serde(rename = "EVHGNCName")]
    pub ev_hgnc_name: String,
    #[serde(rename = "EVStart")]
    pub ev_start: String,
    #[serde(rename = "EVEnde")]
    pub ev_ende: String,
    #[serde(rename = "EVAltNucleotide")]
    pub ev_alt_nucleotide: String,
    #[serde(rename = "EVRefNucleotide")]
    pub ev_ref_nucleotide: String,
    #[serde(rename = "EVNMNummer")]
    pub ev_nm_nummer: String,
    #[serde(rename = "Coverage")]
    pub coverage: String,
    #[serde(rename = "Allelfrequenz")]
    pub allelfrequenz: String,
    #[serde(rename = "EVdbSNPID")]
    pub ev_dbsnp_id: String,
}
