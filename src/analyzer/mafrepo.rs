use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::analyzer::host::HostApi;
use crate::analyzer::{
    AnalyzerError, AnalyzerRequirement, AnalyzerResult, Disease, PluginType, Procedure,
    ProcedureAnalyzer, MAFREPO_URL_SETTING, NO_SAMPLE_ID,
};
use crate::catalog::{CatalogStore, VersionResolver};
use crate::data_types::OutputRecord;
use crate::mapping::map_variants;
use crate::remote::MafRepoClient;

pub const PLUGIN_NAME: &str = "MafRepoProcedureAnalyzer";
pub const PLUGIN_VERSION: &str = "0.1.0";
pub const PLUGIN_DESCRIPTION: &str = "Backend Service für das MAF-Repo";

pub const SAMPLE_ID_KEY: &str = "sampleId";

/// Backend service plugin fetching simple variants for a sample from the MAF repository
/// and returning them as documentation form values.
pub struct MafRepoProcedureAnalyzer {
    host: Arc<dyn HostApi>,
    versions: VersionResolver,
    http_client: reqwest::Client,
}

impl MafRepoProcedureAnalyzer {
    pub fn new(
        host: Arc<dyn HostApi>,
        catalog: Arc<dyn CatalogStore>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            host,
            versions: VersionResolver::new(catalog),
            http_client,
        }
    }

    /// Plugin method `requestSimpleVariants`: `input` is the argument object the form
    /// script passes in, `{"sampleId": "..."}`.
    pub async fn request_simple_variants(
        &self,
        input: &Map<String, Value>,
    ) -> AnalyzerResult<Vec<OutputRecord>> {
        let sample_id = sample_id(input)?;

        let mafrepo_url = self
            .host
            .get_global_setting(MAFREPO_URL_SETTING)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AnalyzerError::ConfigurationMissing {
                key: MAFREPO_URL_SETTING.to_string(),
            })?;

        let client = MafRepoClient::try_new(self.http_client.clone(), mafrepo_url.trim())?;
        let records = client.fetch_variants(&sample_id).await?;
        info!(
            "Received {} simple variants for sample {sample_id:?}",
            records.len()
        );

        Ok(map_variants(records, &self.versions).await?)
    }
}

fn sample_id(input: &Map<String, Value>) -> AnalyzerResult<String> {
    let sample_id = match input.get(SAMPLE_ID_KEY) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        other => {
            debug!("Unusable {SAMPLE_ID_KEY} in plugin method input: {other:?}");
            String::new()
        }
    };

    if sample_id.is_empty() {
        return Err(AnalyzerError::InvalidInput {
            reason: NO_SAMPLE_ID.to_string(),
        });
    }

    Ok(sample_id)
}

impl ProcedureAnalyzer for MafRepoProcedureAnalyzer {
    fn plugin_type(&self) -> PluginType {
        PluginType::BackendService
    }

    fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    fn name(&self) -> &str {
        PLUGIN_DESCRIPTION
    }

    fn description(&self) -> &str {
        PLUGIN_DESCRIPTION
    }

    fn is_relevant_for_deleted_procedure(&self) -> bool {
        false
    }

    fn is_relevant_for_analyzer(&self, _procedure: &Procedure, _disease: &Disease) -> bool {
        false
    }

    fn analyze(&self, _procedure: &Procedure, _disease: &Disease) {}

    fn is_synchronous(&self) -> bool {
        false
    }

    fn requirement(&self) -> AnalyzerRequirement {
        AnalyzerRequirement::Procedure
    }
}
