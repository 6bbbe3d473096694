//! The adapter's face towards the host platform: plugin metadata, the (inert) procedure
//! analysis hooks and the `requestSimpleVariants` plugin method.

use crate::mapping::MappingError;
use crate::remote::FetchError;

pub mod host;
pub mod mafrepo;

/// Global setting holding the MAF repository's base URL
pub const MAFREPO_URL_SETTING: &str = "mafrepo_url";

pub const NO_SAMPLE_ID: &str = "No SampleID given!";

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("{reason}")]
    InvalidInput { reason: String },

    #[error("Einstellung '{key}' nicht vorhanden")]
    ConfigurationMissing { key: String },

    #[error("Einstellung '{key}' ungültig: {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("Error requesting simple variants: {0}")]
    RemoteServiceError(FetchError),

    #[error("Simple variant is missing required field {field:?}")]
    MissingRequiredField { field: &'static str },
}

pub type AnalyzerResult<T, E = AnalyzerError> = Result<T, E>;

impl From<FetchError> for AnalyzerError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::EmptySampleId => AnalyzerError::InvalidInput {
                reason: NO_SAMPLE_ID.to_string(),
            },
            FetchError::InvalidSampleId { .. } => AnalyzerError::InvalidInput {
                reason: err.to_string(),
            },
            FetchError::InvalidBaseUrl { reason, .. } => {
                AnalyzerError::InvalidConfiguration {
                    key: MAFREPO_URL_SETTING.to_string(),
                    reason,
                }
            }
            e => AnalyzerError::RemoteServiceError(e),
        }
    }
}

impl From<MappingError> for AnalyzerError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::MissingRequiredField { field } => {
                AnalyzerError::MissingRequiredField { field }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginType {
    Analyzer,
    BackendService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerRequirement {
    Procedure,
    ProcedureWithDisease,
}

/// The parts of a host procedure (form instance) an analyzer gets to see
#[derive(Debug, Clone, Default)]
pub struct Procedure {
    pub id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct Disease {
    pub id: i64,
}

/// Lifecycle contract the host runtime imposes on plugins.
pub trait ProcedureAnalyzer: Send + Sync {
    fn plugin_type(&self) -> PluginType;

    fn version(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn is_relevant_for_deleted_procedure(&self) -> bool;

    fn is_relevant_for_analyzer(&self, procedure: &Procedure, disease: &Disease) -> bool;

    fn analyze(&self, procedure: &Procedure, disease: &Disease);

    fn is_synchronous(&self) -> bool;

    fn requirement(&self) -> AnalyzerRequirement;
}
