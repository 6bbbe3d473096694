//! Client for the MAF repository's simple variant endpoint
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;
use url::Url;

use crate::data_types::VariantRecord;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("No SampleID given!")]
    EmptySampleId,

    #[error("Invalid SampleID {sample_id:?}")]
    InvalidSampleId { sample_id: String },

    #[error("Invalid MAF repository URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("MAF repository responded with {status} for {url}")]
    UnexpectedStatus { status: StatusCode, url: Url },

    #[error("Failed parsing simple variants: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

pub type FetchResult<T, E = FetchError> = Result<T, E>;

#[derive(Debug, Clone)]
pub struct MafRepoClient {
    client: Client,
    base_url: Url,
}

impl MafRepoClient {
    pub fn try_new(client: Client, base_url: &str) -> FetchResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| FetchError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL can't have path segments appended".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// `{base_url}/samples/{sample_id}/simplevariants`, with the sample id percent-encoded
    /// as a single path segment
    pub fn simple_variants_url(&self, sample_id: &str) -> FetchResult<Url> {
        if sample_id.is_empty() {
            return Err(FetchError::EmptySampleId);
        }
        // Dot segments would be normalized away instead of encoded
        if sample_id == "." || sample_id == ".." {
            return Err(FetchError::InvalidSampleId {
                sample_id: sample_id.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL can't have path segments appended".to_string(),
            })?
            .pop_if_empty()
            .extend(["samples", sample_id, "simplevariants"]);

        Ok(url)
    }

    fn request_builder(&self, url: Url) -> RequestBuilder {
        self.client
            .get(url)
            .header("User-Agent", format!("mafrepo/{}", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/json")
    }

    /// Single GET, no retries. Records come back in the order the repository sent them.
    pub async fn fetch_variants(&self, sample_id: &str) -> FetchResult<Vec<VariantRecord>> {
        let url = self.simple_variants_url(sample_id)?;
        debug!("Requesting simple variants from {url}");

        let response = self.request_builder(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus { status, url });
        }

        let body = response.bytes().await?;
        let records: Vec<VariantRecord> = serde_json::from_slice(&body)?;

        debug!("Received {} simple variants for {url}", records.len());
        Ok(records)
    }
}
