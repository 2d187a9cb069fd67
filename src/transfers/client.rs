use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

use super::model::{FilterMode, TransferPage, TransferResponse};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to transfer endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("transfer endpoint answered with HTTP status {0}")]
    Status(u16),
    #[error("transfer endpoint returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("transfer endpoint reported an unsuccessful query")]
    Rejected,
    #[error("base URL {0} cannot carry path segments")]
    InvalidBaseUrl(String),
}

pub trait TransferSource: Send + Sync {
    fn fetch(&self, address: &str, mode: FilterMode) -> Result<TransferPage, FetchError>;
}

pub struct HttpTransferSource {
    base_url: Url,
    client: Client,
}

impl HttpTransferSource {
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn endpoint_url(&self, address: &str, mode: FilterMode) -> Result<Url, FetchError> {
        endpoint_url(&self.base_url, address, mode)
    }
}

pub(crate) fn endpoint_url(base: &Url, address: &str, mode: FilterMode) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push("transfer-events")
        .push(address);
    url.query_pairs_mut()
        .clear()
        .append_pair("viewMode", mode.query_value());
    Ok(url)
}

impl TransferSource for HttpTransferSource {
    fn fetch(&self, address: &str, mode: FilterMode) -> Result<TransferPage, FetchError> {
        let url = self.endpoint_url(address, mode)?;
        debug!(%url, "requesting grouped transfers");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes()?;
        let parsed: TransferResponse = serde_json::from_slice(&body)?;
        if !parsed.success {
            return Err(FetchError::Rejected);
        }

        Ok(TransferPage {
            rows: parsed.data,
            pagination: parsed.pagination,
        })
    }
}
