use crate::error::TallyError;
use crate::types::FrequencyMap;
use std::future::Future;

/// Transport seam for the worker protocol: one document identifier out, one
/// word -> count mapping back. Non-success responses and transport errors
/// both surface as `TallyError::Worker`, which is fatal for the run.
pub trait WorkerClient: Clone + Send + Sync + 'static {
    fn fetch_counts(
        &self,
        address: &str,
        document: &str,
    ) -> impl Future<Output = Result<FrequencyMap, TallyError>> + Send;
}

/// HTTP implementation: POSTs the document identifier as a JSON string and
/// expects a JSON object of word counts back.
#[derive(Clone)]
pub struct HttpWorkerClient {
    client: reqwest::Client,
}

impl HttpWorkerClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpWorkerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerClient for HttpWorkerClient {
    fn fetch_counts(
        &self,
        address: &str,
        document: &str,
    ) -> impl Future<Output = Result<FrequencyMap, TallyError>> + Send {
        let request = self.client.post(address).json(&document);
        let address = address.to_string();
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| TallyError::Worker(format!("request to {} failed: {}", address, e)))?;
            let status = response.status();
            if !status.is_success() {
                return Err(TallyError::Worker(format!(
                    "worker {} returned {}",
                    address, status
                )));
            }
            response
                .json::<FrequencyMap>()
                .await
                .map_err(|e| TallyError::Worker(format!("bad response body from {}: {}", address, e)))
        }
    }
}
