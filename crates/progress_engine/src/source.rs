use std::time::Duration;

use futures_util::StreamExt;
use progress_core::{dedupe_by_id, DetailKey, ProgressRecord};
use progress_logging::{progress_debug, progress_warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{EngineError, FailureKind, FetchError, SessionContext};

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Where progress records come from.
#[async_trait::async_trait]
pub trait ProgressSource: Send + Sync {
    /// All records of a client, in server order with repeated ids collapsed.
    async fn list(&self, client_key: &str) -> Result<Vec<ProgressRecord>, FetchError>;

    /// One record by client key and filename.
    async fn detail(&self, key: &DetailKey) -> Result<ProgressRecord, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestProgressSource {
    settings: SourceSettings,
    base_url: Url,
    session: SessionContext,
    client: reqwest::Client,
}

impl ReqwestProgressSource {
    pub fn new(settings: SourceSettings, session: SessionContext) -> Result<Self, EngineError> {
        let base_url = Url::parse(&settings.base_url).map_err(|err| EngineError::BaseUrl {
            url: settings.base_url.clone(),
            message: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::BaseUrl {
                url: settings.base_url.clone(),
                message: "cannot be a base".to_string(),
            });
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            session,
            client,
        })
    }

    /// `{base}/progress/{client_key}`, with the key percent-encoded as one segment.
    pub fn progress_url(&self, client_key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("progress").push(client_key);
        }
        url
    }

    pub fn detail_url(&self, key: &DetailKey) -> Url {
        let mut url = self.progress_url(&key.client_key);
        url.query_pairs_mut().append_pair("filename", &key.filename);
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        not_found_is_distinct: bool,
    ) -> Result<T, FetchError> {
        let token = self
            .session
            .token()
            .ok_or_else(|| FetchError::transport("no active session"))?;

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if not_found_is_distinct && status == StatusCode::NOT_FOUND {
            return Err(FetchError::new(FailureKind::NotFound, url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::Transport {
                    status: Some(status.as_u16()),
                },
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        progress_debug!("GET {} -> {} ({} bytes)", url, status, bytes.len());

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ProgressSource for ReqwestProgressSource {
    async fn list(&self, client_key: &str) -> Result<Vec<ProgressRecord>, FetchError> {
        let records: Vec<ProgressRecord> =
            self.get_json(self.progress_url(client_key), false).await?;
        let deduped = dedupe_by_id(records);
        if deduped.duplicates > 0 {
            progress_warn!(
                "Collapsed {} repeated record id(s) for client {}",
                deduped.duplicates,
                client_key
            );
        }
        Ok(deduped.records)
    }

    async fn detail(&self, key: &DetailKey) -> Result<ProgressRecord, FetchError> {
        self.get_json(self.detail_url(key), true).await
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::transport(format!(
        "response too large (max {max_bytes}, actual {actual})"
    ))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::transport(format!("timeout: {err}"));
    }
    FetchError::transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base: &str) -> ReqwestProgressSource {
        let settings = SourceSettings {
            base_url: base.to_string(),
            ..SourceSettings::default()
        };
        ReqwestProgressSource::new(settings, SessionContext::new()).unwrap()
    }

    #[test]
    fn urls_encode_key_and_filename() {
        let source = source("http://example.test/api/");
        let key = DetailKey::new("krn:clnt:demo company", "q3 report&final.csv");

        assert_eq!(
            source.progress_url("krn:clnt:demo-company").as_str(),
            "http://example.test/api/progress/krn:clnt:demo-company"
        );
        assert_eq!(
            source.detail_url(&key).as_str(),
            "http://example.test/api/progress/krn:clnt:demo%20company?filename=q3+report%26final.csv"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let settings = SourceSettings {
            base_url: "mailto:ops@example.test".to_string(),
            ..SourceSettings::default()
        };
        assert!(matches!(
            ReqwestProgressSource::new(settings, SessionContext::new()),
            Err(EngineError::BaseUrl { .. })
        ));
    }
}
