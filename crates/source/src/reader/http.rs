//! HTTP(S) source reader, for scrapers that look metadata up online.

use crate::error::{ErrorKind, Result};
use crate::reader::SourceReader;
use exn::ResultExt;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::instrument;

/// Blocking HTTP reader.
///
/// A `404 Not Found` maps to [`ErrorKind::NotFound`] so that a missing
/// remote page is treated like a missing sidecar file; every other
/// non-success status is a (retryable) [`ErrorKind::Network`] error.
pub struct HttpReader {
    name: String,
    client: Client,
}
impl HttpReader {
    pub fn new(name: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .or_raise(|| ErrorKind::Network("failed to construct HTTP client".to_string()))?;
        Ok(Self {
            name: name.into(),
            client,
        })
    }
}
impl SourceReader for HttpReader {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(reader = %self.name, status))]
    fn read(&self, reference: &str) -> Result<String> {
        let response = self
            .client
            .get(reference)
            .send()
            .or_raise(|| ErrorKind::Network(reference.to_string()))?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());
        if status == StatusCode::NOT_FOUND {
            exn::bail!(ErrorKind::NotFound(reference.to_string()));
        }
        if !status.is_success() {
            exn::bail!(ErrorKind::Network(format!("{reference} responded with {status}")));
        }
        let body = response.bytes().or_raise(|| ErrorKind::Network(reference.to_string()))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
