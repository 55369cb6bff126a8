//! Blocking HTTP client for the component registry.
//!
//! Requests are issued one at a time with a hard global deadline. Transport
//! failures become network errors, with timeouts reported separately; any
//! answer from the server that we cannot use becomes a registry error.
use super::schema::{parse_component, parse_index};
use super::{ComponentDefinition, ManifestIndex, Registry};
use crate::error::{PdfxError, Result};
use std::time::{Duration, Instant};

/// Deadline applied to each registry request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("pdfx/", env!("CARGO_PKG_VERSION"));

/// Registry served over HTTP at `{base}/index.json` and `{base}/{name}.json`.
pub struct HttpRegistry {
    agent: ureq::Agent,
    base_url: String,
    timeout: Duration,
}

impl HttpRegistry {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}/index.json", self.base_url)
    }

    pub fn component_url(&self, name: &str) -> String {
        format!("{}/{name}.json", self.base_url)
    }

    fn get_text(&self, url: &str) -> Result<String> {
        let start = Instant::now();
        tracing::debug!(url, "registry request");
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| self.transport_error(url, err))?;

        let status = response.status();
        if !status.is_success() {
            let err = PdfxError::registry(format!(
                "registry returned HTTP {} for {url}",
                status.as_u16()
            ));
            return Err(if status.as_u16() == 404 {
                err.with_suggestion("check the registry URL in pdfx.json")
            } else {
                err
            });
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| self.transport_error(url, err))?;

        tracing::info!(
            url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "registry fetch complete"
        );
        Ok(body)
    }

    fn transport_error(&self, url: &str, err: ureq::Error) -> PdfxError {
        match err {
            ureq::Error::Timeout(_) => self.timeout_error(url),
            ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
                self.timeout_error(url)
            }
            ureq::Error::StatusCode(code) => {
                PdfxError::registry(format!("registry returned HTTP {code} for {url}"))
            }
            ureq::Error::BodyExceedsLimit(limit) => PdfxError::registry(format!(
                "registry response from {url} exceeds {limit} bytes"
            )),
            ureq::Error::BadUri(reason) => {
                PdfxError::config(format!("invalid registry URL {url}: {reason}"))
                    .with_suggestion("set \"registry\" in pdfx.json to a full http(s) URL")
            }
            other => PdfxError::network(format!("could not reach registry at {url}: {other}"))
                .with_suggestion("check your network connection and the registry URL"),
        }
    }

    fn timeout_error(&self, url: &str) -> PdfxError {
        PdfxError::network(format!(
            "request to {url} timed out after {}s",
            self.timeout.as_secs_f32()
        ))
        .with_suggestion("the registry may be slow or unreachable; retry or raise --timeout")
    }
}

impl Registry for HttpRegistry {
    fn fetch_index(&self) -> Result<ManifestIndex> {
        let url = self.index_url();
        let text = self.get_text(&url)?;
        parse_index(&text, &url)
    }

    fn fetch_component(&self, name: &str) -> Result<ComponentDefinition> {
        let url = self.component_url(name);
        let text = self.get_text(&url)?;
        parse_component(&text, name, &url)
    }
}
