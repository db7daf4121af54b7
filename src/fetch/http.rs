use reqwest::blocking::Client;

use super::{FetchResult, Transport};
use crate::error::Context;

/// `Transport` backed by a blocking reqwest client.
///
/// No timeout or retry policy is layered on top; failures surface on the first attempt.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to construct blocking HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &str) -> FetchResult<String> {
        log::debug!("GET {url}");

        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.text()?;

        log::debug!("GET {url} returned {} bytes", body.len());
        Ok(body)
    }
}
