use reqwest::Url;

use crate::error::{AppError, Result};

/// Root of the IEX 1.0 REST API.
pub const IEX_BASE_URL: &str = "https://api.iextrading.com/1.0/";

/// Immutable connection settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub fn builtin() -> Self {
        Self {
            base_url: IEX_BASE_URL.to_string(),
        }
    }

    /// Point the client at another host, e.g. a sandbox or a local mock server.
    ///
    /// The address must be an absolute http or https URL with a host and no
    /// query or fragment; a trailing slash is appended to the path when missing
    /// so endpoint paths can be joined directly.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let raw = base_url.into();
        let mut url = Url::parse(raw.trim()).map_err(|_| AppError::InvalidBaseUrl(raw.clone()))?;

        let usable = matches!(url.scheme(), "http" | "https")
            && !url.cannot_be_a_base()
            && url.host_str().is_some_and(|host| !host.is_empty())
            && url.query().is_none()
            && url.fragment().is_none();
        if !usable {
            return Err(AppError::InvalidBaseUrl(raw));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path (with or without a leading slash) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
