use super::SourceError;
use reqwest::blocking::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Blocking HTTP GET access to the registry
pub trait Transport {
    fn get_text(&self, url: &str) -> Result<String, SourceError>;

    /// Whole response body.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_text(&self, url: &str) -> Result<String, SourceError> {
        (**self).get_text(url)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        (**self).get_bytes(url)
    }
}

/// `reqwest` blocking client without a request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .user_agent(concat!("cnpj2parquet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Response, SourceError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| http_error(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Transport for HttpTransport {
    fn get_text(&self, url: &str) -> Result<String, SourceError> {
        self.get(url)?
            .text()
            .map_err(|source| http_error(url, source))
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let body = self
            .get(url)?
            .bytes()
            .map_err(|source| http_error(url, source))?;
        Ok(body.to_vec())
    }
}

fn http_error(url: &str, source: reqwest::Error) -> SourceError {
    SourceError::Http {
        url: url.to_string(),
        source,
    }
}
