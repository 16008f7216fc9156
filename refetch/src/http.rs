//! Default transport backed by `reqwest`.
//!
//! The client is built without an overall request timeout: the fetcher
//! bounds every attempt itself and drops the request future when the
//! deadline passes, which aborts the underlying connection.
use crate::transport::{
    Transport, TransportError, TransportRequest, TransportResponse,
};
use async_trait::async_trait;
use std::time::Duration;

/// Parameters for configuring the HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientParams {
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientParams {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("refetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Builds a `reqwest::Client` with rustls, connect timeout and user agent.
pub fn build_http_client(
    params: &HttpClientParams,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .use_rustls_tls()
        .connect_timeout(params.connect_timeout)
        .user_agent(params.user_agent.as_str())
        .build()
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::from_params(&HttpClientParams::default())
    }

    pub fn from_params(params: &HttpClientParams) -> Result<Self, TransportError> {
        let client = build_http_client(params)
            .map_err(|e| TransportError::Other(Box::new(e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        let body = if status.is_success() {
            response.bytes().await.map_err(map_reqwest_error)?.to_vec()
        } else {
            // Diagnostic only, a failed read leaves it empty.
            response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .unwrap_or_default()
        };

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::TimedOut
    } else if e.is_connect() {
        TransportError::Connect(Box::new(e))
    } else if e.is_body() || e.is_decode() {
        TransportError::Body(Box::new(e))
    } else {
        TransportError::Other(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        let client = build_http_client(&HttpClientParams::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_custom_params() {
        let params = HttpClientParams {
            connect_timeout: Duration::from_secs(2),
            user_agent: "test-agent/1.0".to_string(),
        };
        assert!(ReqwestTransport::from_params(&params).is_ok());
    }

    #[test]
    fn test_default_user_agent() {
        let params = HttpClientParams::default();
        assert!(params.user_agent.starts_with("refetch/"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new().unwrap();
        let request = TransportRequest {
            url: format!("http://{addr}/"),
            headers: vec![],
        };

        let err = transport.request(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)), "{err:?}");
    }
}
