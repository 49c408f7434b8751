use reqwest::{Client as HttpClient, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::models::{ApiError, ErrorResponse};
use crate::api::PriceSource;
use crate::models::{empty_document, Document};

/// CoinGecko market-chart client bound to a single endpoint
pub struct CoinGeckoClient {
    http_client: HttpClient,
    url: String,
}

impl CoinGeckoClient {
    pub const DEFAULT_URL: &'static str =
        "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=5";

    /// Create a client that requests `url` through the given HTTP client
    pub fn new(http_client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Turn a non-success response into an [`ApiError`]
    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body_text)
            .ok()
            .and_then(|e| e.message())
            .unwrap_or(body_text);

        match status_code {
            429 => {
                warn!("Rate limited by market-data API: {}", message);
                ApiError::RateLimited(message)
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, message);
                ApiError::ServerError(status_code, message)
            }
            _ => ApiError::HttpError(status_code, message),
        }
    }

    /// Issue the request and parse the body as a JSON object
    pub async fn try_fetch(&self, method: Method) -> Result<Document, ApiError> {
        debug!("{} {}", method, self.url);

        let response = self
            .http_client
            .request(method, &self.url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        match body {
            Value::Object(document) => Ok(document),
            other => Err(ApiError::DeserializationError(format!(
                "Expected a JSON object, got {}",
                other
            ))),
        }
    }
}

impl PriceSource for CoinGeckoClient {
    /// Fetch the document, reporting any failure and returning an empty one
    async fn fetch(&self, method: Method) -> Document {
        match self.try_fetch(method).await {
            Ok(document) => {
                debug!("Fetched document with {} top-level keys", document.len());
                document
            }
            Err(e) => {
                println!("Request error: {}", e);
                error!("Request error: {}", e);
                empty_document()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> CoinGeckoClient {
        CoinGeckoClient::new(HttpClient::new(), format!("{}/market_chart", server.uri()))
    }

    #[tokio::test]
    async fn test_fetch_returns_document() {
        let server = MockServer::start().await;
        let body = json!({
            "prices": [[1700000000000i64, 37000.5], [1700000300000i64, 37010.25]],
            "market_caps": [],
            "total_volumes": []
        });
        Mock::given(method("GET"))
            .and(path("/market_chart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let document = client.fetch(Method::GET).await;

        assert_eq!(Value::Object(document), body);
    }

    #[tokio::test]
    async fn test_http_errors_yield_empty_document() {
        for status in [404u16, 429, 500] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                    "status": {"error_code": status, "error_message": "nope"}
                })))
                .mount(&server)
                .await;

            let client = client_for(&server).await;
            assert!(client.fetch(Method::GET).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_error_classification() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "status": {"error_code": 429, "error_message": "You've exceeded the Rate Limit"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        match client.try_fetch(Method::GET).await {
            Err(ApiError::RateLimited(msg)) => assert_eq!(msg, "You've exceeded the Rate Limit"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_object_body_yields_empty_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(
            client.try_fetch(Method::GET).await,
            Err(ApiError::DeserializationError(_))
        ));
        assert!(client.fetch(Method::GET).await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_yields_empty_document() {
        // Nothing listens on port 1
        let client = CoinGeckoClient::new(HttpClient::new(), "http://127.0.0.1:1/market_chart");

        assert!(matches!(
            client.try_fetch(Method::GET).await,
            Err(ApiError::RequestError(_))
        ));
        assert!(client.fetch(Method::GET).await.is_empty());
    }
}
