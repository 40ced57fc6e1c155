use crate::http::{
    backend::HttpBackend,
    credential::{CredentialSource, NoCredential},
    error::HttpError,
    request::{HttpRequest, RequestConfig},
    response::{handle_response, HttpResponse, Payload},
};
use std::sync::Arc;

/// HTTP client generic over backend
///
/// Resolves the content type and headers for a call, form-encodes the body
/// of non-GET requests, performs one round-trip through the backend and
/// decodes the response by its declared content type. Non-2xx responses come
/// back as [`HttpError::Rejected`] carrying the decoded body.
///
/// # Examples
///
/// ```
/// use fetchit::http::{Client, ReqwestBackend, RequestConfig, StaticToken};
/// use http::Method;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new(ReqwestBackend).with_credentials(StaticToken::new("secret"));
///
/// let items = client.get("https://api.example.com/items").await?;
/// println!("{items}");
///
/// let created = client
///     .send(
///         "https://api.example.com/items",
///         RequestConfig::new()
///             .method(Method::POST)
///             .body(serde_json::json!({"name": "widget"})),
///     )
///     .await?;
/// println!("{created}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client<B: HttpBackend + Send + Sync> {
    pub backend: B,
    credentials: Arc<dyn CredentialSource + Send + Sync>,
}

impl<B: HttpBackend + Send + Sync> Client<B> {
    /// Constructs a new Client with the given backend and no fallback credential
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            credentials: Arc::new(NoCredential),
        }
    }

    /// Use `source` for the `token` header whenever a call does not set one
    pub fn with_credentials<C>(mut self, source: C) -> Self
    where
        C: CredentialSource + Send + Sync + 'static,
    {
        self.credentials = Arc::new(source);
        self
    }

    /// Build the request `send` would issue, without touching the network
    pub fn prepare(&self, url: &str, config: &RequestConfig) -> Result<HttpRequest, HttpError> {
        if url.trim().is_empty() {
            return Err(HttpError::InvalidUrl("URL cannot be empty".to_string()));
        }
        let fallback = match config.token {
            Some(_) => None,
            None => self.credentials.token(),
        };
        let headers = config.resolve_headers(fallback)?;
        Ok(HttpRequest::new(
            url,
            config.resolve_method(),
            config.serialized_body(),
            headers,
        ))
    }

    /// Send a request and decode the response
    ///
    /// Fails with [`HttpError::Network`] when the transport fails and with
    /// [`HttpError::Rejected`] when the status is outside 2xx.
    pub async fn send(&self, url: &str, config: RequestConfig) -> Result<Payload, HttpError> {
        let req = self.prepare(url, &config)?;
        tracing::debug!(method = %req.method, url = %req.url, "sending request");
        let res = self.execute(&req).await?;
        tracing::debug!(
            status = res.status,
            content_type = ?res.content_type(),
            "received response"
        );
        handle_response(&res)
    }

    /// GET `url` with the default configuration
    pub async fn get(&self, url: &str) -> Result<Payload, HttpError> {
        self.send(url, RequestConfig::default()).await
    }

    /// Hand a prepared request straight to the backend
    ///
    /// No decoding and no status check happen here.
    pub async fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.backend.send(req).await
    }
}
