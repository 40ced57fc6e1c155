use crate::http::{error::HttpError, request::HttpRequest, response::HttpResponse};
use async_trait::async_trait;

/// Trait for HTTP backends that handle the actual network communication
///
/// The client resolves headers and bodies itself and hands a finished
/// [`HttpRequest`] to the backend, which performs exactly one round-trip. Use
/// [`ReqwestBackend`] in production and a mock in tests.
///
/// # Examples
///
/// ```
/// use fetchit::http::{HttpBackend, HttpRequest, HttpResponse, HttpError};
/// use async_trait::async_trait;
///
/// struct LoggingBackend<B: HttpBackend> {
///     inner: B,
/// }
///
/// #[async_trait]
/// impl<B: HttpBackend + Send + Sync> HttpBackend for LoggingBackend<B> {
///     async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
///         println!("Sending request to: {}", req.url);
///         let response = self.inner.send(req).await?;
///         println!("Received response with status: {}", response.status);
///         Ok(response)
///     }
/// }
/// ```
#[async_trait]
pub trait HttpBackend {
    /// Send an HTTP request and return the raw response
    ///
    /// Non-2xx statuses are not errors at this level; only transport failures are.
    async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Default backend using reqwest for real HTTP requests
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestBackend;

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let client = reqwest::Client::new();
        let mut request_builder = client
            .request(req.method.clone(), &req.url)
            .headers(req.headers.clone());
        if let Some(ref body) = req.body {
            request_builder = request_builder.body(body.clone());
        }
        let resp = request_builder
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
