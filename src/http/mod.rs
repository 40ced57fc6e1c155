pub mod backend;
pub mod client;
pub mod credential;
pub mod error;
pub mod qs;
pub mod request;
pub mod response;
pub mod utils;

pub use backend::{HttpBackend, ReqwestBackend};
pub use client::Client;
pub use credential::{CredentialSource, NoCredential, StaticToken};
pub use error::HttpError;
pub use request::{ContentType, HttpRequest, RequestConfig};
pub use response::{Blob, ContentCategory, FormData, FormValue, HttpResponse, Payload};
pub use utils::parse_method;
