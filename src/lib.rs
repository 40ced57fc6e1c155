pub mod error;
pub mod http;
pub mod printer;
pub mod session;

use ::http::Method;
use clap::{Args, Parser, Subcommand};
use error::{AppError, CliError};
use crate::http::{
    parse_method, qs, utils::join_url, Client, HttpBackend, Payload, RequestConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use session::Session;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Ordered key/value pairs, used for headers and flat form fields
pub type KeyValuePairs = Vec<(String, String)>;

pub type HeaderDataTuple = (KeyValuePairs, KeyValuePairs);

#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// The URL to send the request to, absolute or relative to the session base_url
    pub url: String,
    /// Extra headers (key:value) and body fields (key=value, nest with key[sub]=value)
    #[arg(value_parser, trailing_var_arg = true)]
    pub params: Vec<String>,
    /// Token sent in the `token` header, overriding the session credential
    #[arg(long)]
    pub token: Option<String>,
    /// Explicit Content-Type, overriding the method default
    #[arg(long)]
    pub content_type: Option<String>,
    /// Print the prepared request before sending it
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send a GET request
    Get(RequestArgs),
    /// Send a POST request with a form-encoded body
    Post(RequestArgs),
    /// Send a PUT request
    Put(RequestArgs),
    /// Send a PATCH request
    Patch(RequestArgs),
    /// Send a DELETE request
    Delete(RequestArgs),
    /// Send a request with any method, e.g. `fetchit request PURGE <url>`
    Request {
        /// HTTP method name
        method: String,
        #[command(flatten)]
        args: RequestArgs,
    },
}

impl Command {
    pub fn into_parts(self) -> Result<(Method, RequestArgs), AppError> {
        Ok(match self {
            Command::Get(args) => (Method::GET, args),
            Command::Post(args) => (Method::POST, args),
            Command::Put(args) => (Method::PUT, args),
            Command::Patch(args) => (Method::PATCH, args),
            Command::Delete(args) => (Method::DELETE, args),
            Command::Request { method, args } => (parse_method(&method)?, args),
        })
    }
}

#[derive(Parser)]
#[command(name = "fetchit")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Session file holding the fallback token and base URL
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

/// Validates and parses parameters, returning errors for invalid formats
///
/// `key:value` is a header and `key=value` a body field. Whichever separator
/// comes first decides, so `a[b]=x:y` is a body field.
pub fn validate_params(params: &[String]) -> Result<HeaderDataTuple, AppError> {
    let mut headers = Vec::new();
    let mut data = Vec::new();

    for param in params {
        let colon = param.find(':');
        let equals = param.find('=');
        let is_header = match (colon, equals) {
            (Some(c), Some(e)) => c < e,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => {
                return Err(CliError::InvalidHeaderFormat(format!(
                    "Parameter '{param}' must be 'key:value' (header) or 'key=value' (body)"
                ))
                .into());
            }
        };

        if is_header {
            let (k, v) = param.split_once(':').unwrap_or((param, ""));
            let key = k.trim();
            if key.is_empty() || key.contains(' ') {
                return Err(CliError::InvalidHeaderFormat(param.clone()).into());
            }
            headers.push((key.to_string(), v.trim().to_string()));
        } else {
            let (k, v) = param.split_once('=').unwrap_or((param, ""));
            let key = k.trim();
            if key.is_empty() {
                return Err(CliError::InvalidBodyFormat(param.clone()).into());
            }
            data.push((key.to_string(), v.trim().to_string()));
        }
    }

    Ok((headers, data))
}

/// Turn CLI arguments into the URL and per-call configuration
pub fn build_config(
    method: Method,
    args: &RequestArgs,
    session: &Session,
) -> Result<(String, RequestConfig), AppError> {
    if args.url.trim().is_empty() {
        return Err(CliError::InvalidUrl("URL cannot be empty".to_string()).into());
    }
    let url = join_url(session.base_url.as_deref(), args.url.trim());
    let (headers, data) = validate_params(&args.params)?;

    let mut config = RequestConfig::new().method(method).headers_from_vec(headers);
    if !data.is_empty() {
        config = config.body(qs::to_value(data));
    }
    if let Some(ref token) = args.token {
        config = config.token(token.clone());
    }
    if let Some(ref content_type) = args.content_type {
        config = config.content_type(content_type.clone());
    }
    Ok((url, config))
}

pub async fn run_with_spinner<F, T>(message: &str, f: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    // Fall back to the plain spinner if the template is rejected
    match ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner} {msg}")
    {
        Ok(style) => pb.set_style(style),
        Err(_) => pb.set_style(ProgressStyle::default_spinner()),
    }

    let result = f.await;
    pb.finish_and_clear();
    result
}

/// Send one request described by CLI arguments and print the outcome
///
/// Rejected responses are printed with their status before the error is
/// returned, so the caller only reports the exit reason.
pub async fn handle_request<B>(
    client: &Client<B>,
    method: Method,
    args: &RequestArgs,
    session: &Session,
) -> Result<Payload, AppError>
where
    B: HttpBackend + Send + Sync,
{
    let (url, config) = build_config(method, args, session)?;
    if args.verbose {
        printer::print_request(&client.prepare(&url, &config)?);
    }

    let spinner_msg = format!("{} {}", config.resolve_method(), url);
    let result = run_with_spinner(&spinner_msg, client.send(&url, config)).await;
    printer::print_outcome(&result);
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpError;
    use serde_json::json;

    fn args(url: &str, params: &[&str]) -> RequestArgs {
        RequestArgs {
            url: url.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_params_valid() {
        let params = vec![
            "X-Requested-With:XMLHttpRequest".to_string(),
            "name=joe".to_string(),
            "age=42".to_string(),
        ];
        let (headers, data) = validate_params(&params).unwrap();
        assert_eq!(
            headers,
            vec![("X-Requested-With".to_string(), "XMLHttpRequest".to_string())]
        );
        assert_eq!(
            data,
            vec![
                ("name".to_string(), "joe".to_string()),
                ("age".to_string(), "42".to_string())
            ]
        );
    }

    #[test]
    fn test_validate_params_first_separator_wins() {
        let (headers, data) = validate_params(&[
            "Accept:text/html;q=0.9".to_string(),
            "time=12:30".to_string(),
        ])
        .unwrap();
        assert_eq!(headers[0].1, "text/html;q=0.9");
        assert_eq!(data[0].1, "12:30");
    }

    #[test]
    fn test_validate_params_rejects_bad_input() {
        assert!(validate_params(&[":Bearer123".to_string()]).is_err());
        assert!(validate_params(&["Auth orization:x".to_string()]).is_err());
        assert!(validate_params(&["=value".to_string()]).is_err());
        assert!(validate_params(&["invalid-param".to_string()]).is_err());
    }

    #[test]
    fn test_validate_params_edge_cases() {
        assert!(validate_params(&["key:".to_string()]).is_ok());
        assert!(validate_params(&["key=".to_string()]).is_ok());
        let (_, data) = validate_params(&["key=value=more".to_string()]).unwrap();
        assert_eq!(data[0].1, "value=more");
    }

    #[test]
    fn test_build_config_nests_body_fields() {
        let (url, config) = build_config(
            Method::POST,
            &args("http://example.com/api/items", &["a=1", "b[c]=2", "X-Trace:abc"]),
            &Session::default(),
        )
        .unwrap();
        assert_eq!(url, "http://example.com/api/items");
        assert_eq!(config.body, Some(json!({"a": "1", "b": {"c": "2"}})));
        assert_eq!(config.serialized_body().as_deref(), Some("a=1&b[c]=2"));
        assert_eq!(
            config.headers,
            vec![("X-Trace".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn test_build_config_uses_session_base_url() {
        let session = Session {
            token: None,
            base_url: Some("https://api.example.com/v1/".to_string()),
        };
        let (url, config) = build_config(Method::GET, &args("/items", &[]), &session).unwrap();
        assert_eq!(url, "https://api.example.com/v1/items");
        assert_eq!(config.body, None);
    }

    #[test]
    fn test_build_config_overrides() {
        let mut request = args("http://example.com", &[]);
        request.token = Some("cli-token".to_string());
        request.content_type = Some("text/plain".to_string());
        let (_, config) = build_config(Method::PUT, &request, &Session::default()).unwrap();
        assert_eq!(config.token.as_deref(), Some("cli-token"));
        assert_eq!(config.resolve_content_type(), "text/plain");
    }

    #[test]
    fn test_build_config_rejects_empty_url() {
        let err = build_config(Method::GET, &args("  ", &[]), &Session::default()).unwrap_err();
        assert!(matches!(err, AppError::Cli(CliError::InvalidUrl(_))));
    }

    #[test]
    fn test_command_into_parts() {
        let (method, parsed) = Command::Delete(args("http://x.y/1", &[])).into_parts().unwrap();
        assert_eq!(method, Method::DELETE);
        assert_eq!(parsed.url, "http://x.y/1");

        let (method, _) = Command::Request {
            method: "purge".to_string(),
            args: args("http://x.y/cache", &[]),
        }
        .into_parts()
        .unwrap();
        assert_eq!(method.as_str(), "PURGE");

        let err = Command::Request {
            method: "NOT VALID".to_string(),
            args: args("http://x.y", &[]),
        }
        .into_parts()
        .unwrap_err();
        assert!(matches!(err, AppError::Http(HttpError::UnsupportedMethod(_))));
    }

    #[test]
    fn test_cli_parses_global_session_flag() {
        let cli = Cli::try_parse_from([
            "fetchit",
            "--session",
            "s.yaml",
            "post",
            "--token",
            "t",
            "http://example.com",
            "a=1",
        ])
        .unwrap();
        assert_eq!(cli.session, Some(PathBuf::from("s.yaml")));
        let (method, parsed) = cli.command.into_parts().unwrap();
        assert_eq!(method, Method::POST);
        assert_eq!(parsed.params, vec!["a=1".to_string()]);
        assert_eq!(parsed.token.as_deref(), Some("t"));
    }
}
