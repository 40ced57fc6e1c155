//! # fetchit - send one HTTP request and print the decoded response
//!
//! ```bash
//! fetchit get https://api.example.com/items
//! fetchit post https://api.example.com/items name=widget dims[w]=3
//! fetchit --session .fetchit/session.yaml put /items/1 X-Requested-With:XMLHttpRequest price=9
//! fetchit request PURGE https://cdn.example.com/assets/app.js
//! ```
//!
//! A session file supplies the fallback `token` header and a `base_url` for
//! relative paths. Set `RUST_LOG=debug` to trace each request.

use clap::Parser;
use fetchit::{
    error::AppError, handle_request, http::Client, http::ReqwestBackend, session, Cli,
};
use tracing_subscriber::EnvFilter;

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let session = session::resolve_session(cli.session.as_deref())?;
    let (method, args) = cli.command.into_parts()?;

    let client = Client::new(ReqwestBackend).with_credentials(session.clone());
    handle_request(&client, method, &args, &session).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        if let Some(suggestion) = e.suggestion() {
            eprintln!("Suggestion: {suggestion}");
        }
        std::process::exit(1);
    }
}
