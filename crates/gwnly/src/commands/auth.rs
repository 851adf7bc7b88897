//! Auth command: run the token exchange and report the result.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gwnly_api::GwnClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct AuthStatus {
    server: String,
    app_id: String,
    expires_at: Option<DateTime<Utc>>,
}

fn detail(status: &AuthStatus) -> String {
    let expires = status.expires_at.map_or_else(
        || "-".into(),
        |at| {
            let left = (at - Utc::now()).num_seconds().max(0).unsigned_abs();
            format!(
                "{} (in {})",
                at.format("%Y-%m-%d %H:%M:%S UTC"),
                humantime::format_duration(std::time::Duration::from_secs(left))
            )
        },
    );
    [
        format!("Server:  {}", status.server),
        format!("App ID:  {}", status.app_id),
        format!("Token:   valid until {expires}"),
    ]
    .join("\n")
}

pub async fn handle(client: &GwnClient, global: &GlobalOpts) -> Result<(), CliError> {
    client
        .tokens()
        .authenticate()
        .await
        .map_err(|e| CliError::from_auth(e, client.base_url()))?;

    let status = AuthStatus {
        server: client.base_url().to_string(),
        app_id: client.credentials().app_id.clone(),
        expires_at: client.tokens().expires_at().await,
    };
    let out = output::render_single(global.output, &status, detail, |s| {
        s.expires_at.map(|at| at.to_rfc3339()).unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
