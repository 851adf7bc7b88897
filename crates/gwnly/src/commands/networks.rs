//! Network listing.

use tabled::Tabled;

use gwnly_api::{GwnClient, RawNetwork};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&RawNetwork> for NetworkRow {
    fn from(n: &RawNetwork) -> Self {
        Self {
            id: n.id.as_ref().map_or_else(|| "-".into(), ToString::to_string),
            name: output::or_dash(n.name.as_deref().unwrap_or_default()),
        }
    }
}

pub async fn handle(client: &GwnClient, global: &GlobalOpts) -> Result<(), CliError> {
    let networks = gwnly_core::list_networks(client)
        .await
        .map_err(|e| CliError::from_snapshot(e, client.base_url()))?;

    let out = output::render_list(
        global.output,
        &networks,
        |n| NetworkRow::from(n),
        |n| n.id.as_ref().map(ToString::to_string).unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
