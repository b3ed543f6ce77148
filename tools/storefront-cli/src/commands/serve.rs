//! Run the HTTP API.

use anyhow::Result;
use storefront_commerce::schema;
use storefront_server::{serve, AppState};

use super::ServeArgs;
use crate::context::Context;

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let mut server = ctx.config.server_config();
    if let Some(host) = args.host {
        server.host = host;
    }
    if let Some(port) = args.port {
        server.port = port;
    }

    let db = ctx.open_db()?;
    if args.seed {
        let inserted = schema::seed_sample_data(&db)?;
        ctx.output.debug(&format!("Seeded {inserted} products"));
    }

    ctx.output.info(&format!(
        "Serving on http://{} (database {})",
        server.bind_addr(),
        ctx.database_path().display()
    ));

    let state = AppState::new(db, ctx.config.storage_policy());
    serve(&server, state).await
}
