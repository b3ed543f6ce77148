//! Create the schema and optionally seed demo data.

use anyhow::Result;
use serde::Serialize;
use storefront_commerce::schema;

use super::InitArgs;
use crate::context::Context;

#[derive(Serialize)]
struct InitReport {
    database: String,
    seeded_products: usize,
}

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let path = ctx.database_path();
    ctx.output.success(&format!("Schema ready: {}", path.display()));

    let seeded_products = if args.seed {
        let inserted = schema::seed_sample_data(&db)?;
        if inserted == 0 {
            ctx.output.warn("Catalog already has products; demo data not inserted");
        } else {
            ctx.output.success(&format!("Seeded {inserted} demo products"));
        }
        inserted
    } else {
        0
    };

    if ctx.output.is_json() {
        ctx.output.json(&InitReport {
            database: path.display().to_string(),
            seeded_products,
        });
    }

    Ok(())
}
