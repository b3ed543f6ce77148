//! Repair cached product ratings from stored reviews.

use anyhow::Result;
use serde::Serialize;
use storefront_commerce::prelude::{ProductId, RatingSummary, ReviewService};

use super::{product_id, RecomputeArgs};
use crate::context::Context;

#[derive(Serialize)]
struct Recomputed {
    product_id: ProductId,
    #[serde(flatten)]
    summary: RatingSummary,
}

/// Run the recompute command.
pub async fn run(args: RecomputeArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let policy = ctx.config.storage_policy();
    let reviews = ReviewService::new(db, policy);

    let results = match args.product {
        Some(raw) => {
            let id = product_id(raw)?;
            vec![(id, reviews.recompute(id).await?)]
        }
        None => {
            let pb = ctx.output.progress(0, "Recomputing ratings");
            let results = reviews
                .recompute_all(|done, total| {
                    pb.set_length(total as u64);
                    pb.set_position(done as u64);
                })
                .await?;
            pb.finish_and_clear();
            results
        }
    };

    if ctx.output.is_json() {
        let report: Vec<Recomputed> = results
            .into_iter()
            .map(|(product_id, summary)| Recomputed { product_id, summary })
            .collect();
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header("Recomputed ratings");
    ctx.output.table_row(&["PRODUCT", "AVERAGE", "REVIEWS"], &[8, 8, 8]);
    for (id, summary) in &results {
        let average = summary
            .average
            .map(|a| format!("{a:.1}"))
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[&id.to_string(), &average, &summary.total.to_string()],
            &[8, 8, 8],
        );
    }
    ctx.output.success(&format!("{} product(s) up to date", results.len()));

    Ok(())
}
