//! Catalog administration.

use anyhow::Result;
use storefront_commerce::prelude::{CatalogService, NewProduct, Product};

use super::{product_id, CatalogArgs, CatalogCommand, Toggle};
use crate::context::Context;
use crate::output::{availability_badge, format_price, format_rating};

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let catalog = CatalogService::new(ctx.open_db()?, ctx.config.storage_policy());

    match args.command {
        Some(CatalogCommand::List) | None => list_products(&catalog, ctx).await,
        Some(CatalogCommand::Add {
            name,
            category,
            price,
            stock,
            tag,
            image,
            description,
        }) => {
            let entry = NewProduct::new(name, category, price)
                .with_stock(stock)
                .with_tag(tag)
                .with_image(image)
                .with_description(description);
            add_product(&catalog, entry, ctx).await
        }
        Some(CatalogCommand::Availability { id, state }) => {
            set_availability(&catalog, id, state, ctx).await
        }
    }
}

async fn list_products(catalog: &CatalogService, ctx: &Context) -> Result<()> {
    let products = catalog.list_products().await?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("Catalog is empty.");
        ctx.output.info("Run `storefront init --seed` to load the demo catalog.");
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", products.len()));
    let widths = [4, 24, 12, 9, 9, 6, 11];
    ctx.output.table_row(
        &["ID", "NAME", "CATEGORY", "PRICE", "RATING", "STOCK", "STATUS"],
        &widths,
    );
    for p in &products {
        ctx.output.table_row(
            &[
                &p.id.to_string(),
                &p.name,
                &p.category,
                &format_price(p.price),
                &format_rating(p.rating, p.review_count),
                &p.stock.to_string(),
                &availability_badge(p.available),
            ],
            &widths,
        );
    }

    Ok(())
}

async fn add_product(catalog: &CatalogService, entry: NewProduct, ctx: &Context) -> Result<()> {
    let product = catalog.create_product(entry).await?;
    report(&product, ctx);
    ctx.output.success(&format!("Created product {}", product.id));
    Ok(())
}

async fn set_availability(catalog: &CatalogService, raw_id: i64, state: Toggle, ctx: &Context) -> Result<()> {
    let id = product_id(raw_id)?;
    let product = catalog.set_availability(id, state.enabled()).await?;
    report(&product, ctx);
    ctx.output.success(&format!(
        "{} is now {}",
        product.name,
        availability_badge(product.available)
    ));
    Ok(())
}

fn report(product: &Product, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(product);
        return;
    }
    ctx.output.kv("id", &product.id.to_string());
    ctx.output.kv("name", &product.name);
    ctx.output.kv("category", &product.category);
    ctx.output.kv("price", &format_price(product.price));
    ctx.output.kv("rating", &format_rating(product.rating, product.review_count));
}
