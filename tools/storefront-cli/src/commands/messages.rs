//! Read and delete contact form messages.

use anyhow::Result;
use serde_json::json;
use storefront_commerce::prelude::ContactService;

use super::{message_id, MessagesArgs, MessagesCommand};
use crate::context::Context;

/// Run the messages command.
pub async fn run(args: MessagesArgs, ctx: &Context) -> Result<()> {
    let contact = ContactService::new(ctx.open_db()?, ctx.config.storage_policy());

    match args.command {
        Some(MessagesCommand::List) | None => list_messages(&contact, args.limit, ctx).await,
        Some(MessagesCommand::Delete { id }) => delete_message(&contact, id, ctx).await,
    }
}

async fn list_messages(contact: &ContactService, limit: u32, ctx: &Context) -> Result<()> {
    let messages = contact.list_messages(limit).await?;

    if ctx.output.is_json() {
        ctx.output.json(&messages);
        return Ok(());
    }

    if messages.is_empty() {
        ctx.output.info("No messages.");
        return Ok(());
    }

    ctx.output.header(&format!("Messages ({})", messages.len()));
    for m in &messages {
        println!();
        ctx.output.kv("id", &m.id.to_string());
        ctx.output.kv("from", &format!("{} <{}>", m.name, m.email));
        ctx.output.kv("at", &m.created_at);
        if !m.subject.is_empty() {
            ctx.output.kv("subject", &m.subject);
        }
        ctx.output.kv("message", &m.message);
    }

    Ok(())
}

async fn delete_message(contact: &ContactService, raw_id: i64, ctx: &Context) -> Result<()> {
    let id = message_id(raw_id)?;
    contact.delete_message(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "deleted": id }));
    } else {
        ctx.output.success(&format!("Deleted message {id}"));
    }
    Ok(())
}
