//! Contact message storage.

use storefront_db::{params, Db, Queryable};
use tracing::{debug, error, info};

use crate::contact::{ContactMessage, NewContactMessage};
use crate::error::{CommerceError, CommerceResult};
use crate::ids::MessageId;
use crate::storage::{bounded, run_to_completion, timestamp_now, StoragePolicy};

#[derive(Debug, Clone)]
pub struct ContactService {
    db: Db,
    policy: StoragePolicy,
}

impl ContactService {
    pub fn new(db: Db, policy: StoragePolicy) -> Self {
        Self { db, policy }
    }

    /// Validate and store a message.
    pub async fn submit(&self, input: NewContactMessage) -> CommerceResult<MessageId> {
        let msg = input.validated().inspect_err(|e| {
            debug!(code = e.code(), "contact message rejected: {e}");
        })?;

        let id = run_to_completion(&self.db, "insert_contact_message", move |db| {
            let id = db.insert(
                "INSERT INTO contact_messages (name, email, subject, message, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                params![&msg.name, &msg.email, &msg.subject, &msg.message, timestamp_now()],
            )?;
            Ok(MessageId::new(id))
        })
        .await
        .inspect_err(|e| error!(op = "insert_contact_message", code = e.code(), "{e}"))?;

        info!(message_id = %id, "contact message stored");
        Ok(id)
    }

    /// Most recent messages first.
    pub async fn list_messages(&self, limit: u32) -> CommerceResult<Vec<ContactMessage>> {
        bounded(&self.db, self.policy, "list_contact_messages", move |db| {
            Ok(db.query_as(
                "SELECT id, name, email, subject, message, created_at
                 FROM contact_messages
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?",
                params![i64::from(limit)],
            )?)
        })
        .await
    }

    /// Remove a message. Unknown ids are `MessageNotFound`.
    pub async fn delete_message(&self, id: MessageId) -> CommerceResult<()> {
        run_to_completion(&self.db, "delete_contact_message", move |db| {
            let changed = db.execute("DELETE FROM contact_messages WHERE id = ?", params![id])?;
            if changed == 0 {
                return Err(CommerceError::MessageNotFound(id));
            }
            Ok(())
        })
        .await
        .inspect_err(|e| debug!(op = "delete_contact_message", message_id = %id, code = e.code(), "{e}"))?;

        info!(message_id = %id, "contact message deleted");
        Ok(())
    }
}
