//! Hands generation, refinement and delivery work to the external workers.
//!
//! Each operation first checks its domain precondition (the entity exists),
//! then appends one payload to the tail of a queue and returns. Completion is
//! never observed here. A failed append surfaces as `AppError::Dispatch`; the
//! lookup before it has no side effects, so nothing is compensated.

use std::sync::Arc;

use bson::{oid::ObjectId, Bson, Document};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::db::DocumentStore;
use crate::dispatch::payloads::{GeneratePayload, RefinePayload, SendPayload};
use crate::errors::AppError;
use crate::models::kinds::EntityKind;
use crate::queue::{JobQueue, QueueError};
use crate::resolution::engine::{resolve_one, Resolved};

#[derive(Clone)]
pub struct Dispatcher {
    queue: Arc<dyn JobQueue>,
    generation_queue: String,
    delivery_queue: String,
}

impl Dispatcher {
    pub fn new(queue: Arc<dyn JobQueue>, generation_queue: String, delivery_queue: String) -> Self {
        Self {
            queue,
            generation_queue,
            delivery_queue,
        }
    }

    /// Queues a first draft for the recipient `recipient_id`.
    pub async fn generate(
        &self,
        store: &dyn DocumentStore,
        recipient_id: ObjectId,
    ) -> Result<(), AppError> {
        let recipient = store
            .find_by_key(
                EntityKind::Recipient.collection(),
                &Bson::ObjectId(recipient_id),
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Recipient not found".to_string()))?;

        let payload = GeneratePayload {
            recipient: text(&recipient, "email"),
        };
        self.enqueue(&self.generation_queue, &payload).await
    }

    /// Queues a refinement prompt for an existing letter. The prompt is
    /// passed through as-is, empty included.
    pub async fn refine(
        &self,
        store: Arc<dyn DocumentStore>,
        letter_id: ObjectId,
        prompt: String,
    ) -> Result<(), AppError> {
        let letter = load_letter(store, letter_id).await?;
        let payload = RefinePayload {
            recipient: recipient_email(&letter)?,
            conversation_id: text(&letter.document, "conversation_id"),
            prompt,
        };
        self.enqueue(&self.generation_queue, &payload).await
    }

    /// Queues the letter's current text for delivery to its recipient.
    pub async fn send(
        &self,
        store: Arc<dyn DocumentStore>,
        letter_id: ObjectId,
    ) -> Result<(), AppError> {
        let letter = load_letter(store, letter_id).await?;
        let payload = SendPayload {
            recipient: recipient_email(&letter)?,
            cover_letter: text(&letter.document, "cover_letter"),
        };
        self.enqueue(&self.delivery_queue, &payload).await
    }

    async fn enqueue<P: Serialize + Sync>(&self, queue: &str, payload: &P) -> Result<(), AppError> {
        let bytes = serde_json::to_vec(payload).map_err(QueueError::from)?;
        self.queue.push(queue, Bytes::from(bytes)).await?;
        info!("Queued job on '{queue}'");
        Ok(())
    }
}

/// Loads a letter with its recipient resolved (structured or string id).
async fn load_letter(store: Arc<dyn DocumentStore>, id: ObjectId) -> Result<Resolved, AppError> {
    resolve_one(store, EntityKind::CoverLetter, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cover letter not found".to_string()))
}

fn recipient_email(letter: &Resolved) -> Result<String, AppError> {
    letter
        .target("recipient_id")
        .map(|recipient| text(recipient, "email"))
        .ok_or_else(|| AppError::NotFound("Recipient of cover letter not found".to_string()))
}

fn text(document: &Document, key: &str) -> String {
    document.get_str(key).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::queue::memory::MemoryQueue;
    use bson::doc;
    use serde_json::json;

    const GENERATION: &str = "cover_letter_generation_queue";
    const DELIVERY: &str = "emails_to_send";

    struct Fixture {
        store: Arc<MemoryStore>,
        queue: Arc<MemoryQueue>,
        dispatcher: Dispatcher,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_queue(MemoryQueue::new())
        }

        fn with_queue(queue: MemoryQueue) -> Self {
            let queue = Arc::new(queue);
            let dispatcher = Dispatcher::new(queue.clone(), GENERATION.into(), DELIVERY.into());
            Self {
                store: Arc::new(MemoryStore::new()),
                queue,
                dispatcher,
            }
        }

        fn shared(&self) -> Arc<dyn DocumentStore> {
            self.store.clone()
        }

        async fn recipient(&self, email: &str) -> ObjectId {
            self.store
                .insert("recipients", doc! { "email": email, "name": "", "description": "" })
                .await
                .unwrap()
        }

        async fn letter(&self, recipient: Bson, text: &str) -> ObjectId {
            self.store
                .insert(
                    "cover-letters",
                    doc! {
                        "recipient_id": recipient,
                        "conversation_id": "conv-1",
                        "cover_letter": text,
                    },
                )
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_generate_queues_recipient_email() {
        let fx = Fixture::new();
        let recipient = fx.recipient("a@b.com").await;

        fx.dispatcher
            .generate(fx.store.as_ref(), recipient)
            .await
            .unwrap();
        assert_eq!(
            fx.queue.payloads(GENERATION),
            vec![json!({ "recipient": "a@b.com" })]
        );
        assert_eq!(fx.queue.len(DELIVERY), 0);
    }

    #[tokio::test]
    async fn test_generate_unknown_recipient_is_not_found() {
        let fx = Fixture::new();
        let result = fx.dispatcher.generate(fx.store.as_ref(), ObjectId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(fx.queue.len(GENERATION), 0);
    }

    #[tokio::test]
    async fn test_refine_queues_conversation_and_prompt() {
        let fx = Fixture::new();
        let recipient = fx.recipient("a@b.com").await;
        let letter = fx.letter(Bson::ObjectId(recipient), "Dear team").await;

        fx.dispatcher
            .refine(fx.shared(), letter, "shorten it".into())
            .await
            .unwrap();
        assert_eq!(
            fx.queue.payloads(GENERATION),
            vec![json!({
                "recipient": "a@b.com",
                "conversation_id": "conv-1",
                "prompt": "shorten it",
            })]
        );
    }

    #[tokio::test]
    async fn test_refine_accepts_string_recipient_and_empty_prompt() {
        let fx = Fixture::new();
        let recipient = fx.recipient("legacy@b.com").await;
        let letter = fx.letter(Bson::String(recipient.to_hex()), "Hi").await;

        fx.dispatcher
            .refine(fx.shared(), letter, String::new())
            .await
            .unwrap();
        let payloads = fx.queue.payloads(GENERATION);
        assert_eq!(payloads[0]["recipient"], "legacy@b.com");
        assert_eq!(payloads[0]["prompt"], "");
    }

    #[tokio::test]
    async fn test_refine_unknown_letter_is_not_found() {
        let fx = Fixture::new();
        let result = fx
            .dispatcher
            .refine(fx.shared(), ObjectId::new(), "x".into())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Cover letter not found"));
    }

    #[tokio::test]
    async fn test_send_goes_to_delivery_queue() {
        let fx = Fixture::new();
        let recipient = fx.recipient("a@b.com").await;
        let letter = fx.letter(Bson::ObjectId(recipient), "Final text").await;

        fx.dispatcher.send(fx.shared(), letter).await.unwrap();
        assert_eq!(
            fx.queue.payloads(DELIVERY),
            vec![json!({ "recipient": "a@b.com", "cover_letter": "Final text" })]
        );
        assert_eq!(fx.queue.len(GENERATION), 0);
    }

    #[tokio::test]
    async fn test_send_with_dangling_recipient_is_not_found() {
        let fx = Fixture::new();
        let letter = fx.letter(Bson::ObjectId(ObjectId::new()), "Text").await;
        let result = fx.dispatcher.send(fx.shared(), letter).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(fx.queue.len(DELIVERY), 0);
    }

    #[tokio::test]
    async fn test_queue_failure_is_a_dispatch_error() {
        let fx = Fixture::with_queue(MemoryQueue::unavailable());
        let recipient = fx.recipient("a@b.com").await;
        let result = fx.dispatcher.generate(fx.store.as_ref(), recipient).await;
        assert!(matches!(result, Err(AppError::Dispatch(_))));
    }
}
