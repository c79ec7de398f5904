//! Message service: validate, persist, then fan out.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::access_validator::AccessValidator;
use super::subscription_registry::SubscriptionRegistry;
use crate::entities::{CreateMessageRequest, Message};
use crate::repositories::{ChannelProvider, ChatProvider, MessageProvider, Page};
use crate::types::{ChannelEvent, ChatResult};
use crate::utils::Validator;

const SEND_LOCK_STRIPES: usize = 64;

/// Striped per-channel locks. A send holds its channel's stripe from the
/// storage write until the broadcast returns, so live subscribers see a
/// channel's messages in stored order.
#[derive(Clone)]
struct SendLocks(Arc<[Mutex<()>]>);

impl SendLocks {
    fn new() -> Self {
        Self((0..SEND_LOCK_STRIPES).map(|_| Mutex::new(())).collect())
    }

    fn for_channel(&self, channel_id: &str) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        channel_id.hash(&mut hasher);
        &self.0[hasher.finish() as usize % self.0.len()]
    }
}

#[derive(Clone)]
pub struct MessageService {
    access: AccessValidator,
    messages: Arc<dyn MessageProvider>,
    registry: SubscriptionRegistry,
    send_locks: SendLocks,
    max_message_length: usize,
}

impl MessageService {
    pub fn new(
        chats: Arc<dyn ChatProvider>,
        channels: Arc<dyn ChannelProvider>,
        messages: Arc<dyn MessageProvider>,
        registry: SubscriptionRegistry,
        max_message_length: usize,
    ) -> Self {
        Self {
            access: AccessValidator::new(chats, channels),
            messages,
            registry,
            send_locks: SendLocks::new(),
            max_message_length,
        }
    }

    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }

    /// Persist a message from `sender_id` and offer it to the channel's live
    /// subscribers. Only persistence decides success; fan-out never fails
    /// the call.
    pub async fn send_message(&self, sender_id: &str, channel_id: &str, text: &str) -> ChatResult<Message> {
        self.access.validate(channel_id, sender_id).await?;
        Validator::message_text(text, self.max_message_length)?;

        let _ordered = self.send_locks.for_channel(channel_id).lock().await;
        let message = self
            .messages
            .save_message(CreateMessageRequest::new(channel_id, sender_id, text))
            .await?;

        info!(message_id = %message.id, channel_id, sender_id, "created new message");

        let report = self
            .registry
            .broadcast(channel_id, ChannelEvent::NewMessage(message.clone()));
        debug!(
            message_id = %message.id,
            delivered = report.delivered,
            dropped = report.dropped,
            "message broadcast"
        );

        Ok(message)
    }

    /// A page of `channel_id` history, newest first. `offset` starts at 1.
    pub async fn get_messages(
        &self,
        user_id: &str,
        channel_id: &str,
        limit: u32,
        offset: u32,
    ) -> ChatResult<Vec<Message>> {
        self.access.validate(channel_id, user_id).await?;
        let page = Page::new(limit, offset)?;

        self.messages.get_messages(channel_id, page).await
    }
}
