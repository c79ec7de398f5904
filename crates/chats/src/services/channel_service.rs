//! Channel creation and live channel streams.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::access_validator::AccessValidator;
use super::subscription_registry::{EventSink, SubscriptionRegistry};
use crate::entities::{Channel, ChannelType, CreateChannelRequest};
use crate::repositories::{ChannelProvider, ChatProvider};
use crate::types::{ChatError, ChatResult};
use crate::utils::{PermissionChecker, Validator};

/// Why a stream returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The caller's cancellation token fired.
    Cancelled,
    /// The sink refused an event.
    SinkClosed,
}

#[derive(Clone)]
pub struct ChannelService {
    chats: Arc<dyn ChatProvider>,
    channels: Arc<dyn ChannelProvider>,
    access: AccessValidator,
    registry: SubscriptionRegistry,
}

impl ChannelService {
    pub fn new(
        chats: Arc<dyn ChatProvider>,
        channels: Arc<dyn ChannelProvider>,
        registry: SubscriptionRegistry,
    ) -> Self {
        let access = AccessValidator::new(Arc::clone(&chats), Arc::clone(&channels));
        Self {
            chats,
            channels,
            access,
            registry,
        }
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub async fn create_channel(
        &self,
        creator_id: &str,
        chat_id: &str,
        name: &str,
        channel_type: &str,
    ) -> ChatResult<Channel> {
        let channel_type: ChannelType = channel_type.parse()?;
        Validator::channel_name(name)?;

        let chat = self
            .chats
            .find_chat_by_id(chat_id)
            .await?
            .ok_or(ChatError::ChatNotFound)?;
        PermissionChecker::can_access_chat(&chat, creator_id)?;

        let channel = self
            .channels
            .save_channel(CreateChannelRequest::new(chat_id, name.trim(), channel_type))
            .await?;

        info!(channel_id = %channel.id, chat_id, channel_type = %channel_type, "created new channel");
        Ok(channel)
    }

    /// Check that `user_id` may stream `channel_id` without registering.
    pub async fn authorize(&self, user_id: &str, channel_id: &str) -> ChatResult<Channel> {
        self.access.validate(channel_id, user_id).await
    }

    /// Stream events of `channel_id` into `sink` until `cancel` fires or the
    /// sink closes.
    ///
    /// Access is checked before anything is registered. The queue is removed
    /// from the registry on every exit path, including this future being
    /// dropped.
    pub async fn subscribe<S>(
        &self,
        user_id: &str,
        channel_id: &str,
        sink: &mut S,
        cancel: CancellationToken,
    ) -> ChatResult<StreamEnd>
    where
        S: EventSink + ?Sized,
    {
        self.access.validate(channel_id, user_id).await?;

        let mut subscription = self.registry.register(channel_id);
        debug!(channel_id, user_id, subscriber = subscription.id(), "stream opened");

        let end = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break StreamEnd::Cancelled,
                event = subscription.recv() => {
                    let Some(event) = event else {
                        break StreamEnd::Cancelled;
                    };
                    if sink.deliver(event).await.is_err() {
                        break StreamEnd::SinkClosed;
                    }
                }
            }
        };

        debug!(channel_id, user_id, subscriber = subscription.id(), ?end, "stream closed");
        Ok(end)
    }
}
