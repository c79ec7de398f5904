//! Business logic layer for the chat system.

pub mod access_validator;
pub mod channel_service;
pub mod chat_service;
pub mod message_service;
pub mod subscription_registry;

use std::sync::Arc;

pub use access_validator::AccessValidator;
pub use channel_service::{ChannelService, StreamEnd};
pub use chat_service::ChatService;
pub use message_service::MessageService;
pub use subscription_registry::{
    BroadcastReport, EventSink, SinkClosed, Subscription, SubscriptionRegistry,
};

use crate::repositories::{ChannelProvider, ChatProvider, MessageProvider};

/// Tunables shared by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLimits {
    pub max_message_length: usize,
    pub subscriber_queue_capacity: usize,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_message_length: 1000,
            subscriber_queue_capacity: 16,
        }
    }
}

/// The three services wired to one set of providers and one registry.
#[derive(Clone)]
pub struct ChatServices {
    pub chats: ChatService,
    pub channels: ChannelService,
    pub messages: MessageService,
    pub registry: SubscriptionRegistry,
}

impl ChatServices {
    pub fn new(
        chat_provider: Arc<dyn ChatProvider>,
        channel_provider: Arc<dyn ChannelProvider>,
        message_provider: Arc<dyn MessageProvider>,
        limits: ServiceLimits,
    ) -> Self {
        let registry = SubscriptionRegistry::new(limits.subscriber_queue_capacity);

        Self {
            chats: ChatService::new(Arc::clone(&chat_provider), Arc::clone(&channel_provider)),
            channels: ChannelService::new(
                Arc::clone(&chat_provider),
                Arc::clone(&channel_provider),
                registry.clone(),
            ),
            messages: MessageService::new(
                chat_provider,
                channel_provider,
                message_provider,
                registry.clone(),
                limits.max_message_length,
            ),
            registry,
        }
    }

    /// Wire every service to a single store implementing all three providers.
    pub fn from_store<S>(store: S, limits: ServiceLimits) -> Self
    where
        S: ChatProvider + ChannelProvider + MessageProvider + Clone + 'static,
    {
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            limits,
        )
    }
}
