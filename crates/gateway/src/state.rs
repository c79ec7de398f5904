//! Shared application state for the gateway

use courier_chats::ChatServices;
use tokio_util::sync::CancellationToken;

use crate::jwt::JwtVerifier;

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Chat, channel and message services plus the subscription registry
    pub services: ChatServices,
    /// Principal token verification
    pub jwt: JwtVerifier,
    /// Parent of every stream's cancellation token
    pub shutdown: CancellationToken,
}

impl GatewayState {
    pub fn new(services: ChatServices, jwt: JwtVerifier) -> Self {
        Self {
            services,
            jwt,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops every open stream when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}
