//! # Courier Gateway Crate
//!
//! The HTTP face of Courier: JSON endpoints for chats, channels and messages
//! plus the `ChatStream` websocket, all routed to the services in
//! `courier-chats`.
//!
//! ## Architecture
//!
//! - **REST**: JSON endpoints with transport-level argument checks
//! - **WebSocket**: Per-channel event streams
//! - **State**: Services, token verifier and the shutdown token
//! - **Middleware**: Principal tokens, CORS and request logging
//!
//! ## Usage
//!
//! ```rust
//! use courier_chats::{ChatServices, MemoryStore, ServiceLimits};
//! use courier_gateway::{create_router, GatewayState, JwtVerifier};
//!
//! let services = ChatServices::from_store(MemoryStore::new(), ServiceLimits::default());
//! let state = GatewayState::new(services, JwtVerifier::new("secret", 0));
//! let app = create_router(state);
//! # drop(app);
//! ```

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod websocket;

pub use error::{GatewayError, GatewayResult};
pub use jwt::{Claims, JwtVerifier};
pub use middleware::{auth_middleware, AuthenticatedUser};
pub use state::GatewayState;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);

    let authenticated = Router::new()
        .merge(rest::create_rest_routes())
        .merge(websocket::create_websocket_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            arc_state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(rest::health::health_check))
        .merge(authenticated)
        .with_state(arc_state)
        .layer(middleware::create_cors_middleware())
        .layer(middleware::create_trace_middleware())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
