//! # weview-gateway
//!
//! WebSocket gateway delivering relay events to connected users.
//!
//! Each connection at `/ws/{username}` is subscribed to that user's topic for
//! its lifetime and may send frames that publish events to other users.

pub mod broadcast;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;

pub use registry::{Subscription, TopicRegistry};
pub use server::{
    create_app, create_gateway_state, create_router, run, run_server, ws_routes, Backends,
    GatewayState,
};
