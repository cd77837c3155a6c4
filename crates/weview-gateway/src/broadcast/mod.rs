//! Event broadcasting
//!
//! Forwards events from Redis Pub/Sub into the local topic registry.

mod dispatcher;

pub use dispatcher::{RelayDispatcher, RelayDispatcherConfig};
