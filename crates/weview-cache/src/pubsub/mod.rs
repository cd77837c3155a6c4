//! Redis Pub/Sub module.
//!
//! Carries relay events between instances on `user:{username}` channels.

mod publisher;
mod subscriber;

pub use publisher::RedisPublisher;
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};
