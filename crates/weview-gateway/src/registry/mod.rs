//! In-process topic registry

mod topic_registry;

pub use topic_registry::{SubscriberId, Subscription, TopicRegistry};
