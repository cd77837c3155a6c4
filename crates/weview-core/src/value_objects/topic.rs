//! Topic - the per-user channel that presence and invite events are relayed on

use std::fmt;

use super::Username;

/// Per-user relay topic
///
/// Each user implicitly owns one topic. `name()` is the key used on the
/// shared bus (`user:{username}`); `destination()` is the name clients see
/// (`/topic/user/{username}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    owner: Username,
}

impl Topic {
    const BUS_PREFIX: &'static str = "user:";
    const DESTINATION_PREFIX: &'static str = "/topic/user/";

    /// Topic owned by the given user
    pub fn user(owner: &Username) -> Self {
        Self {
            owner: owner.clone(),
        }
    }

    /// User that owns this topic
    #[inline]
    pub fn owner(&self) -> &Username {
        &self.owner
    }

    /// Shared bus channel name
    pub fn name(&self) -> String {
        format!("{}{}", Self::BUS_PREFIX, self.owner)
    }

    /// Client-facing destination
    pub fn destination(&self) -> String {
        format!("{}{}", Self::DESTINATION_PREFIX, self.owner)
    }

    /// Glob pattern matching every user topic on the bus
    pub fn pattern() -> &'static str {
        "user:*"
    }

    /// Parse a bus channel name back into a topic
    pub fn from_name(name: &str) -> Option<Self> {
        let owner = name.strip_prefix(Self::BUS_PREFIX)?;
        Username::parse(owner).ok().map(|owner| Self { owner })
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::BUS_PREFIX, self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names() {
        let alice = Username::parse("alice").unwrap();
        let topic = Topic::user(&alice);

        assert_eq!(topic.name(), "user:alice");
        assert_eq!(topic.destination(), "/topic/user/alice");
        assert_eq!(topic.to_string(), "user:alice");
        assert_eq!(topic.owner(), &alice);
    }

    #[test]
    fn test_from_name() {
        let topic = Topic::from_name("user:bob").unwrap();
        assert_eq!(topic.owner().as_str(), "bob");

        assert!(Topic::from_name("room:1").is_none());
        assert!(Topic::from_name("user:").is_none());
    }
}
