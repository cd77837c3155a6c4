//! Events relayed to subscribers of a user's topic

mod relay_event;

pub use relay_event::RelayEvent;
