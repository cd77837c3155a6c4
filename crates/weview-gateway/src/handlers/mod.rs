//! Client frame handlers
//!
//! Maps each client frame to the relay operation it names.

mod error;

pub use error::{HandlerError, HandlerResult};

use weview_service::RelayService;

use crate::protocol::{ClientFrame, Destination};
use crate::server::GatewayState;

/// Dispatch incoming client frames to the relay service
pub struct FrameDispatcher;

impl FrameDispatcher {
    /// Decode and handle a text frame from `owner`'s connection
    ///
    /// Returns the number of subscribers the resulting event reached.
    pub async fn dispatch_text(state: &GatewayState, owner: &str, text: &str) -> HandlerResult<usize> {
        let frame = ClientFrame::from_json(text)
            .map_err(|e| HandlerError::InvalidPayload(e.to_string()))?;
        Self::dispatch(state, owner, &frame).await
    }

    /// Handle a decoded client frame
    pub async fn dispatch(state: &GatewayState, owner: &str, frame: &ClientFrame) -> HandlerResult<usize> {
        let relay = RelayService::new(state.service_context());
        let actor = frame.actor(owner);
        let target = frame.target.as_str();

        let delivered = match frame.destination {
            Destination::FriendLogin => relay.publish_login(actor, target).await?,
            Destination::FriendLogout => relay.publish_logout(actor, target).await?,
            Destination::Invite => relay.publish_invite(actor, target).await?,
            Destination::Accept => relay.publish_accept_invite(actor, target).await?,
        };

        tracing::trace!(
            destination = frame.destination.as_str(),
            actor,
            target,
            delivered,
            "Client frame handled"
        );
        Ok(delivered)
    }
}
