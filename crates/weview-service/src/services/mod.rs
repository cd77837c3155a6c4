//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of one
//! request.

pub mod context;
pub mod error;
pub mod friend;
pub mod relay;
pub mod retry;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use friend::FriendService;
pub use relay::RelayService;
pub use retry::RetryPolicy;
pub use session::SessionService;
