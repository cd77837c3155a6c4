//! # weview-service
//!
//! Application layer coordinating presence, the friend graph and the event
//! relay. Services validate preconditions, mutate the stores and decide which
//! events to publish.

pub mod dto;
pub mod services;

pub use services::{
    FriendService, RelayService, RetryPolicy, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SessionService,
};
