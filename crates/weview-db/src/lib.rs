//! # weview-db
//!
//! Storage layer implementing the user repository and friend graph store.
//!
//! ## Overview
//!
//! - PostgreSQL implementations via SQLx (`PgUserRepository`, `PgFriendGraphStore`)
//! - `DashMap`-backed in-memory implementations for single-process runs and tests
//! - Connection pool management and schema bootstrap
//! - Row models and row -> entity mappers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weview_db::pool::{create_pool, ensure_schema, PoolConfig};
//! use weview_db::repositories::PgUserRepository;
//!
//! async fn example(url: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new(url)).await?;
//!     ensure_schema(&pool).await?;
//!     let users = PgUserRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryFriendGraphStore, MemoryUserRepository};
pub use pool::{create_pool, ensure_schema, PgPool, PoolConfig};
pub use repositories::{PgFriendGraphStore, PgUserRepository};
