//! Database connection pool management

mod postgres;

pub use postgres::{create_pool, ensure_schema, health_check, PoolConfig};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
