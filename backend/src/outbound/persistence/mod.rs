//! PostgreSQL persistence adapters.
//!
//! Thin Diesel implementations of the driving ports: each method checks a
//! connection out of the pool, runs its queries, maps rows into domain types,
//! and maps failures through the shared error mapping. Business rules live in
//! the domain layer, not here.

mod diesel_content_repository;
mod diesel_forum_repository;
mod diesel_login_service;
mod diesel_post_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_content_repository::DieselContentRepository;
pub use diesel_forum_repository::DieselForumRepository;
pub use diesel_login_service::DieselLoginService;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
