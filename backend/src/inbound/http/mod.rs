//! HTTP inbound adapter exposing the portal's REST endpoints.

pub mod achievements;
pub mod admin;
pub mod announcements;
pub mod error;
pub mod forum;
pub mod health;
pub mod library;
pub mod posts;
pub mod session;
pub mod state;
pub mod suggestions;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod views;

pub use error::ApiResult;
