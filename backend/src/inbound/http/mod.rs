//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod doctors;
pub mod error;
pub mod health;
pub mod mappings;
pub mod patients;
pub mod state;
#[cfg(test)]
pub(crate) mod test_support;
pub mod validation;

pub use crate::domain::ApiResult;
