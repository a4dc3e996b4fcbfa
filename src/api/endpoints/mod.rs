//! API endpoint handlers.
//!
//! Each module corresponds to one portal screen or feature.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notes;
pub mod reports;
