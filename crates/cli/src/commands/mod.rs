//! One module per command group.

pub mod auth;
pub mod cards;
pub mod diagnose;
pub mod home;
pub mod notify;
pub mod stamps;
pub mod store;
