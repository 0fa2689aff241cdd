//! Cartãozinho Core - Shared types library.
//!
//! This crate provides the domain types used across the Cartãozinho client:
//! - `client` - API client and session controller
//! - `cli` - Terminal front end for customers and merchants
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Validation that must happen before a request is sent
//! lives here so every front end shares it.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, phone numbers, roles, and stamp progress
//! - [`models`] - Records returned by the backend and validated form drafts
//! - [`validation`] - Client-side validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::ValidationError;
