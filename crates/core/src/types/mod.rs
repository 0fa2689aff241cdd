//! Core types for Cartãozinho.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod progress;
pub mod role;
pub mod timestamp;

pub use id::*;
pub use phone::{Phone, PhoneError, display_phone, format_phone, strip_non_digits};
pub use progress::{StampSlot, progress_percentage, stamp_slots};
pub use role::UserRole;
pub use timestamp::parse_timestamp;
