//! Records exchanged with the loyalty backend.

pub mod card;
pub mod customer;
pub mod health;
pub mod notification;
pub mod store;
pub mod user;

pub use card::{CardStore, LoyaltyCard, StampEvent};
pub use customer::{CustomerMatch, StoreCustomer};
pub use health::{DatabaseHealth, HealthReport};
pub use notification::{NotificationDraft, NotificationReceipt};
pub use store::{Store, StoreDraft};
pub use user::User;
