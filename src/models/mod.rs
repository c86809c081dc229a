//! Core data models for coinlog
//!
//! Transactions, their kind-specific legs, and the fixed-point quantity
//! type used for every amount.

pub mod ids;
pub mod kind;
pub mod quantity;
pub mod transaction;

pub use ids::TransactionId;
pub use kind::TransactionKind;
pub use quantity::{Quantity, QuantityParseError};
pub use transaction::{Leg, Movement, Transaction};
