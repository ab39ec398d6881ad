//! Persisted record payloads.
//!
//! Each record registers its synchronized fields once and publishes a column
//! catalog for database binders. Fields left out of the registry are runtime
//! state and never leave the process.

pub mod account;
pub mod character;
pub mod item;

pub use account::Account;
pub use character::CharacterStats;
pub use item::ItemStats;
