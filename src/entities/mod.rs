//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the storage side of the client, account and
//! account transaction records. Wire shapes live in [`crate::models`].

pub mod account;
pub mod account_transaction;
pub mod client;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use account_transaction::{
    Column as AccountTransactionColumn, Entity as AccountTransaction,
    Model as AccountTransactionModel,
};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
