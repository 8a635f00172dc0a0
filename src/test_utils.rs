//! Shared test utilities for the sample bank service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test clients with sensible defaults.

use crate::{
    config::{DatabaseConfig, database},
    core::client,
    errors::Result,
    models,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    database::init_db(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        log_statements: false,
    })
    .await
}

/// Builds an unsaved client with one account per entry in `account_types`.
///
/// # Defaults
/// * `last_name`: "Mensah"
/// * `date_of_birth`: 1990-03-06
/// * `branch`: "Dansoman"
/// * `account_number`: 111222333345
pub fn sample_client(first_name: &str, account_types: &[&str]) -> models::Client {
    models::Client {
        first_name: first_name.to_string(),
        last_name: "Mensah".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 6),
        phone_number: "0244000000".to_string(),
        accounts: account_types
            .iter()
            .map(|account_type| models::Account {
                account_type: (*account_type).to_string(),
                ..Default::default()
            })
            .collect(),
        account_number: 111_222_333_345,
        branch: "Dansoman".to_string(),
        occupation: "Trader".to_string(),
        snnit_number: 1_234_567,
        ..Default::default()
    }
}

/// Saves a test client with a single checking account.
pub async fn create_test_client(
    db: &DatabaseConnection,
    first_name: &str,
) -> Result<models::Client> {
    client::save_client(db, sample_client(first_name, &["checking"])).await
}
