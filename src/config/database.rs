//! Database configuration module for the sample bank service.
//!
//! This module opens the `SeaORM` connection and creates the clients, accounts and
//! account transactions tables from their entity definitions. Table creation uses
//! `Schema::create_table_from_entity` with `IF NOT EXISTS`, so it is safe to run on
//! every startup against an existing database.

use crate::config::DatabaseConfig;
use crate::entities::{Account, AccountTransaction, Client};
use crate::errors::{Error, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Creates the parent directory of a file-backed `SQLite` database, if any.
fn ensure_sqlite_parent_dir(url: &str) -> Result<()> {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::Config {
            message: format!("Failed to create database directory {}: {e}", parent.display()),
        })?;
    }
    Ok(())
}

/// Establishes the connection described by `config`.
///
/// Statement logging is routed through `tracing` when `log_statements` is set.
#[instrument(skip(config), fields(url = %config.url))]
pub async fn create_connection(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    ensure_sqlite_parent_dir(&config.url)?;

    let mut options = ConnectOptions::new(config.url.clone());
    options.sqlx_logging(config.log_statements);

    debug!("Connecting to database");
    Database::connect(options).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet, parents before children.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut client_table = schema.create_table_from_entity(Client);
    let mut account_table = schema.create_table_from_entity(Account);
    let mut transaction_table = schema.create_table_from_entity(AccountTransaction);

    client_table.if_not_exists();
    account_table.if_not_exists();
    transaction_table.if_not_exists();

    db.execute(builder.build(&client_table)).await?;
    db.execute(builder.build(&account_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;

    info!("Database tables ensured");
    Ok(())
}

/// Connects and ensures the schema in one step, as done at startup.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let db = create_connection(config).await?;
    create_tables(&db).await?;
    Ok(db)
}
