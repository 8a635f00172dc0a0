//! Client persistence - The single entry point for client and account storage.
//!
//! Handlers never build queries themselves; they call the functions here, which
//! translate between the wire shapes in [`crate::models`] and the `SeaORM` entities.
//! Writes that touch a client and its accounts run inside one database
//! transaction so a client is never stored with half of its accounts.

use crate::{
    entities::{Account, Client, account, client},
    errors::{Error, Result},
    models,
};
use chrono::Utc;
use sea_orm::{
    ActiveValue::Unchanged, DbBackend, LoaderTrait, PaginatorTrait, QueryOrder, Set, Statement,
    TransactionTrait, prelude::*,
};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Retrieves every client that has not been soft-deleted, with its accounts, ordered by id.
///
/// An empty store yields an empty list.
#[instrument(skip(db))]
pub async fn find_all_clients(db: &DatabaseConnection) -> Result<Vec<models::Client>> {
    let clients = Client::find()
        .filter(client::Column::DeletedAt.is_null())
        .order_by_asc(client::Column::Id)
        .all(db)
        .await?;

    let accounts = clients
        .load_many(
            Account::find()
                .filter(account::Column::DeletedAt.is_null())
                .order_by_asc(account::Column::Id),
            db,
        )
        .await?;

    debug!(count = clients.len(), "Loaded clients");
    Ok(clients
        .into_iter()
        .zip(accounts)
        .map(|(client, accounts)| models::Client::from_parts(client, accounts))
        .collect())
}

/// Finds a client by id, including its accounts.
///
/// Returns [`Error::ClientNotFound`] when no row matches or the row is soft-deleted.
#[instrument(skip(db))]
pub async fn find_client_by_id<C>(db: &C, id: i64) -> Result<models::Client>
where
    C: ConnectionTrait,
{
    let client = Client::find_by_id(id)
        .filter(client::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id })?;

    let accounts = accounts_of(db, &client).await?;
    Ok(models::Client::from_parts(client, accounts))
}

async fn accounts_of<C>(db: &C, client: &client::Model) -> Result<Vec<account::Model>>
where
    C: ConnectionTrait,
{
    client
        .find_related(Account)
        .filter(account::Column::DeletedAt.is_null())
        .order_by_asc(account::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts or updates a client together with its accounts.
///
/// * `id == 0` inserts a new client and assigns its id.
/// * `id > 0` updates the stored row, or inserts one under that id when none exists.
///
/// The submitted accounts replace the stored set: accounts already owned by this
/// client are updated in place, all others are inserted, and stored accounts that
/// are not submitted are removed. Every account is re-parented to the saved client.
/// Timestamps are assigned here; any submitted by the caller are ignored.
///
/// Returns the client as persisted, including server-assigned fields.
#[instrument(skip(db, record), fields(id = record.id))]
pub async fn save_client(db: &DatabaseConnection, record: models::Client) -> Result<models::Client> {
    let now = Utc::now();
    let txn = db.begin().await?;

    let existing = if record.id > 0 {
        Client::find_by_id(record.id).one(&txn).await?
    } else {
        None
    };

    let mut row = client::ActiveModel {
        first_name: Set(record.first_name),
        last_name: Set(record.last_name),
        date_of_birth: Set(record.date_of_birth),
        phone_number: Set(record.phone_number),
        account_number: Set(record.account_number),
        branch: Set(record.branch),
        occupation: Set(record.occupation),
        snnit_number: Set(record.snnit_number),
        updated_at: Set(now),
        ..Default::default()
    };

    // A soft-deleted row is replaced as if it were absent
    row.deleted_at = Set(None);
    let saved = if let Some(stored) = existing {
        row.id = Unchanged(stored.id);
        if stored.deleted_at.is_some() {
            row.created_at = Set(now);
        }
        row.update(&txn).await?
    } else if record.id > 0 {
        row.id = Set(record.id);
        row.created_at = Set(now);
        let inserted = row.insert(&txn).await?;
        sync_client_id_sequence(&txn).await?;
        inserted
    } else {
        row.created_at = Set(now);
        row.insert(&txn).await?
    };

    let stored_accounts = Account::find()
        .filter(account::Column::ClientId.eq(saved.id))
        .all(&txn)
        .await?;
    let owned: HashSet<i64> = stored_accounts.iter().map(|a| a.id).collect();
    let mut kept = HashSet::new();

    for submitted in record.accounts {
        let mut row = account::ActiveModel {
            account_type: Set(submitted.account_type),
            client_id: Set(saved.id),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        if owned.contains(&submitted.id) {
            row.id = Unchanged(submitted.id);
            kept.insert(submitted.id);
            row.update(&txn).await?;
        } else {
            row.created_at = Set(now);
            row.insert(&txn).await?;
        }
    }

    let removed: Vec<i64> = owned.difference(&kept).copied().collect();
    if !removed.is_empty() {
        Account::delete_many()
            .filter(account::Column::Id.is_in(removed))
            .exec(&txn)
            .await?;
    }

    let accounts = accounts_of(&txn, &saved).await?;
    txn.commit().await?;

    info!(id = saved.id, accounts = accounts.len(), "Saved client");
    Ok(models::Client::from_parts(saved, accounts))
}

/// Moves the Postgres id sequence of `clients` past the largest stored id.
///
/// Inserting with an explicit id never calls `nextval`, so without this a later
/// server-assigned id could collide with it. `SQLite` tracks this on its own.
async fn sync_client_id_sequence<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    if backend != DbBackend::Postgres {
        return Ok(());
    }
    db.execute(Statement::from_string(backend, SYNC_CLIENT_ID_SEQUENCE))
        .await?;
    debug!("Synchronized clients id sequence");
    Ok(())
}

const SYNC_CLIENT_ID_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('clients', 'id'), \
     GREATEST((SELECT MAX(id) FROM clients), 1))";

/// Removes a client and every account it owns.
///
/// Deleting an id that does not exist is not an error.
#[instrument(skip(db))]
pub async fn delete_client_by_id(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let accounts = Account::delete_many()
        .filter(account::Column::ClientId.eq(id))
        .exec(&txn)
        .await?;
    let clients = Client::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        id,
        clients = clients.rows_affected,
        accounts = accounts.rows_affected,
        "Deleted client"
    );
    Ok(())
}

/// Inserts the demo client "Kofi Mensah" with a checking, savings and current
/// account, unless the store already holds clients.
///
/// Returns the inserted client, or `None` when nothing was seeded.
pub async fn seed_demo_client(db: &DatabaseConnection) -> Result<Option<models::Client>> {
    if Client::find().count(db).await? > 0 {
        debug!("Clients already present, skipping demo data");
        return Ok(None);
    }

    let accounts = ["checking", "savings", "current"]
        .into_iter()
        .map(|account_type| models::Account {
            account_type: account_type.to_string(),
            ..Default::default()
        })
        .collect();

    let demo = models::Client {
        first_name: "Kofi".to_string(),
        last_name: "Mensah".to_string(),
        date_of_birth: Some(Utc::now().date_naive()),
        accounts,
        account_number: 111_222_333_345,
        branch: "Dansoman".to_string(),
        ..Default::default()
    };

    save_client(db, demo).await.map(Some)
}
