//! Account transaction entity - A ledger entry referencing an account.
//!
//! No endpoint reads or writes these rows yet; the table is created so the
//! schema is complete. `account_id` carries no foreign key.

use sea_orm::entity::prelude::*;

/// Account transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Signed amount in minor units
    pub amount: i64,
    /// When the transaction happened
    pub transaction_date: DateTimeUtc,
    pub account_id: i64,
    /// `"deposit"`, `"withdrawal"` or `"transfer"`
    pub transaction_type: String,
    /// Who performed the transaction
    pub transaction_by: String,
    /// Channel: `"atm"`, `"bank"` or `"online"`
    pub transaction_from: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

/// `AccountTransaction` declares no relations so no foreign key is generated
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
