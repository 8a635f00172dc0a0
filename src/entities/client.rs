//! Client entity - The bank customer record.
//!
//! A client is the root aggregate: it owns zero or more accounts, which are
//! stored in their own table and linked back through `client_id`.

use sea_orm::entity::prelude::*;

/// Client database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Server-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Absent when the request did not carry one
    pub date_of_birth: Option<Date>,
    pub phone_number: String,
    /// Externally assigned account number, not checked for uniqueness
    pub account_number: i64,
    /// Branch the client banks with (e.g., "Dansoman")
    pub branch: String,
    pub occupation: String,
    /// National identification number
    pub snnit_number: i64,
    /// When the row was first inserted
    pub created_at: DateTimeUtc,
    /// When the row was last written
    pub updated_at: DateTimeUtc,
    /// Soft delete marker; rows with a value are hidden from queries
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client owns many accounts
    #[sea_orm(has_many = "super::account::Entity")]
    Accounts,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
