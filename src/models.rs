//! Wire representations of clients, accounts and account transactions.
//!
//! These are the JSON shapes exchanged over HTTP. Field names are camelCase
//! regardless of the snake_case storage columns in [`crate::entities`]. Every
//! field is optional on decode: missing fields take their zero value and unknown
//! fields are ignored.

use crate::entities::{account, account_transaction, client};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Creation, update and soft-delete times shared by every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeStamp {
    #[serde(with = "rfc3339")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "rfc3339")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set when the record is soft-deleted
    #[serde(with = "rfc3339")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TimeStamp {
    fn from_columns(
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            created_at: Some(created_at),
            updated_at: Some(updated_at),
            deleted_at,
        }
    }
}

/// A bank customer together with the accounts they own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    /// Zero until the client has been saved
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(with = "calendar_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub accounts: Vec<Account>,
    #[serde(deserialize_with = "null_as_default")]
    pub account_number: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub occupation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub snnit_number: i64,
    #[serde(flatten)]
    pub timestamps: TimeStamp,
}

impl Client {
    /// Assembles the wire shape from a stored client row and its account rows.
    #[must_use]
    pub fn from_parts(model: client::Model, accounts: Vec<account::Model>) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            phone_number: model.phone_number,
            accounts: accounts.into_iter().map(Account::from).collect(),
            account_number: model.account_number,
            branch: model.branch,
            occupation: model.occupation,
            snnit_number: model.snnit_number,
            timestamps: TimeStamp::from_columns(
                model.created_at,
                model.updated_at,
                model.deleted_at,
            ),
        }
    }
}

/// A single account as seen by API consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub account_type: String,
    /// Overwritten with the owning client's id whenever the client is saved
    #[serde(deserialize_with = "null_as_default")]
    pub client_id: i64,
    #[serde(flatten)]
    pub timestamps: TimeStamp,
}

impl From<account::Model> for Account {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            account_type: model.account_type,
            client_id: model.client_id,
            timestamps: TimeStamp::from_columns(
                model.created_at,
                model.updated_at,
                model.deleted_at,
            ),
        }
    }
}

/// A ledger entry against an account. No endpoint serves these yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountTransaction {
    #[serde(deserialize_with = "null_as_default")]
    pub amount: i64,
    #[serde(with = "rfc3339")]
    pub transaction_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub account_id: i64,
    /// Older clients send this under the misspelled `trasanctionType` key
    #[serde(alias = "trasanctionType", deserialize_with = "null_as_default")]
    pub transaction_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_from: String,
    #[serde(flatten)]
    pub timestamps: TimeStamp,
}

impl From<account_transaction::Model> for AccountTransaction {
    fn from(model: account_transaction::Model) -> Self {
        Self {
            amount: model.amount,
            transaction_date: Some(model.transaction_date),
            account_id: model.account_id,
            transaction_type: model.transaction_type,
            transaction_by: model.transaction_by,
            transaction_from: model.transaction_from,
            timestamps: TimeStamp::from_columns(
                model.created_at,
                model.updated_at,
                model.deleted_at,
            ),
        }
    }
}

/// Decodes an explicit `null` as the field's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 timestamps in UTC with whole seconds, e.g. `2024-05-01T10:00:00Z`.
mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|at| at.with_timezone(&Utc))
                    .map_err(D::Error::custom)
            })
            .transpose()
    }
}

/// Calendar dates written as `YYYY-MM-DD`. Full RFC 3339 timestamps are accepted
/// on input and reduced to their date.
mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%Y-%m-%d";

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        NaiveDate::parse_from_str(&raw, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|at| at.date_naive()))
            .map(Some)
            .map_err(D::Error::custom)
    }
}
