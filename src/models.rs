use crate::{
	constants::{MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH, MESSAGE_INVALID_TYPE},
	schema::transactions,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use diesel::{
	deserialize::{self, FromSql, FromSqlRow},
	expression::AsExpression,
	pg::{Pg, PgValue},
	prelude::*,
	serialize::{self, IsNull, Output, ToSql},
	sql_types::Text,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, io::Write, str::FromStr};
use validator::Validate;

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
	Income,
	Expense,
	Saving,
}

impl TransactionType {
	pub fn as_str(&self) -> &str {
		match self {
			TransactionType::Income => "income",
			TransactionType::Expense => "expense",
			TransactionType::Saving => "saving",
		}
	}
}

impl fmt::Display for TransactionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TransactionType {
	type Err = &'static str;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"income" => Ok(TransactionType::Income),
			"expense" => Ok(TransactionType::Expense),
			"saving" => Ok(TransactionType::Saving),
			_ => Err(MESSAGE_INVALID_TYPE),
		}
	}
}

impl ToSql<Text, Pg> for TransactionType {
	fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
		out.write_all(self.as_str().as_bytes())?;
		Ok(IsNull::No)
	}
}

impl FromSql<Text, Pg> for TransactionType {
	fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
		let raw = std::str::from_utf8(bytes.as_bytes())?;
		raw.parse::<TransactionType>().map_err(|_| format!("Unrecognized transaction type: {raw}").into())
	}
}

/// A stored transaction. JSON field names follow the public API (`userId`, `type`).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(Pg))]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	pub id: uuid::Uuid,
	pub user_id: i32,
	#[serde(rename = "type")]
	pub transaction_type: TransactionType,
	pub amount: BigDecimal,
	pub category: String,
	pub description: Option<String>,
	pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransaction {
	pub id: uuid::Uuid,
	pub user_id: i32,
	pub transaction_type: TransactionType,
	pub amount: BigDecimal,
	pub category: String,
	pub description: Option<String>,
	pub date: DateTime<Utc>,
}

/// Columns touched by a partial update. `None` leaves a column alone;
/// `description: Some(None)` writes NULL.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = transactions)]
pub struct TransactionChangeset {
	pub transaction_type: Option<TransactionType>,
	pub amount: Option<BigDecimal>,
	pub category: Option<String>,
	pub description: Option<Option<String>>,
	pub date: Option<DateTime<Utc>>,
}

impl TransactionChangeset {
	pub fn is_empty(&self) -> bool {
		self.transaction_type.is_none() &&
			self.amount.is_none() &&
			self.category.is_none() &&
			self.description.is_none() &&
			self.date.is_none()
	}
}

/// Validated list filters, all owner-scoped by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
	pub transaction_type: Option<TransactionType>,
	pub category: Option<String>,
	pub start_date: Option<DateTime<Utc>>,
	pub end_date: Option<DateTime<Utc>>,
}

// Every field is optional at the serde level so that a missing field is
// reported with the API's own validation message rather than a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateTransactionRequest {
	#[serde(rename = "type")]
	pub transaction_type: Option<String>,
	#[serde(default, deserialize_with = "deserialize_amount")]
	pub amount: Option<BigDecimal>,
	#[validate(length(min = 1, max = MAX_CATEGORY_LENGTH))]
	pub category: Option<String>,
	#[validate(length(max = MAX_DESCRIPTION_LENGTH))]
	pub description: Option<String>,
	pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTransactionRequest {
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub transaction_type: Option<String>,
	#[serde(default, deserialize_with = "deserialize_amount", skip_serializing_if = "Option::is_none")]
	pub amount: Option<BigDecimal>,
	#[serde(skip_serializing_if = "Option::is_none")]
	#[validate(length(min = 1, max = MAX_CATEGORY_LENGTH))]
	pub category: Option<String>,
	/// Absent: unchanged. `null`: cleared.
	#[serde(default, deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
	#[validate(length(max = MAX_DESCRIPTION_LENGTH))]
	pub description: Option<Option<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Deserialize::deserialize(deserializer).map(Some)
}

/// Reads a JSON number or numeric string through its shortest decimal text,
/// so `12.34` is stored as exactly `12.34` rather than its binary expansion.
/// `null` and `""` read as missing.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
		None | Some(serde_json::Value::Null) => return Ok(None),
		Some(serde_json::Value::Number(n)) => n.to_string(),
		Some(serde_json::Value::String(s)) if s.trim().is_empty() => return Ok(None),
		Some(serde_json::Value::String(s)) => s,
		Some(other) => return Err(de::Error::custom(format!("invalid amount: {other}"))),
	};
	raw.trim()
		.parse::<BigDecimal>()
		.map(Some)
		.map_err(|_| de::Error::custom(format!("invalid amount: {raw}")))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
	#[serde(rename = "type")]
	pub transaction_type: Option<String>,
	pub category: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
	pub total_income: BigDecimal,
	pub total_expense: BigDecimal,
	pub total_saving: BigDecimal,
	pub balance: BigDecimal,
}

impl Summary {
	/// Per-type totals over exactly the given transactions, and
	/// `balance = income - expense - saving`.
	pub fn from_transactions(transactions: &[Transaction]) -> Self {
		let mut summary = Summary::default();
		for transaction in transactions {
			let amount = transaction.amount.clone();
			match transaction.transaction_type {
				TransactionType::Income => summary.total_income += amount,
				TransactionType::Expense => summary.total_expense += amount,
				TransactionType::Saving => summary.total_saving += amount,
			}
		}
		summary.balance = &summary.total_income - &summary.total_expense - &summary.total_saving;
		summary
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionList {
	pub transactions: Vec<Transaction>,
	pub summary: Summary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
	pub message: String,
	pub transaction: Transaction,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
	pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
	pub timestamp: DateTime<Utc>,
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
	let raw = raw.trim();
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Some(dt.with_timezone(&Utc));
	}
	if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
		return Some(Utc.from_utc_datetime(&naive));
	}
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.ok()
		.and_then(|d| d.and_hms_opt(0, 0, 0))
		.map(|naive| Utc.from_utc_datetime(&naive))
}
