use crate::{
	db::DbPool,
	models::{NewTransaction, Transaction, TransactionChangeset, TransactionFilter},
	schema::transactions,
};
use diesel::prelude::*;
use uuid::Uuid;

/// Owner-scoped access to stored transactions. Every lookup, update and
/// delete filters on `owner` as well as the record id.
#[cfg_attr(test, mockall::automock)]
pub trait TransactionRepo: Send + Sync {
	fn insert(&self, new_transaction: NewTransaction) -> anyhow::Result<Transaction>;

	fn find_owned(&self, owner: i32, id: Uuid) -> anyhow::Result<Option<Transaction>>;

	/// Matching records ordered by `date` descending.
	fn list(&self, owner: i32, filter: &TransactionFilter) -> anyhow::Result<Vec<Transaction>>;

	/// `Ok(None)` when no record with `id` belongs to `owner`.
	fn update(
		&self,
		owner: i32,
		id: Uuid,
		changes: TransactionChangeset,
	) -> anyhow::Result<Option<Transaction>>;

	/// `Ok(false)` when nothing was deleted.
	fn delete(&self, owner: i32, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgTransactionRepo {
	pool: DbPool,
}

impl PgTransactionRepo {
	pub fn new(pool: DbPool) -> Self {
		Self { pool }
	}
}

impl TransactionRepo for PgTransactionRepo {
	fn insert(&self, new_transaction: NewTransaction) -> anyhow::Result<Transaction> {
		let mut conn = self.pool.get()?;
		let transaction = diesel::insert_into(transactions::table)
			.values(&new_transaction)
			.returning(Transaction::as_returning())
			.get_result(&mut conn)?;
		Ok(transaction)
	}

	fn find_owned(&self, owner: i32, id: Uuid) -> anyhow::Result<Option<Transaction>> {
		let mut conn = self.pool.get()?;
		let transaction = transactions::table
			.filter(transactions::id.eq(id))
			.filter(transactions::user_id.eq(owner))
			.select(Transaction::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(transaction)
	}

	fn list(&self, owner: i32, filter: &TransactionFilter) -> anyhow::Result<Vec<Transaction>> {
		let mut conn = self.pool.get()?;
		let mut query = transactions::table
			.filter(transactions::user_id.eq(owner))
			.select(Transaction::as_select())
			.into_boxed();

		if let Some(kind) = filter.transaction_type {
			query = query.filter(transactions::transaction_type.eq(kind));
		}
		if let Some(category) = &filter.category {
			query = query.filter(transactions::category.eq(category.clone()));
		}
		if let Some(start) = filter.start_date {
			query = query.filter(transactions::date.ge(start));
		}
		if let Some(end) = filter.end_date {
			query = query.filter(transactions::date.le(end));
		}

		let transactions = query.order(transactions::date.desc()).load(&mut conn)?;
		Ok(transactions)
	}

	fn update(
		&self,
		owner: i32,
		id: Uuid,
		changes: TransactionChangeset,
	) -> anyhow::Result<Option<Transaction>> {
		let mut conn = self.pool.get()?;
		// Unconditional write: concurrent updates to the same row are last-write-wins.
		let transaction = diesel::update(
			transactions::table
				.filter(transactions::id.eq(id))
				.filter(transactions::user_id.eq(owner)),
		)
		.set(&changes)
		.returning(Transaction::as_returning())
		.get_result(&mut conn)
		.optional()?;
		Ok(transaction)
	}

	fn delete(&self, owner: i32, id: Uuid) -> anyhow::Result<bool> {
		let mut conn = self.pool.get()?;
		let deleted = diesel::delete(
			transactions::table
				.filter(transactions::id.eq(id))
				.filter(transactions::user_id.eq(owner)),
		)
		.execute(&mut conn)?;
		Ok(deleted > 0)
	}
}
