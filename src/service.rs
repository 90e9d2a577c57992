use crate::{
	constants::{
		ERR_CREATE, ERR_DELETE, ERR_LIST, ERR_UPDATE, MAX_CATEGORY_LENGTH,
		MAX_DESCRIPTION_LENGTH, MESSAGE_INVALID_AMOUNT, MESSAGE_REQUIRED_FIELDS,
	},
	error::AppError,
	models::{
		parse_date, CreateTransactionRequest, NewTransaction, Summary, Transaction,
		TransactionChangeset, TransactionFilter, TransactionList, TransactionQuery,
		TransactionType, UpdateTransactionRequest,
	},
	repo::TransactionRepo,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Validation, owner scoping and summary aggregation over a [`TransactionRepo`].
///
/// The owner id is always passed in explicitly; the service never looks at
/// request state. Validation runs before any call into the repository.
pub struct TransactionService<'a> {
	repo: &'a dyn TransactionRepo,
}

impl<'a> TransactionService<'a> {
	pub fn new(repo: &'a dyn TransactionRepo) -> Self {
		Self { repo }
	}

	pub fn create(
		&self,
		owner: i32,
		req: CreateTransactionRequest,
	) -> Result<Transaction, AppError> {
		// Zero counts as missing, same as an empty string.
		let (Some(kind), Some(amount), Some(category)) = (
			non_empty(req.transaction_type.as_deref()),
			req.amount.clone().filter(|a| *a != BigDecimal::from(0)),
			non_empty(req.category.as_deref()).map(str::to_string),
		) else {
			log::warn!("Rejected transaction for user {}: missing required fields", owner);
			return Err(AppError::validation(MESSAGE_REQUIRED_FIELDS));
		};
		let transaction_type = parse_type(kind)?;
		check_amount(&amount)?;
		req.validate().map_err(validation_error)?;
		let date = match non_empty(req.date.as_deref()) {
			Some(raw) => parse_field_date(raw, "date")?,
			None => Utc::now(),
		};

		let new_transaction = NewTransaction {
			id: Uuid::new_v4(),
			user_id: owner,
			transaction_type,
			amount,
			category,
			description: req.description.filter(|d| !d.is_empty()),
			date,
		};
		let transaction =
			self.repo.insert(new_transaction).map_err(|e| AppError::internal(ERR_CREATE, e))?;

		log::info!("Transaction {} created for user {}", transaction.id, owner);
		Ok(transaction)
	}

	pub fn list(&self, owner: i32, query: TransactionQuery) -> Result<TransactionList, AppError> {
		let filter = build_filter(query)?;
		let transactions =
			self.repo.list(owner, &filter).map_err(|e| AppError::internal(ERR_LIST, e))?;
		let summary = Summary::from_transactions(&transactions);

		log::info!("Retrieved {} transactions for user {}", transactions.len(), owner);
		Ok(TransactionList { transactions, summary })
	}

	/// Writes only the supplied fields. Concurrent updates of the same record
	/// are not serialized here; the store's last write wins.
	pub fn update(
		&self,
		owner: i32,
		id: Uuid,
		req: UpdateTransactionRequest,
	) -> Result<Transaction, AppError> {
		let changes = build_changeset(req)?;

		let existing = self
			.repo
			.find_owned(owner, id)
			.map_err(|e| AppError::internal(ERR_UPDATE, e))?
			.ok_or(AppError::NotFound)?;
		if changes.is_empty() {
			return Ok(existing);
		}

		let transaction = self
			.repo
			.update(owner, id, changes)
			.map_err(|e| AppError::internal(ERR_UPDATE, e))?
			.ok_or(AppError::NotFound)?;

		log::info!("Transaction {} updated for user {}", id, owner);
		Ok(transaction)
	}

	pub fn delete(&self, owner: i32, id: Uuid) -> Result<(), AppError> {
		self.repo
			.find_owned(owner, id)
			.map_err(|e| AppError::internal(ERR_DELETE, e))?
			.ok_or(AppError::NotFound)?;

		let deleted = self.repo.delete(owner, id).map_err(|e| AppError::internal(ERR_DELETE, e))?;
		if !deleted {
			return Err(AppError::NotFound);
		}

		log::info!("Transaction {} deleted for user {}", id, owner);
		Ok(())
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

fn parse_type(raw: &str) -> Result<TransactionType, AppError> {
	raw.parse::<TransactionType>().map_err(|msg| {
		log::warn!("Rejected transaction type {:?}", raw);
		AppError::validation(msg)
	})
}

fn check_amount(amount: &BigDecimal) -> Result<(), AppError> {
	if *amount <= BigDecimal::from(0) {
		log::warn!("Rejected transaction amount: {}", amount);
		return Err(AppError::validation(MESSAGE_INVALID_AMOUNT));
	}
	Ok(())
}

fn parse_field_date(raw: &str, field: &str) -> Result<DateTime<Utc>, AppError> {
	parse_date(raw).ok_or_else(|| AppError::validation(format!("Invalid {field}: {raw}")))
}

fn validation_error(errors: ValidationErrors) -> AppError {
	let fields = errors.field_errors();
	let message = if fields.contains_key("category") {
		format!("Category must be between 1 and {MAX_CATEGORY_LENGTH} characters")
	} else if fields.contains_key("description") {
		format!("Description must be at most {MAX_DESCRIPTION_LENGTH} characters")
	} else {
		errors.to_string()
	};
	log::warn!("Rejected transaction fields: {}", errors);
	AppError::validation(message)
}

fn build_filter(query: TransactionQuery) -> Result<TransactionFilter, AppError> {
	Ok(TransactionFilter {
		transaction_type: non_empty(query.transaction_type.as_deref())
			.map(parse_type)
			.transpose()?,
		category: query.category.filter(|c| !c.is_empty()),
		start_date: non_empty(query.start_date.as_deref())
			.map(|raw| parse_field_date(raw, "startDate"))
			.transpose()?,
		end_date: non_empty(query.end_date.as_deref())
			.map(|raw| parse_field_date(raw, "endDate"))
			.transpose()?,
	})
}

fn build_changeset(req: UpdateTransactionRequest) -> Result<TransactionChangeset, AppError> {
	req.validate().map_err(validation_error)?;

	let amount = match req.amount {
		Some(amount) => {
			check_amount(&amount)?;
			Some(amount)
		},
		None => None,
	};

	Ok(TransactionChangeset {
		transaction_type: req.transaction_type.as_deref().map(parse_type).transpose()?,
		amount,
		category: req.category,
		description: req.description.map(|d| d.filter(|d| !d.is_empty())),
		date: non_empty(req.date.as_deref()).map(|raw| parse_field_date(raw, "date")).transpose()?,
	})
}
