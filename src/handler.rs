use crate::{
	constants::{ERR_CREATE, ERR_DELETE, ERR_LIST, ERR_UPDATE, MESSAGE_CREATED, MESSAGE_DELETED, MESSAGE_UPDATED},
	error::AppError,
	midware::jwt::AuthenticatedUser,
	models::{
		CreateTransactionRequest, HealthResponse, MessageResponse, TransactionQuery,
		TransactionResponse, UpdateTransactionRequest,
	},
	repo::TransactionRepo,
	service::TransactionService,
};
use actix_web::{
	error::{JsonPayloadError, QueryPayloadError},
	web, HttpRequest, HttpResponse, Responder,
};
use uuid::Uuid;

// A malformed id can never match a stored record.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
	Uuid::parse_str(raw).map_err(|_| {
		log::info!("Transaction id {:?} is not a UUID", raw);
		AppError::NotFound
	})
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
	log::warn!("Rejected body for {} {}: {}", req.method(), req.path(), err);
	AppError::validation(format!("Invalid request body: {err}")).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
	log::warn!("Rejected query for {} {}: {}", req.method(), req.path(), err);
	AppError::validation(format!("Invalid query string: {err}")).into()
}

pub struct TransactionHandler {}

impl TransactionHandler {
	pub async fn create_transaction_handler(
		repo: web::Data<dyn TransactionRepo>,
		user: AuthenticatedUser,
		req: web::Json<CreateTransactionRequest>,
	) -> Result<HttpResponse, AppError> {
		let repo = repo.into_inner();
		let transaction =
			web::block(move || TransactionService::new(repo.as_ref()).create(user.id, req.into_inner()))
				.await
				.map_err(|e| AppError::internal(ERR_CREATE, e))??;

		Ok(HttpResponse::Created()
			.json(TransactionResponse { message: MESSAGE_CREATED.to_string(), transaction }))
	}

	pub async fn list_transactions_handler(
		repo: web::Data<dyn TransactionRepo>,
		user: AuthenticatedUser,
		query: web::Query<TransactionQuery>,
	) -> Result<HttpResponse, AppError> {
		let repo = repo.into_inner();
		let list =
			web::block(move || TransactionService::new(repo.as_ref()).list(user.id, query.into_inner()))
				.await
				.map_err(|e| AppError::internal(ERR_LIST, e))??;

		Ok(HttpResponse::Ok().json(list))
	}

	pub async fn update_transaction_handler(
		repo: web::Data<dyn TransactionRepo>,
		user: AuthenticatedUser,
		path: web::Path<String>,
		req: web::Json<UpdateTransactionRequest>,
	) -> Result<HttpResponse, AppError> {
		let id = parse_id(&path.into_inner())?;
		let repo = repo.into_inner();
		let transaction = web::block(move || {
			TransactionService::new(repo.as_ref()).update(user.id, id, req.into_inner())
		})
		.await
		.map_err(|e| AppError::internal(ERR_UPDATE, e))??;

		Ok(HttpResponse::Ok()
			.json(TransactionResponse { message: MESSAGE_UPDATED.to_string(), transaction }))
	}

	pub async fn delete_transaction_handler(
		repo: web::Data<dyn TransactionRepo>,
		user: AuthenticatedUser,
		path: web::Path<String>,
	) -> Result<HttpResponse, AppError> {
		let id = parse_id(&path.into_inner())?;
		let repo = repo.into_inner();
		web::block(move || TransactionService::new(repo.as_ref()).delete(user.id, id))
			.await
			.map_err(|e| AppError::internal(ERR_DELETE, e))??;

		Ok(HttpResponse::Ok().json(MessageResponse { message: MESSAGE_DELETED.to_string() }))
	}
}

pub struct HealthHandler {}

impl HealthHandler {
	pub async fn health_handler() -> impl Responder {
		HttpResponse::Ok()
			.json(HealthResponse { status: "healthy".to_string(), timestamp: chrono::Utc::now() })
	}
}
