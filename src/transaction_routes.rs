use crate::{
	constants::TRANSACTIONS_SCOPE,
	handler::{json_error_handler, query_error_handler, TransactionHandler},
	midware::jwt::Authentication,
};
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.service(
		web::scope(TRANSACTIONS_SCOPE)
			.app_data(web::JsonConfig::default().error_handler(json_error_handler))
			.app_data(web::QueryConfig::default().error_handler(query_error_handler))
			// every transaction route needs a verified owner
			.wrap(Authentication)
			.route("", web::post().to(TransactionHandler::create_transaction_handler))
			.route("", web::get().to(TransactionHandler::list_transactions_handler))
			.route("/", web::post().to(TransactionHandler::create_transaction_handler))
			.route("/", web::get().to(TransactionHandler::list_transactions_handler))
			.route("/{id}", web::put().to(TransactionHandler::update_transaction_handler))
			.route("/{id}", web::delete().to(TransactionHandler::delete_transaction_handler)),
	);
}
