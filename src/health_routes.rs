use crate::handler::HealthHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.route("/health", web::get().to(HealthHandler::health_handler));
}
