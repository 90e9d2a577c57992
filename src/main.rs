mod config;
mod constants;
mod db;
mod error;
mod handler;
mod health_routes;
mod midware;
mod models;
mod repo;
mod schema;
mod service;
#[cfg(test)]
mod tests;
mod transaction_routes;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use config::Config;
use dotenv::dotenv;
use env_logger::Env;
use midware::jwt::{JwtSecret, JWT};
use repo::{PgTransactionRepo, TransactionRepo};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fintrack-api", version, about = "Personal finance transactions API")]
struct Cli {
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Print a bearer token for the given user id, signed with JWT_SECRET
	IssueToken {
		#[arg(long)]
		user_id: i32,
	},
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	dotenv().ok();
	env_logger::init_from_env(Env::default().default_filter_or("info"));

	match Cli::parse().command.unwrap_or(Command::Serve) {
		Command::Serve => serve().await,
		Command::IssueToken { user_id } => {
			let secret = Config::jwt_secret_from_env()?;
			let token = JWT::new(&secret).create_jwt(user_id.to_string())?;
			println!("{}", token);
			Ok(())
		},
	}
}

async fn serve() -> anyhow::Result<()> {
	let config = Config::from_env()?;
	let pool = db::get_db_pool(&config.database_url)?;
	db::init(&pool)?;

	let repo: Arc<dyn TransactionRepo> = Arc::new(PgTransactionRepo::new(pool));
	let jwt_secret = JwtSecret::new(config.jwt_secret.as_str());
	log::info!("Listening on: {} with {} workers", config.socket_url, config.workers);

	HttpServer::new(move || {
		App::new()
			.app_data(web::Data::from(repo.clone()))
			.app_data(web::Data::new(jwt_secret.clone()))
			.wrap(
				Cors::default()
					.allow_any_origin()
					.allow_any_method()
					.allow_any_header()
					.supports_credentials()
					.max_age(3600),
			)
			.wrap(actix_web::middleware::Logger::default())
			.configure(health_routes::init)
			.configure(transaction_routes::init)
	})
	.workers(config.workers)
	.bind(&config.socket_url)?
	.run()
	.await?;

	Ok(())
}
