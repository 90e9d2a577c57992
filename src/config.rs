use anyhow::Context;
use std::env;

use crate::constants::DEFAULT_SOCKET_URL;

#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub jwt_secret: String,
	pub socket_url: String,
	pub workers: usize,
}

impl Config {
	/// Reads the server configuration from the process environment. Call
	/// `dotenv().ok()` first to pick up a local `.env` file.
	pub fn from_env() -> anyhow::Result<Self> {
		let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
		let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
		if jwt_secret.trim().is_empty() {
			anyhow::bail!("JWT_SECRET must not be empty");
		}
		let socket_url = env::var("SOCKET_URL").unwrap_or_else(|_| DEFAULT_SOCKET_URL.to_string());
		let workers = match env::var("WORKERS") {
			Ok(raw) => raw
				.parse::<usize>()
				.ok()
				.filter(|w| *w > 0)
				.with_context(|| format!("WORKERS must be a positive integer, got {raw:?}"))?,
			Err(_) => num_cpus::get(),
		};

		Ok(Self { database_url, jwt_secret, socket_url, workers })
	}

	/// Only needs the signing secret, for commands that never touch the database.
	pub fn jwt_secret_from_env() -> anyhow::Result<String> {
		env::var("JWT_SECRET").context("JWT_SECRET must be set")
	}
}
