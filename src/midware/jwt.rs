use crate::{
	constants::{MESSAGE_INVALID_TOKEN, ONE_WEEK},
	error::AppError,
	models::ErrorResponse,
};
use actix_service::forward_ready;
use actix_web::{
	body::EitherBody,
	dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
	http::{header::Header, Method},
	web, Error as AxError, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use chrono::Utc;
use futures::future::{ok, ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, errors::Error, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use log::{debug, error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
	pub iat: usize,
	pub exp: usize,
	pub sub: String,
}

/// HS256 signing secret, registered as `web::Data<JwtSecret>` application data.
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
	pub fn new(secret: impl Into<String>) -> Self {
		Self(secret.into())
	}
}

pub struct JWT {
	secret: String,
}

impl JWT {
	pub fn new(s: &str) -> Self {
		Self { secret: s.to_string() }
	}

	pub fn create_jwt(&self, user_id: String) -> Result<String, Error> {
		let now = Utc::now().timestamp().max(0) as usize;
		let expiry = now + ONE_WEEK;
		let claims = Claims { iat: now, exp: expiry, sub: user_id };
		debug!("Creating token for subject {}", claims.sub);
		encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.secret.as_ref()))
	}

	pub fn verify_jwt(&self, token: &str) -> Result<Claims, Error> {
		decode::<Claims>(
			token,
			&DecodingKey::from_secret(self.secret.as_ref()),
			&Validation::default(),
		)
		.map(|data| data.claims)
	}
}

/// Rejects requests without a valid bearer token and stores the verified
/// [`Claims`] in the request extensions for [`AuthenticatedUser`].
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError>,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type InitError = ();
	type Transform = AuthenticationMiddleware<S>;
	type Future = Ready<Result<Self::Transform, Self::InitError>>;

	fn new_transform(&self, service: S) -> Self::Future {
		ok(AuthenticationMiddleware { service })
	}
}

pub struct AuthenticationMiddleware<S> {
	service: S,
}

fn verify_request(req: &ServiceRequest) -> Option<Claims> {
	let secret = match req.app_data::<web::Data<JwtSecret>>() {
		Some(secret) => secret,
		None => {
			error!("No JWT secret registered; rejecting {}", req.path());
			return None;
		},
	};
	let auth = Authorization::<Bearer>::parse(req).ok()?;
	match JWT::new(&secret.0).verify_jwt(auth.as_ref().token()) {
		Ok(claims) => Some(claims),
		Err(e) => {
			debug!("Invalid token: {:?}", e);
			None
		},
	}
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError>,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

	forward_ready!(service);

	fn call(&self, req: ServiceRequest) -> Self::Future {
		debug!("## Req: {} {}", req.method(), req.path());

		if Method::OPTIONS != *req.method() {
			match verify_request(&req) {
				Some(claims) => {
					req.extensions_mut().insert(claims);
				},
				None => {
					let (request, _pl) = req.into_parts();
					let response = HttpResponse::Unauthorized()
						.json(ErrorResponse { error: MESSAGE_INVALID_TOKEN.to_string() })
						.map_into_right_body();

					return Box::pin(async { Ok(ServiceResponse::new(request, response)) });
				},
			}
		}

		let res = self.service.call(req);

		Box::pin(async move { res.await.map(ServiceResponse::map_into_left_body) })
	}
}

/// The caller's user id, taken from the claims the middleware verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
	pub id: i32,
}

impl FromRequest for AuthenticatedUser {
	type Error = AppError;
	type Future = Ready<Result<Self, Self::Error>>;

	fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
		let user = req
			.extensions()
			.get::<Claims>()
			.and_then(|claims| claims.sub.parse::<i32>().ok())
			.map(|id| AuthenticatedUser { id })
			.ok_or(AppError::Unauthorized);
		ready(user)
	}
}
