use std::sync::Arc;

use actix_web::{http::StatusCode, test, App};
use bigdecimal::BigDecimal;
use serde_json::json;

use crate::{
	models::{
		ErrorResponse, HealthResponse, MessageResponse, TransactionList, TransactionResponse,
		TransactionType,
	},
	tests::{
		fixtures::TestFixtures,
		test_utils::{bearer, configure, InMemoryTransactionRepo},
	},
};

const ALICE: i32 = 12;
const BOB: i32 = 34;

#[actix_web::test]
async fn test_health_needs_no_token() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo))).await;

	let resp = test::TestRequest::get().uri("/health").send_request(&app).await;

	assert_eq!(resp.status(), StatusCode::OK);
	let body: HealthResponse = test::read_body_json(resp).await;
	assert_eq!(body.status, "healthy");
}

#[actix_web::test]
async fn test_transactions_require_token() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.set_json(TestFixtures::income(100, "salary"))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

	let resp = test::TestRequest::get()
		.uri("/api/transactions")
		.insert_header(("Authorization", "Bearer not-a-jwt"))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
	let body: ErrorResponse = test::read_body_json(resp).await;
	assert_eq!(body.error, "Invalid or missing token");

	assert!(repo.all().is_empty());
}

#[actix_web::test]
async fn test_create_transaction() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let before = chrono::Utc::now();
	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.set_json(TestFixtures::income(100, "salary"))
		.send_request(&app)
		.await;

	assert_eq!(resp.status(), StatusCode::CREATED);
	let body: TransactionResponse = test::read_body_json(resp).await;
	assert_eq!(body.message, "Transaction created successfully");

	let created = body.transaction;
	assert_eq!(created.user_id, ALICE);
	assert_eq!(created.transaction_type, TransactionType::Income);
	assert_eq!(created.amount, BigDecimal::from(100));
	assert_eq!(created.category, "salary");
	assert_eq!(created.description, None);
	assert!(created.date >= before && created.date <= chrono::Utc::now());
	assert_eq!(repo.get(created.id), Some(created));
}

#[actix_web::test]
async fn test_create_accepts_decimal_amounts_and_dates() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.set_json(json!({
			"type": "expense",
			"amount": "12.35",
			"category": "food",
			"description": "lunch",
			"date": "2024-03-01T12:00:00Z"
		}))
		.send_request(&app)
		.await;

	assert_eq!(resp.status(), StatusCode::CREATED);
	let body: TransactionResponse = test::read_body_json(resp).await;
	assert_eq!(body.transaction.amount, "12.35".parse::<BigDecimal>().unwrap());
	assert_eq!(body.transaction.description.as_deref(), Some("lunch"));
	assert_eq!(body.transaction.date.to_rfc3339(), "2024-03-01T12:00:00+00:00");
}

#[actix_web::test]
async fn test_decimal_json_numbers_are_stored_exactly() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	for amount in [json!(12.34), json!(0.66)] {
		let resp = test::TestRequest::post()
			.uri("/api/transactions")
			.insert_header(bearer(ALICE))
			.set_json(json!({ "type": "expense", "amount": amount, "category": "food" }))
			.send_request(&app)
			.await;
		assert_eq!(resp.status(), StatusCode::CREATED);
	}

	let resp = test::TestRequest::get()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.send_request(&app)
		.await;
	let list: TransactionList = test::read_body_json(resp).await;
	let mut amounts: Vec<BigDecimal> = list.transactions.iter().map(|t| t.amount.clone()).collect();
	amounts.sort();
	assert_eq!(
		amounts,
		vec!["0.66".parse::<BigDecimal>().unwrap(), "12.34".parse::<BigDecimal>().unwrap()]
	);
	assert_eq!(list.summary.total_expense, BigDecimal::from(13));

	let id = list.transactions[0].id;
	let resp = test::TestRequest::put()
		.uri(&format!("/api/transactions/{id}"))
		.insert_header(bearer(ALICE))
		.set_json(json!({ "amount": 19.99 }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(repo.get(id).unwrap().amount, "19.99".parse::<BigDecimal>().unwrap());
}

#[actix_web::test]
async fn test_collection_accepts_trailing_slash() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions/")
		.insert_header(bearer(ALICE))
		.set_json(TestFixtures::income(100, "salary"))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);

	let resp = test::TestRequest::get()
		.uri("/api/transactions/")
		.insert_header(bearer(ALICE))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let list: TransactionList = test::read_body_json(resp).await;
	assert_eq!(list.transactions.len(), 1);

	let resp = test::TestRequest::get().uri("/api/transactions/").send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_invalid_creates_are_rejected() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let cases = vec![
		(json!({ "amount": 100, "category": "salary" }), "Type, amount, and category are required"),
		(json!({ "type": "income", "category": "salary" }), "Type, amount, and category are required"),
		(json!({ "type": "income", "amount": 100 }), "Type, amount, and category are required"),
		(json!({ "type": "income", "amount": 0, "category": "salary" }), "Type, amount, and category are required"),
		(json!({ "type": "bonus", "amount": 100, "category": "salary" }), "Type must be income, expense, or saving"),
		(json!({ "type": "expense", "amount": -3, "category": "food" }), "Amount must be greater than 0"),
	];

	for (payload, expected) in cases {
		let resp = test::TestRequest::post()
			.uri("/api/transactions")
			.insert_header(bearer(ALICE))
			.set_json(&payload)
			.send_request(&app)
			.await;

		assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");
		let body: ErrorResponse = test::read_body_json(resp).await;
		assert_eq!(body.error, expected, "payload {payload}");
	}

	assert!(repo.all().is_empty());
}

#[actix_web::test]
async fn test_malformed_body_is_a_bad_request() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.insert_header(("Content-Type", "application/json"))
		.set_payload("{\"type\": \"income\", \"amount\": ")
		.send_request(&app)
		.await;

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: ErrorResponse = test::read_body_json(resp).await;
	assert!(body.error.starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_update_only_changes_supplied_fields() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.set_json(json!({
			"type": "expense",
			"amount": 30,
			"category": "food",
			"description": "groceries",
			"date": "2024-04-02"
		}))
		.send_request(&app)
		.await;
	let original: TransactionResponse = test::read_body_json(resp).await;
	let original = original.transaction;

	let resp = test::TestRequest::put()
		.uri(&format!("/api/transactions/{}", original.id))
		.insert_header(bearer(ALICE))
		.set_json(json!({ "category": "household" }))
		.send_request(&app)
		.await;

	assert_eq!(resp.status(), StatusCode::OK);
	let body: TransactionResponse = test::read_body_json(resp).await;
	assert_eq!(body.message, "Transaction updated successfully");

	let updated = repo.get(original.id).unwrap();
	assert_eq!(body.transaction, updated);
	assert_eq!(updated.category, "household");
	assert_eq!(updated.transaction_type, original.transaction_type);
	assert_eq!(updated.amount, original.amount);
	assert_eq!(updated.description, original.description);
	assert_eq!(updated.date, original.date);
}

#[actix_web::test]
async fn test_update_validation_and_description_clearing() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.set_json(json!({ "type": "saving", "amount": 20, "category": "emergency", "description": "fund" }))
		.send_request(&app)
		.await;
	let created: TransactionResponse = test::read_body_json(resp).await;
	let uri = format!("/api/transactions/{}", created.transaction.id);

	for payload in [json!({ "type": "loan" }), json!({ "amount": 0 }), json!({ "amount": -1 })] {
		let resp = test::TestRequest::put()
			.uri(&uri)
			.insert_header(bearer(ALICE))
			.set_json(&payload)
			.send_request(&app)
			.await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {payload}");
	}
	assert_eq!(repo.get(created.transaction.id), Some(created.transaction.clone()));

	let resp = test::TestRequest::put()
		.uri(&uri)
		.insert_header(bearer(ALICE))
		.set_json(json!({ "description": null, "amount": 25 }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);

	let updated = repo.get(created.transaction.id).unwrap();
	assert_eq!(updated.description, None);
	assert_eq!(updated.amount, BigDecimal::from(25));
	assert_eq!(updated.category, "emergency");
}

#[actix_web::test]
async fn test_other_users_records_are_invisible() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.set_json(TestFixtures::income(100, "salary"))
		.send_request(&app)
		.await;
	let alices: TransactionResponse = test::read_body_json(resp).await;
	let alices = alices.transaction;
	let uri = format!("/api/transactions/{}", alices.id);

	let resp = test::TestRequest::get()
		.uri("/api/transactions")
		.insert_header(bearer(BOB))
		.send_request(&app)
		.await;
	let list: TransactionList = test::read_body_json(resp).await;
	assert!(list.transactions.is_empty());
	assert_eq!(list.summary.total_income, BigDecimal::from(0));

	let resp = test::TestRequest::put()
		.uri(&uri)
		.insert_header(bearer(BOB))
		.set_json(json!({ "amount": 1 }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	let body: ErrorResponse = test::read_body_json(resp).await;
	assert_eq!(body.error, "Transaction not found");

	let resp = test::TestRequest::delete()
		.uri(&uri)
		.insert_header(bearer(BOB))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);

	assert_eq!(repo.get(alices.id), Some(alices));
}

#[actix_web::test]
async fn test_delete_transaction() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.set_json(TestFixtures::expense(5, "coffee"))
		.send_request(&app)
		.await;
	let created: TransactionResponse = test::read_body_json(resp).await;
	let uri = format!("/api/transactions/{}", created.transaction.id);

	let resp =
		test::TestRequest::delete().uri(&uri).insert_header(bearer(ALICE)).send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: MessageResponse = test::read_body_json(resp).await;
	assert_eq!(body.message, "Transaction deleted successfully");
	assert!(repo.all().is_empty());

	let resp =
		test::TestRequest::delete().uri(&uri).insert_header(bearer(ALICE)).send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_nonexistent_id_changes_nothing() {
	let repo = Arc::new(InMemoryTransactionRepo::default());
	let app = test::init_service(App::new().configure(configure(repo.clone()))).await;

	let resp = test::TestRequest::post()
		.uri("/api/transactions")
		.insert_header(bearer(ALICE))
		.set_json(TestFixtures::income(100, "salary"))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let before = repo.all();

	for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
		let resp = test::TestRequest::delete()
			.uri(&format!("/api/transactions/{id}"))
			.insert_header(bearer(ALICE))
			.send_request(&app)
			.await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	}

	assert_eq!(repo.all(), before);
}
