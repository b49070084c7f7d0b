//! Registration, login, and session coverage.
//!
//! These tests need a running postgres instance; point DATABASE_URL at one
//! and run with `cargo test -- --ignored`.

use axum::http::StatusCode;

mod common;

use common::{TEST_PASSWORD, TestEnv};

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn register_login_and_fetch_profile() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;

	let me = env.app.get("/auth/me").await;

	assert_eq!(me.status_code(), StatusCode::OK);

	let body = me.json::<serde_json::Value>();
	assert_eq!(body["email"], "u6722060@au.edu");
	assert_eq!(body["role"], "Student");
	assert!(body.get("passwordHash").is_none());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn duplicate_email_is_rejected() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;

	let duplicate = env
		.app
		.post("/auth/register")
		.json(&serde_json::json!({
			"name": "Someone Else",
			"studentNumber": "6799999",
			"email": "u6722060@au.edu",
			"password": TEST_PASSWORD,
		}))
		.await;

	assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn short_password_fails_validation() {
	let env = TestEnv::new().await;

	let response = env
		.app
		.post("/auth/register")
		.json(&serde_json::json!({
			"name": "Test Student",
			"studentNumber": "6722060",
			"email": "u6722060@au.edu",
			"password": "short",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn wrong_password_is_unauthorized() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;

	let response = env
		.app
		.post("/auth/login")
		.json(&serde_json::json!({
			"email": "u6722060@au.edu",
			"password": "not-the-password",
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn bookings_require_authentication() {
	let env = TestEnv::new().await;

	let response = env.app.get("/bookings").await;

	assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn logout_invalidates_the_session() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;

	let logout = env.app.post("/auth/logout").await;
	assert_eq!(logout.status_code(), StatusCode::NO_CONTENT);

	let me = env.app.get("/auth/me").await;
	assert_eq!(me.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn password_change_requires_the_current_password() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;

	let wrong = env
		.app
		.put("/auth/password")
		.json(&serde_json::json!({
			"currentPassword": "not-the-password",
			"newPassword": "an-even-better-one",
		}))
		.await;
	assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

	let changed = env
		.app
		.put("/auth/password")
		.json(&serde_json::json!({
			"currentPassword": TEST_PASSWORD,
			"newPassword": "an-even-better-one",
		}))
		.await;
	assert_eq!(changed.status_code(), StatusCode::NO_CONTENT);

	let relogin = env
		.app
		.post("/auth/login")
		.json(&serde_json::json!({
			"email": "u6722060@au.edu",
			"password": "an-even-better-one",
		}))
		.await;
	assert_eq!(relogin.status_code(), StatusCode::OK);
}
