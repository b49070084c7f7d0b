//! Facility catalogue coverage.
//!
//! These tests need a running postgres instance; point DATABASE_URL at one
//! and run with `cargo test -- --ignored`.

use axum::http::StatusCode;

mod common;

use common::TestEnv;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn students_cannot_manage_facilities() {
	let env = TestEnv::new().await.login_student("u6722060@au.edu").await;

	let response = env
		.app
		.post("/facilities")
		.json(&serde_json::json!({
			"name": "Football Field 1",
			"kind": "Football",
			"location": "Outdoor Field",
			"capacity": 22,
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn admins_manage_the_catalogue() {
	let env = TestEnv::new().await.login_admin("admin@au.edu").await;

	let created = env
		.app
		.post("/facilities")
		.json(&serde_json::json!({
			"name": "Snooker Table 1",
			"kind": "Snooker",
			"location": "Sports Complex",
			"capacity": 2,
		}))
		.await;

	assert_eq!(created.status_code(), StatusCode::CREATED);
	let body = created.json::<serde_json::Value>();
	assert_eq!(body["status"], "Active");
	let facility_id = body["id"].as_i64().unwrap();

	let updated = env
		.app
		.put(&format!("/facilities/{facility_id}"))
		.json(&serde_json::json!({ "status": "Maintenance", "capacity": 4 }))
		.await;

	assert_eq!(updated.status_code(), StatusCode::OK);
	let body = updated.json::<serde_json::Value>();
	assert_eq!(body["status"], "Maintenance");
	assert_eq!(body["capacity"], 4);

	let deleted = env.app.delete(&format!("/facilities/{facility_id}")).await;
	assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

	let gone = env.app.get(&format!("/facilities/{facility_id}")).await;
	assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn zero_capacity_fails_validation() {
	let env = TestEnv::new().await.login_admin("admin@au.edu").await;

	let response = env
		.app
		.post("/facilities")
		.json(&serde_json::json!({
			"name": "Broken Court",
			"kind": "Badminton",
			"location": "Nowhere",
			"capacity": 0,
		}))
		.await;

	assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a postgres instance via DATABASE_URL"]
async fn catalogue_filters_by_kind_and_status() {
	let env = TestEnv::new().await;

	env.create_facility("Badminton Court 1").await;
	env.create_facility("Badminton Court 2").await;

	let all = env.app.get("/facilities").await;
	assert_eq!(all.status_code(), StatusCode::OK);
	assert_eq!(all.json::<serde_json::Value>().as_array().unwrap().len(), 2);

	let badminton = env
		.app
		.get("/facilities")
		.add_query_param("kind", "Badminton")
		.await;
	assert_eq!(
		badminton.json::<serde_json::Value>().as_array().unwrap().len(),
		2
	);

	let snooker =
		env.app.get("/facilities").add_query_param("kind", "Snooker").await;
	assert!(snooker.json::<serde_json::Value>().as_array().unwrap().is_empty());
}
