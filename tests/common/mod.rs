use axum_extra::extract::cookie::Key;
use axum_test::TestServer;
use common::DbConn;
use courtbook::{AppState, Config, DbPool, routes};
use db::{FacilityKind, FacilityStatus, ProfileRole};
use facility::NewFacility;
use profile::{NewProfileDirect, hash_password};
use time::Duration;

mod mock_db;

use mock_db::{DATABASE_PROVIDER, DatabaseGuard};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Shorthand for building wall-clock times in assertions
#[allow(dead_code)]
pub fn at(hour: u32, min: u32) -> chrono::NaiveTime {
	chrono::NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

#[allow(dead_code)]
pub struct TestEnv {
	pub app:      TestServer,
	pub pool:     DbPool,
	pub db_guard: DatabaseGuard,
}

#[allow(dead_code)]
impl TestEnv {
	/// Get a test environment with a oneshot database for running tests
	///
	/// # Panics
	/// Panics if building the test server fails
	pub async fn new() -> Self {
		let test_pool_guard = (*DATABASE_PROVIDER).acquire().await;
		let test_pool = test_pool_guard.create_pool();

		let config = Config {
			database_url:          test_pool_guard.database_url().to_string(),
			access_token_name:     "courtbook_access_token".to_string(),
			access_token_lifetime: Duration::minutes(30),
			cookie_jar_secret:     String::new(),
			production:            false,
		};

		let cookie_jar_key = Key::from(&[0u8; 64]);

		let state = AppState {
			config,
			database_pool: test_pool.clone(),
			cookie_jar_key,
		};
		let app = routes::get_app_router(state);

		let test_server =
			TestServer::builder().save_cookies().build(app).unwrap();

		TestEnv { app: test_server, pool: test_pool, db_guard: test_pool_guard }
	}

	pub async fn conn(&self) -> DbConn {
		self.pool.get().await.expect("could not get test pool connection")
	}

	/// Register a student account over the API and log in, saving the
	/// access token cookie on the test server
	pub async fn login_student(self, email: &str) -> Self {
		let register = serde_json::json!({
			"name": "Test Student",
			"studentNumber": email
				.split('@')
				.next()
				.unwrap()
				.to_string(),
			"email": email,
			"password": TEST_PASSWORD,
		});

		let response = self.app.post("/auth/register").json(&register).await;
		assert_eq!(response.status_code(), 201);

		self.login(email).await
	}

	/// Create an admin account directly and log in with it
	pub async fn login_admin(self, email: &str) -> Self {
		let conn = self.conn().await;

		NewProfileDirect {
			name:           "Test Admin".to_string(),
			student_number: format!("ADMIN{}", email.len()),
			email:          email.to_string(),
			password_hash:  hash_password(TEST_PASSWORD).unwrap(),
			role:           ProfileRole::Admin,
		}
		.insert(&conn)
		.await
		.expect("could not insert admin profile");

		self.login(email).await
	}

	async fn login(self, email: &str) -> Self {
		let login = serde_json::json!({
			"email": email,
			"password": TEST_PASSWORD,
		});

		let response = self.app.post("/auth/login").json(&login).await;
		assert_eq!(response.status_code(), 200);

		self
	}

	/// Insert an active facility and return its id
	pub async fn create_facility(&self, name: &str) -> i32 {
		self.create_facility_with_status(name, FacilityStatus::Active).await
	}

	pub async fn create_facility_with_status(
		&self,
		name: &str,
		status: FacilityStatus,
	) -> i32 {
		let conn = self.conn().await;

		let facility = NewFacility {
			name: name.to_string(),
			kind: FacilityKind::Badminton,
			location: "Indoor Hall".to_string(),
			capacity: 4,
			status,
			created_by: None,
		}
		.insert(&conn)
		.await
		.expect("could not insert facility");

		facility.id
	}
}
