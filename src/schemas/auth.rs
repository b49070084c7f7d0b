use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator_derive::Validate;

static STUDENT_NUMBER_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{4,16}$").unwrap());

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	#[validate(length(
		min = 2,
		max = 64,
		message = "name must be between 2 and 64 characters long",
		code = "name-length"
	))]
	pub name:           String,
	#[validate(regex(
		path = *STUDENT_NUMBER_REGEX,
		message = "student number must be 4 to 16 letters or digits",
		code = "student-number-regex"
	))]
	pub student_number: String,
	#[validate(email(message = "invalid email", code = "email"))]
	pub email:          String,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters long",
		code = "password-length"
	))]
	pub password:       String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
	pub email:    String,
	pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
	pub current_password: String,
	#[validate(length(
		min = 8,
		message = "password must be at least 8 characters long",
		code = "password-length"
	))]
	pub new_password:     String,
}
