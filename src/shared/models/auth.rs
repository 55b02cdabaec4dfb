//! Session creation types (`/auth/login`, `/auth/signup`)

use crate::shared::wire::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub func: &'static str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(username: &'a str, password: &'a str) -> Self {
        Self {
            func: "login",
            username,
            password,
        }
    }
}

/// Fields collected by the signup form
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub fullname: String,
    pub gender: String,
    pub university: String,
    pub faculty: String,
    pub department: String,
    pub role: String,
    pub level: String,
    pub matric_no: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub func: &'static str,
    #[serde(flatten)]
    pub form: &'a SignupForm,
}

/// Successful login or signup; `uid` becomes the session token.
/// Signup returns it as a number, login as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub uid: RecordId,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest<'a> {
    pub user_id: &'a str,
}

/// `/user/logout` inverts the usual flag: `0` means the session may end,
/// anything else means attendance was marked too recently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl LogoutResponse {
    pub fn allows_logout(&self) -> bool {
        match &self.status {
            Value::Number(n) => n.as_i64() == Some(0),
            Value::String(s) => s.trim() == "0",
            _ => false,
        }
    }
}
