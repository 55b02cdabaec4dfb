//! Authentication
//!
//! The session token is the backend `uid` returned by login or signup. It is
//! the only state the client persists. All screens read it through one
//! [`AuthContext`] instead of touching storage themselves.

use crate::client::api::ApiClient;
use crate::shared::error::ClientError;
use crate::shared::models::auth::{
    AuthResponse, LoginRequest, LogoutRequest, LogoutResponse, SignupForm, SignupRequest,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Name the token is stored under
pub const TOKEN_KEY: &str = "userToken";

/// Shown when the backend refuses to end the session
pub const LOGOUT_BLOCKED: &str = "You cannot log out at this time";

/// Where the session token lives between runs
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, ClientError>;
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn delete(&self) -> Result<(), ClientError>;
}

/// Token kept in process memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    // A writer that panicked cannot leave the slot half-written, so a
    // poisoned lock still holds a usable token.
    fn load(&self) -> Result<Option<String>, ClientError> {
        let slot = self.token.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), ClientError> {
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

/// Token kept in a single file readable only by the owner
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<local data dir>/attendbook/userToken`
    pub fn default_location() -> Option<Self> {
        dirs::data_local_dir().map(|dir| Self::new(dir.join("attendbook").join(TOKEN_KEY)))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let token = text.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn delete(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Which top-level view the app should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    /// No token: onboarding, login and signup
    Onboarding,
    /// Token present: the authenticated tabs
    Home,
}

/// Shared handle to the session token. Cheap to clone.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext").finish_non_exhaustive()
    }
}

impl AuthContext {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Context backed by memory, for tests and one-shot runs
    pub fn in_memory(token: Option<&str>) -> Self {
        match token {
            Some(token) => Self::new(MemoryTokenStore::with_token(token)),
            None => Self::new(MemoryTokenStore::new()),
        }
    }

    pub fn get_token(&self) -> Result<Option<String>, ClientError> {
        self.store.load()
    }

    /// The token, or `NotAuthenticated` when none is stored
    pub fn require_token(&self) -> Result<String, ClientError> {
        self.get_token()?.ok_or(ClientError::NotAuthenticated)
    }

    pub fn set_token(&self, token: &str) -> Result<(), ClientError> {
        self.store.save(token)
    }

    pub fn clear_token(&self) -> Result<(), ClientError> {
        self.store.delete()
    }

    /// Absence of a token routes to onboarding
    pub fn route(&self) -> AppView {
        match self.get_token() {
            Ok(Some(_)) => AppView::Home,
            Ok(None) => AppView::Onboarding,
            Err(err) => {
                tracing::warn!(error = %err, "token store unreadable, routing to onboarding");
                AppView::Onboarding
            }
        }
    }
}

/// Log in and store the returned `uid` as the session token
pub async fn login(
    api: &ApiClient,
    auth: &AuthContext,
    username: &str,
    password: &str,
) -> Result<String, ClientError> {
    validate_login(username, password)?;
    let response: AuthResponse = api
        .post("/auth/login", &LoginRequest::new(username.trim(), password))
        .await
        .inspect_err(|e| e.log("login"))?;
    let uid = response.uid.to_string();
    auth.set_token(&uid)?;
    tracing::info!("logged in");
    Ok(uid)
}

/// Create an account and store the returned `uid` as the session token
pub async fn signup(
    api: &ApiClient,
    auth: &AuthContext,
    form: &SignupForm,
) -> Result<String, ClientError> {
    validate_signup(form)?;
    let response: AuthResponse = api
        .post(
            "/auth/signup",
            &SignupRequest {
                func: "signup",
                form,
            },
        )
        .await
        .inspect_err(|e| e.log("signup"))?;
    let uid = response.uid.to_string();
    auth.set_token(&uid)?;
    tracing::info!("account created");
    Ok(uid)
}

/// End the session once the backend agrees.
///
/// The backend refuses while attendance was marked in the last two hours, so
/// a phone cannot be handed over to mark for someone else. The token is kept
/// in that case and [`LOGOUT_BLOCKED`] is returned as a backend error.
pub async fn logout(api: &ApiClient, auth: &AuthContext) -> Result<(), ClientError> {
    let Some(user_id) = auth.get_token()? else {
        return Ok(());
    };
    let reply: LogoutResponse = api
        .post_unchecked("/user/logout", &LogoutRequest { user_id: &user_id })
        .await
        .inspect_err(|e| e.log("logout"))?;
    if !reply.allows_logout() {
        tracing::info!(message = reply.message.as_deref().unwrap_or(""), "logout refused");
        return Err(ClientError::backend(Some(LOGOUT_BLOCKED.to_string())));
    }
    auth.clear_token()?;
    tracing::info!("logged out");
    Ok(())
}

pub(crate) fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

pub fn validate_login(username: &str, password: &str) -> Result<(), ClientError> {
    if username.trim().is_empty() {
        return Err(ClientError::validation("email", "Email is required"));
    }
    if !looks_like_email(username.trim()) {
        return Err(ClientError::validation("email", "Invalid email address"));
    }
    if password.is_empty() {
        return Err(ClientError::validation("password", "Password is required"));
    }
    if password.chars().count() < 8 {
        return Err(ClientError::validation(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}

pub fn validate_signup(form: &SignupForm) -> Result<(), ClientError> {
    let username_len = form.username.chars().count();
    if !(4..=12).contains(&username_len) {
        return Err(ClientError::validation(
            "username",
            "Username must be between 4 and 12 characters",
        ));
    }
    if !form
        .username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ClientError::validation(
            "username",
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    if !looks_like_email(&form.email) {
        return Err(ClientError::validation("email", "Please enter a valid email address"));
    }
    if form.phone.len() != 11 || !form.phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::validation("phone", "Phone number must be 11 digits"));
    }
    for (field, value, message) in [
        ("fullname", &form.fullname, "Full name is required"),
        ("gender", &form.gender, "Gender is required"),
        ("university", &form.university, "University is required"),
        ("faculty", &form.faculty, "Faculty is required"),
        ("department", &form.department, "Department is required"),
        ("matric_no", &form.matric_no, "Matric number is required"),
    ] {
        if value.trim().is_empty() {
            return Err(ClientError::validation(field, message));
        }
    }
    if form.password.chars().count() < 6 {
        return Err(ClientError::validation(
            "password",
            "Password must be at least 6 characters long",
        ));
    }
    if form.password != form.confirm_password {
        return Err(ClientError::validation("confirm_password", "Passwords do not match"));
    }
    Ok(())
}
