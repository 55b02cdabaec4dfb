//! Profile summary and profile editing

use crate::client::api::ApiClient;
use crate::client::auth::{looks_like_email, AuthContext};
use crate::shared::error::ClientError;
use crate::shared::models::profile::{
    EditProfileRequest, EditableProfile, EditableProfileResponse, Profile, ProfileRequest,
    ProfileResponse, ProfileUpdate, UpdateProfileRequest,
};
use crate::shared::wire::{Ack, RecordId};

pub const PROFILE_FAILED: &str = "Failed to fetch user profile";
pub const PROFILE_LOAD_FAILED: &str = "Failed to load profile data";
pub const PROFILE_UPDATED: &str = "Profile updated successfully";
pub const PROFILE_UPDATE_FAILED: &str = "An unexpected error occurred";

pub async fn fetch_profile(api: &ApiClient, auth: &AuthContext) -> Result<Profile, ClientError> {
    let user_id = auth.require_token()?;
    let reply: ProfileResponse = api
        .post("/user/user", &ProfileRequest { user_id: &user_id })
        .await
        .inspect_err(|e| e.log("fetch_profile"))?;
    Ok(reply.data)
}

/// Load the fields the edit form starts from
pub async fn get_editable_profile(
    api: &ApiClient,
    auth: &AuthContext,
) -> Result<EditableProfile, ClientError> {
    let uid = auth.require_token()?;
    let reply: EditableProfileResponse = api
        .post("/user/edit-profile", &EditProfileRequest::get(&uid))
        .await
        .inspect_err(|e| e.log("get_editable_profile"))?;
    Ok(reply.data)
}

pub fn validate_update(update: &ProfileUpdate) -> Result<(), ClientError> {
    if update.fullname.trim().is_empty() {
        return Err(ClientError::validation("fullname", "Full name is required"));
    }
    if !looks_like_email(update.email.trim()) {
        return Err(ClientError::validation("email", "Please enter a valid email address"));
    }
    if update.phone.len() != 11 || !update.phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::validation("phone", "Phone number must be 11 digits"));
    }
    for (field, value, message) in [
        ("university", &update.university, "University is required"),
        ("faculty", &update.faculty, "Faculty is required"),
        ("department", &update.department, "Department is required"),
    ] {
        if value.trim().is_empty() {
            return Err(ClientError::validation(field, message));
        }
    }
    if let Some(change) = update.password.as_ref().filter(|p| !p.new_password.is_empty()) {
        if change.new_password.chars().count() < 6 {
            return Err(ClientError::validation(
                "new_password",
                "New password must be at least 6 characters long",
            ));
        }
        if change.new_password != change.confirm_new_password {
            return Err(ClientError::validation(
                "confirm_new_password",
                "New passwords do not match",
            ));
        }
    }
    Ok(())
}

/// Save an edited profile. `profile_id` is the `id` from [`get_editable_profile`].
pub async fn update_profile(
    api: &ApiClient,
    auth: &AuthContext,
    profile_id: &RecordId,
    update: &ProfileUpdate,
) -> Result<Ack, ClientError> {
    auth.require_token()?;
    validate_update(update)?;
    let ack: Ack = api
        .post("/user/edit-profile", &UpdateProfileRequest::new(profile_id, update))
        .await
        .inspect_err(|e| e.log("update_profile"))?;
    tracing::info!(password_changed = update.password.is_some(), "profile updated");
    Ok(ack)
}
