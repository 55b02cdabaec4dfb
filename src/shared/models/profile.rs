//! User profile types (`/user/user`, `/user/edit-profile`)

use crate::shared::wire::{lenient_string, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileRequest<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub data: Profile,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub university_name: String,
    #[serde(default)]
    pub faculty_name: String,
    #[serde(default)]
    pub department_name: String,
    #[serde(default)]
    pub level: serde_json::Value,
}

impl Profile {
    /// Level as displayed, e.g. "300 Level"
    pub fn level_label(&self) -> String {
        match &self.level {
            serde_json::Value::String(s) if !s.is_empty() => format!("{s} Level"),
            serde_json::Value::Number(n) => format!("{n} Level"),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EditProfileRequest<'a> {
    pub func: &'static str,
    pub uid: &'a str,
}

impl<'a> EditProfileRequest<'a> {
    pub fn get(uid: &'a str) -> Self {
        Self {
            func: "get_profile",
            uid,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditableProfileResponse {
    pub data: EditableProfile,
}

/// Profile fields the user may change, as the backend stores them
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditableProfile {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fullname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub university_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub faculty_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub department_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub matric_no: String,
}

/// New password plus the current one the backend checks it against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Edited profile. Username and matric number are fixed after signup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub email: String,
    pub phone: String,
    pub fullname: String,
    pub university: String,
    pub faculty: String,
    pub department: String,
    pub level: String,
    pub password: Option<PasswordChange>,
}

impl From<&EditableProfile> for ProfileUpdate {
    fn from(profile: &EditableProfile) -> Self {
        Self {
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            fullname: profile.fullname.clone(),
            university: profile.university_id.clone(),
            faculty: profile.faculty_id.clone(),
            department: profile.department_id.clone(),
            level: profile.level.clone(),
            password: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest<'a> {
    pub func: &'static str,
    pub uid: &'a RecordId,
    pub email: &'a str,
    pub phone: &'a str,
    pub fullname: &'a str,
    pub university: &'a str,
    pub faculty: &'a str,
    pub department: &'a str,
    pub level: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<&'a str>,
}

impl<'a> UpdateProfileRequest<'a> {
    /// Password fields are sent only when a new password was entered
    pub fn new(uid: &'a RecordId, update: &'a ProfileUpdate) -> Self {
        let change = update
            .password
            .as_ref()
            .filter(|p| !p.new_password.is_empty());
        Self {
            func: "update_profile",
            uid,
            email: &update.email,
            phone: &update.phone,
            fullname: &update.fullname,
            university: &update.university,
            faculty: &update.faculty,
            department: &update.department,
            level: &update.level,
            current_password: change.map(|p| p.current_password.as_str()),
            new_password: change.map(|p| p.new_password.as_str()),
        }
    }
}
