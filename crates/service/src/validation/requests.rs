use serde::Deserialize;
use validator::Validate;

use super::{empty_string_as_none, normalize_email, password_policy, rules, string_or_null, FieldErrors, Rules};

/// Self-registration payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupInput {
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), length(max = 55))]
    pub name: String,
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), email)]
    pub email: String,
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), length(min = 8), must_match(other = "password_confirmation"))]
    pub password: String,
    #[serde(deserialize_with = "string_or_null")]
    pub password_confirmation: String,
}

/// Credentials for `login`. `remember` must be a JSON boolean when present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginInput {
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), email)]
    pub email: String,
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"))]
    pub password: String,
    pub remember: Option<bool>,
}

/// Admin-side creation. The confirmation is optional here but must match
/// when sent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateUserInput {
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), length(max = 55))]
    pub name: String,
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), email)]
    pub email: String,
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), length(min = 8))]
    pub password: String,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub password_confirmation: Option<String>,
}

/// Profile edit. Password fields left empty keep the current password.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUserInput {
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), length(max = 55))]
    pub name: String,
    #[serde(deserialize_with = "string_or_null")]
    #[validate(custom(function = "rules::required"), email)]
    pub email: String,
    #[serde(deserialize_with = "empty_string_as_none")]
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub password_confirmation: Option<String>,
}

impl SignupInput {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
    }
}

impl LoginInput {
    pub fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

impl CreateUserInput {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
    }
}

impl UpdateUserInput {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
    }
}

fn confirmation_mismatch(errors: &mut FieldErrors) {
    if !errors.contains("password") {
        errors.add("password", "The password field confirmation does not match.");
    }
}

impl Rules for SignupInput {
    fn extra(&self, errors: &mut FieldErrors) {
        password_policy("password", &self.password, errors);
    }
}

impl Rules for LoginInput {}

impl Rules for CreateUserInput {
    fn extra(&self, errors: &mut FieldErrors) {
        password_policy("password", &self.password, errors);
        if let Some(confirmation) = &self.password_confirmation {
            if confirmation != &self.password {
                confirmation_mismatch(errors);
            }
        }
    }
}

impl Rules for UpdateUserInput {
    fn extra(&self, errors: &mut FieldErrors) {
        if let Some(password) = &self.password {
            password_policy("password", password, errors);
            if self.password_confirmation.as_deref() != Some(password.as_str()) {
                confirmation_mismatch(errors);
            }
        }
    }
}
