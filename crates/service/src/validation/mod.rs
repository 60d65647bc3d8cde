//! Request rule sets for signup, login and user management.
//!
//! Field rules are declared with `validator` derives on the input structs in
//! [`requests`]; [`Rules::check`] runs them and renders the failures into
//! [`FieldErrors`], one message list per field. Email uniqueness needs the
//! repository, so it runs separately through [`unique_email`].

pub mod requests;
pub mod rules;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::ServiceError;
use crate::users::repository::UserRepository;

pub use requests::{CreateUserInput, LoginInput, SignupInput, UpdateUserInput};

/// Field-keyed validation messages, serialised as `{ "field": ["msg", ..] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self { Self::default() }

    /// Single `unique` failure for `field`.
    pub fn taken(field: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, format!("The {} has already been taken.", attribute(field)));
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Number of messages across all fields.
    pub fn len(&self) -> usize { self.0.values().map(Vec::len).sum() }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() { Ok(()) } else { Err(ServiceError::Validation(self)) }
    }

    /// First message plus a count of the rest, e.g.
    /// `The name field is required. (and 2 more errors)`.
    pub fn summary(&self) -> String {
        let first = self.0.values().flatten().next().cloned().unwrap_or_else(|| "The given data was invalid.".to_string());
        match self.len().saturating_sub(1) {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }

    /// Render `validator` failures. A field whose `required` rule failed keeps
    /// only that message.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, errs) in errors.field_errors().iter() {
            let field = field.to_string();
            let required = errs.iter().any(|e| e.code == "required");
            for err in errs.iter() {
                if required && err.code != "required" {
                    continue;
                }
                out.add(&field, render(&field, err));
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Human form of a field name: `password_confirmation` -> `password confirmation`.
fn attribute(field: &str) -> String { field.replace('_', " ") }

fn render(field: &str, err: &ValidationError) -> String {
    let attr = attribute(field);
    let param = |name: &str| err.params.get(name).map(|v| v.to_string()).unwrap_or_default();
    match &*err.code {
        "required" => format!("The {} field is required.", attr),
        "email" => format!("The {} field must be a valid email address.", attr),
        "length" if err.params.contains_key("max") => {
            format!("The {} field must not be greater than {} characters.", attr, param("max"))
        }
        "length" => format!("The {} field must be at least {} characters.", attr, param("min")),
        "mixed_case" => format!("The {} field must contain at least one uppercase and one lowercase letter.", attr),
        "numbers" => format!("The {} field must contain at least one number.", attr),
        "symbols" => format!("The {} field must contain at least one symbol.", attr),
        "must_match" | "confirmed" => format!("The {} field confirmation does not match.", attr),
        _ => match &err.message {
            Some(message) => message.to_string(),
            None => format!("The {} field is invalid.", attr),
        },
    }
}

/// One message per password class `value` is missing. Blank values are left
/// to the `required` rule.
pub(crate) fn password_policy(field: &str, value: &str, errors: &mut FieldErrors) {
    for err in rules::password(value) {
        errors.add(field, render(field, &err));
    }
}

/// Declarative rules plus the cross-field checks the derive cannot express.
pub trait Rules: Validate {
    fn extra(&self, _errors: &mut FieldErrors) {}

    fn check(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from_validation(&e),
        };
        self.extra(&mut errors);
        errors
    }
}

/// Add the `unique` failure for `email` unless the field already failed.
/// `except` skips the record being updated.
pub async fn unique_email(
    users: &dyn UserRepository,
    email: &str,
    except: Option<Uuid>,
    errors: &mut FieldErrors,
) -> Result<(), ServiceError> {
    if errors.contains("email") {
        return Ok(());
    }
    if users.email_taken(email, except).await? {
        errors.merge(FieldErrors::taken("email"));
    }
    Ok(())
}

/// Trimmed, lower-cased email used for storage and lookup.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Accept `null` for string fields and treat it as empty.
pub(crate) fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null`, `""` and whitespace-only strings all mean "not supplied".
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
