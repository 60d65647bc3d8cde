//! Custom rule functions referenced from `#[validate(custom(..))]`.
//! The error code selects the rendered message.

use validator::ValidationError;

pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Password complexity: at least one uppercase and one lowercase letter, a
/// digit and a symbol. Returns one error per unmet class; blank values are
/// left to [`required`] and length to the `length` rule.
pub fn password(value: &str) -> Vec<ValidationError> {
    let mut failed = Vec::new();
    if value.trim().is_empty() {
        return failed;
    }
    let has_upper = value.chars().any(char::is_uppercase);
    let has_lower = value.chars().any(char::is_lowercase);
    if !(has_upper && has_lower) {
        failed.push(ValidationError::new("mixed_case"));
    }
    if !value.chars().any(|c| c.is_numeric()) {
        failed.push(ValidationError::new("numbers"));
    }
    if !value.chars().any(|c| !c.is_alphanumeric()) {
        failed.push(ValidationError::new("symbols"));
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(r: Result<(), ValidationError>) -> Option<String> {
        r.err().map(|e| e.code.to_string())
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(code(required("")), Some("required".into()));
        assert_eq!(code(required("   ")), Some("required".into()));
        assert!(required("x").is_ok());
    }

    fn codes(value: &str) -> Vec<String> {
        password(value).into_iter().map(|e| e.code.to_string()).collect()
    }

    #[test]
    fn password_reports_every_missing_class() {
        assert!(codes("").is_empty());
        assert!(codes("        ").is_empty());
        assert_eq!(codes("alllower1!"), vec!["mixed_case"]);
        assert_eq!(codes("ALLUPPER1!"), vec!["mixed_case"]);
        assert_eq!(codes("NoDigits!"), vec!["numbers"]);
        assert_eq!(codes("NoSymbol1"), vec!["symbols"]);
        assert_eq!(codes("Password"), vec!["numbers", "symbols"]);
        assert_eq!(codes("lowercase"), vec!["mixed_case", "numbers", "symbols"]);
        assert!(codes("Secret123!").is_empty());
        assert!(codes("Pass word1").is_empty());
    }
}
