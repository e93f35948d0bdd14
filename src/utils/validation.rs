use crate::utils::error::FieldError;
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> crate::utils::error::Result<()>;
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Syntactic check only; deliverability is not our concern.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    })
}

pub fn check_email(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "email is required"));
    } else if !email_regex().is_match(value.trim()) {
        errors.push(FieldError::new(
            field,
            format!("'{}' is not a valid email address", value),
        ));
    }
}

pub fn check_non_empty(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "value cannot be empty"));
    }
}

pub fn check_positive(field: &str, value: f64, errors: &mut Vec<FieldError>) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(FieldError::new(field, "value must be a positive number"));
    }
}

pub fn check_max(field: &str, value: f64, max: f64, errors: &mut Vec<FieldError>) {
    if value > max {
        errors.push(FieldError::new(
            field,
            format!(
                "value {} exceeds the maximum of {}; request a manual consultation",
                value, max
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_email() {
        let mut errors = Vec::new();
        check_email("customer.email", "anna@example.com", &mut errors);
        assert!(errors.is_empty());

        check_email("customer.email", "not-an-email", &mut errors);
        check_email("customer.email", "", &mut errors);
        check_email("customer.email", "two@@example.com", &mut errors);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_check_positive_rejects_nan_and_zero() {
        let mut errors = Vec::new();
        check_positive("quantity", 0.0, &mut errors);
        check_positive("quantity", -5.0, &mut errors);
        check_positive("quantity", f64::NAN, &mut errors);
        assert_eq!(errors.len(), 3);

        errors.clear();
        check_positive("quantity", 120.0, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_max() {
        let mut errors = Vec::new();
        check_max("quantity", 12_000.0, 10_000.0, &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("manual consultation"));
    }
}
