use super::models::{LoginForm, SignUpForm};
use crate::common::validation::require_present;
use crate::common::{ValidationResult, Validator};

pub const MIN_EMAIL_LEN: usize = 3;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_NAME_LEN: usize = 100;

pub struct SignUpValidator;

impl Validator<SignUpForm> for SignUpValidator {
    fn validate(&self, data: &SignUpForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        require_present(&mut result, "name", Some(&data.name), "Name");
        require_present(&mut result, "surname", Some(&data.surname), "Surname");

        if data.name.trim().chars().count() > MAX_NAME_LEN {
            result.add_error("name", "Name must not exceed 100 characters");
        }
        if data.surname.trim().chars().count() > MAX_NAME_LEN {
            result.add_error("surname", "Surname must not exceed 100 characters");
        }

        validate_email(&mut result, &data.email);
        validate_password(&mut result, &data.password);

        if data.password != data.password_confirm {
            result.add_error("password_confirm", "Passwords must match");
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginForm> for LoginValidator {
    fn validate(&self, data: &LoginForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_email(&mut result, &data.email);
        validate_password(&mut result, &data.password);

        result
    }
}

fn validate_email(result: &mut ValidationResult, email: &str) {
    let len = email.trim().chars().count();
    if len < MIN_EMAIL_LEN {
        result.add_error("email", "Email must be at least 3 characters");
    } else if len > MAX_EMAIL_LEN {
        result.add_error("email", "Email must not exceed 254 characters");
    }
}

fn validate_password(result: &mut ValidationResult, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        result.add_error("password", "Password must be at least 6 characters");
    }
}
