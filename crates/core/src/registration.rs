//! Registration input rules.
//!
//! Account creation itself lives in the API layer; this module only decides
//! whether the submitted data is acceptable.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::roles::{validate_role, ROLE_COMPANY, ROLE_USER};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Lifetime of an email verification token, in minutes.
pub const VERIFICATION_TOKEN_EXPIRY_MINS: i64 = 60;

/// The role-dependent parts of a registration request.
#[derive(Debug)]
pub struct RegistrationFields<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub full_name: Option<&'a str>,
    pub company_name: Option<&'a str>,
}

/// Validate a registration request.
///
/// `user` accounts need a full name; `company` accounts need a company name.
pub fn validate_registration(input: &RegistrationFields<'_>) -> Result<(), CoreError> {
    if !input.email.validate_email() {
        return Err(CoreError::Validation("A valid email address is required".into()));
    }

    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    validate_role(input.role)?;

    let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());

    if input.role == ROLE_USER && !present(input.full_name) {
        return Err(CoreError::Validation("full_name is required for users".into()));
    }
    if input.role == ROLE_COMPANY && !present(input.company_name) {
        return Err(CoreError::Validation(
            "company_name is required for companies".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_fields<'a>() -> RegistrationFields<'a> {
        RegistrationFields {
            email: "bob@example.com",
            password: "long-enough-pw",
            role: ROLE_USER,
            full_name: Some("Bob"),
            company_name: None,
        }
    }

    #[test]
    fn valid_user_registration() {
        assert!(validate_registration(&user_fields()).is_ok());
    }

    #[test]
    fn user_requires_full_name() {
        let input = RegistrationFields {
            full_name: Some("  "),
            ..user_fields()
        };
        assert!(validate_registration(&input).is_err());
    }

    #[test]
    fn company_requires_company_name() {
        let input = RegistrationFields {
            role: ROLE_COMPANY,
            full_name: None,
            company_name: None,
            ..user_fields()
        };
        assert!(validate_registration(&input).is_err());

        let input = RegistrationFields {
            role: ROLE_COMPANY,
            company_name: Some("Acme Clinic"),
            ..user_fields()
        };
        assert!(validate_registration(&input).is_ok());
    }

    #[test]
    fn rejects_bad_email_short_password_and_unknown_role() {
        let bad_email = RegistrationFields {
            email: "bob",
            ..user_fields()
        };
        assert!(validate_registration(&bad_email).is_err());

        let short_pw = RegistrationFields {
            password: "short",
            ..user_fields()
        };
        assert!(validate_registration(&short_pw).is_err());

        let bad_role = RegistrationFields {
            role: "admin",
            ..user_fields()
        };
        assert!(validate_registration(&bad_role).is_err());
    }
}
