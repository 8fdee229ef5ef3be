//! User domain model.

use serde::{Deserialize, Serialize};
use shared::password::{digest_password, PasswordError};
use validator::Validate;

use super::base::BaseModel;

/// A host or guest account.
///
/// `password` always holds an Argon2id digest; constructors take the
/// plaintext and digest it immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub base: BaseModel,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>, password: &str) -> Result<Self, PasswordError> {
        Ok(Self {
            base: BaseModel::new(),
            email: email.into(),
            password: digest_password(password)?,
            first_name: None,
            last_name: None,
        })
    }

    /// Replaces the stored digest with a digest of `password`.
    pub fn set_password(&mut self, password: &str) -> Result<(), PasswordError> {
        self.password = digest_password(password)?;
        Ok(())
    }

    /// Checks a plaintext candidate against the stored digest.
    pub fn check_password(&self, candidate: &str) -> bool {
        shared::password::verify_password(candidate, &self.password).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "Missing email"),
        email(message = "Invalid email format"),
        length(max = 128, message = "Email must be at most 128 characters")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Missing password"),
        length(min = 1, max = 128, message = "Password must be between 1 and 128 characters")
    )]
    pub password: Option<String>,

    #[validate(length(max = 128, message = "First name must be at most 128 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 128, message = "Last name must be at most 128 characters"))]
    pub last_name: Option<String>,
}

/// Request payload for updating a user. The email cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
    pub password: Option<String>,

    #[validate(length(max = 128, message = "First name must be at most 128 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 128, message = "Last name must be at most 128 characters"))]
    pub last_name: Option<String>,
}

impl UpdateUserRequest {
    pub fn apply(self, user: &mut User) -> Result<(), PasswordError> {
        if let Some(password) = self.password {
            user.set_password(&password)?;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            user.last_name = Some(last_name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_new_user_stores_digest() {
        let email: String = SafeEmail().fake();
        let user = User::new(email.clone(), "pwd").unwrap();
        assert_eq!(user.email, email);
        assert_ne!(user.password, "pwd");
        assert!(shared::password::is_digest(&user.password));
        assert!(user.check_password("pwd"));
        assert!(!user.check_password("other"));
    }

    #[test]
    fn test_update_rehashes_password() {
        let mut user = User::new("a@example.com", "old").unwrap();
        let request = UpdateUserRequest {
            password: Some("new".to_string()),
            first_name: Some("Betty".to_string()),
            last_name: None,
        };
        request.apply(&mut user).unwrap();
        assert!(user.check_password("new"));
        assert_eq!(user.first_name.as_deref(), Some("Betty"));
        assert!(user.last_name.is_none());
    }

    #[test]
    fn test_create_request_requires_email_and_password() {
        let request: CreateUserRequest = serde_json::from_str("{}").unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["email"][0].message.as_deref(), Some("Missing email"));
        assert_eq!(
            fields["password"][0].message.as_deref(),
            Some("Missing password")
        );
    }

    #[test]
    fn test_create_request_rejects_bad_email() {
        let request = CreateUserRequest {
            email: Some("not-an-email".to_string()),
            password: Some("pwd".to_string()),
            first_name: None,
            last_name: None,
        };
        assert!(request.validate().is_err());
    }
}
