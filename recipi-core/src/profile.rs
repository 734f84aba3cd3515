use crate::error::ValidationErrors;
use crate::image::ImageFile;

pub const MAX_BIO_LEN: usize = 200;
pub const MAX_USERNAME_LEN: usize = 30;

/// Path segment used by the self-service profile endpoints.
const RESERVED_USERNAME: &str = "user";

/// Changes to a user's own profile. Only `Some` fields are sent and applied;
/// `None` means "leave as is", never "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub image: Option<ImageFile>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.bio.is_none() && self.email.is_none() && self.image.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(username) = &self.username {
            errors.extend(validate_username(username));
        }
        if let Some(bio) = &self.bio {
            if bio.chars().count() > MAX_BIO_LEN {
                errors.push(format!("bio must be {} characters or fewer", MAX_BIO_LEN));
            }
        }
        if let Some(email) = &self.email {
            errors.extend(validate_email(email));
        }
        errors.into_result()
    }
}

pub fn validate_username(username: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push("username should not be empty".to_string());
    } else if username.chars().count() > MAX_USERNAME_LEN {
        errors.push(format!(
            "username must be {} characters or fewer",
            MAX_USERNAME_LEN
        ));
    } else if username.eq_ignore_ascii_case(RESERVED_USERNAME) {
        errors.push("username is reserved".to_string());
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push("username may only contain letters, digits, '_' and '-'".to_string());
    }
    errors
}

/// Shape check only: one `@` with text on both sides and a dotted domain.
pub fn validate_email(email: &str) -> Vec<String> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Vec::new()
    } else {
        vec!["email must be an email".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch() {
        assert!(ProfilePatch::default().is_empty());
        let patch = ProfilePatch {
            bio: Some("Hi".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_bio_limit() {
        let patch = ProfilePatch {
            bio: Some("x".repeat(MAX_BIO_LEN + 1)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("osman_k").is_empty());
        assert!(!validate_username("").is_empty());
        assert!(!validate_username("has space").is_empty());
        assert!(!validate_username(&"a".repeat(31)).is_empty());
        assert_eq!(validate_username("User"), vec!["username is reserved"]);
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("cook@example.com").is_empty());
        assert!(!validate_email("cook@example").is_empty());
        assert!(!validate_email("@example.com").is_empty());
        assert!(!validate_email("cook@@example.com").is_empty());
        assert!(!validate_email("co ok@example.com").is_empty());
    }
}
