use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.+-]+@[\w-]+\.[\w.-]+$").expect("The email pattern is a valid regex")
});

/// An email address as the service renders it in user records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEmailAddress(String);

impl UserEmailAddress {
    pub fn parse(s: String) -> Result<UserEmailAddress, String> {
        if EMAIL_PATTERN.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid user email.", s))
        }
    }
}

impl AsRef<str> for UserEmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
