use lazy_static::lazy_static;
use regex::Regex;

pub const EMAIL_MAX: usize = 128;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 255;
pub const FIRST_NAME_MIN: usize = 3;
pub const FIRST_NAME_MAX: usize = 255;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.len() <= EMAIL_MAX && EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// First problem with a first name, if any.
pub(crate) fn first_name_problem(name: &str) -> Option<&'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        Some("First name is required")
    } else if len < FIRST_NAME_MIN {
        Some("First name too short")
    } else if len > FIRST_NAME_MAX {
        Some("First name too long")
    } else {
        None
    }
}

pub(crate) fn password_problem(password: &str) -> Option<&'static str> {
    let len = password.chars().count();
    if len < PASSWORD_MIN {
        Some("Password too short")
    } else if len > PASSWORD_MAX {
        Some("Password too long")
    } else {
        None
    }
}
