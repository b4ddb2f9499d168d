use serde::Deserialize;

use super::repo_types::Session;
use crate::web::form::{check_length, check_max_length, FieldError};

pub const FORM_ID: &str = "session";
pub const DELETE_FORM_ID: &str = "session_delete";

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 255;
pub const DESCRIPTION_MAX: usize = 2000;

pub const VERSION_FIELD: &str = "version";

/// Submitted fields of the new/edit form.
///
/// Ownership is never read from here; the handler assigns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Version the edit form was rendered from, as submitted.
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "_token")]
    pub token: String,
    #[serde(default, rename = "_method")]
    pub method: Option<String>,
}

impl SessionForm {
    pub fn from_session(session: &Session) -> Self {
        Self {
            title: session.title.clone(),
            description: session.description.clone().unwrap_or_default(),
            version: session.version.to_string(),
            ..Self::default()
        }
    }

    pub fn version(&self) -> Option<i32> {
        self.version.trim().parse().ok()
    }

    /// Field-level checks; CSRF is verified separately by the handler.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_length(&mut errors, "title", self.title.trim(), TITLE_MIN, TITLE_MAX);
        check_max_length(&mut errors, "description", self.description.trim(), DESCRIPTION_MAX);
        errors
    }

    /// Edit checks; the version the form was rendered from must come back intact.
    pub fn validate_edit(&self) -> Vec<FieldError> {
        let mut errors = self.validate();
        if self.version().is_none() {
            errors.push(FieldError::new(VERSION_FIELD, "validation.stale"));
        }
        errors
    }

    /// Copies the validated values onto `session`.
    pub fn apply(&self, session: &mut Session) {
        session.title = self.title.trim().to_string();
        let description = self.description.trim();
        session.description = (!description.is_empty()).then(|| description.to_string());
        if let Some(version) = self.version() {
            session.version = version;
        }
    }
}

/// The delete confirmation carries nothing but its token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default, rename = "_token")]
    pub token: String,
    #[serde(default, rename = "_method")]
    pub method: Option<String>,
}

/// True when a POST tunnels `expected` through the `_method` field.
pub fn tunnels(method: Option<&str>, expected: &str) -> bool {
    method.is_some_and(|m| m.eq_ignore_ascii_case(expected))
}
