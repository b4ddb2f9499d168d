use super::i18n::Translator;

/// Field name used for errors that belong to the form as a whole.
pub const TOKEN_FIELD: &str = "_token";

/// A validation message bound to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub key: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl FieldError {
    pub fn new(field: &'static str, key: &'static str) -> Self {
        Self {
            field,
            key,
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    pub fn message(&self, t: &Translator) -> String {
        let params: Vec<(&str, String)> =
            self.params.iter().map(|(k, v)| (*k, v.clone())).collect();
        t.t_with(self.key, &params)
    }
}

/// Messages for `field`, translated.
pub fn messages_for(errors: &[FieldError], field: &str, t: &Translator) -> Vec<String> {
    errors
        .iter()
        .filter(|e| e.field == field)
        .map(|e| e.message(t))
        .collect()
}

/// Not-blank plus character-length bounds, the constraint set every text field uses.
pub fn check_length(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "validation.not_blank"));
    } else if len < min {
        errors.push(FieldError::new(field, "validation.too_short").with_param("limit", min));
    } else if len > max {
        errors.push(FieldError::new(field, "validation.too_long").with_param("limit", max));
    }
}

/// Upper bound only; blank is allowed.
pub fn check_max_length(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError::new(field, "validation.too_long").with_param("limit", max));
    }
}
