use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::{flash::Flash, form::TOKEN_FIELD, i18n::Translator};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Redirect with `302 Found`, which is what browsers expect after a form post.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Wraps a page body in the shared document shell.
pub fn layout(t: &Translator, title: &str, flashes: &[Flash], body: &str) -> String {
    let mut notices = String::new();
    for f in flashes {
        notices.push_str(&format!(
            r#"<div class="alert alert-{}" role="alert">{}</div>"#,
            escape(&f.kind),
            escape(&f.message)
        ));
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<main>
{notices}
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        lang = t.locale(),
        title = escape(title),
    )
}

pub fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        escape(name),
        escape(value)
    )
}

pub fn csrf_field(token: &str) -> String {
    hidden(TOKEN_FIELD, token)
}

/// The logout button, posting its own CSRF token.
pub fn logout_form(t: &Translator, token: &str) -> String {
    format!(
        r#"<form method="post" action="/logout" class="logout">{}<button type="submit">{}</button></form>"#,
        csrf_field(token),
        escape(&t.t("action.logout"))
    )
}

/// Renders the list of messages attached to a field, if any.
pub fn field_errors(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!(r#"<ul class="form-errors">{items}</ul>"#)
}
