use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{
    form::{SessionForm, VERSION_FIELD},
    repo_types::Session,
};
use crate::web::{
    flash::Flash,
    form::{messages_for, FieldError, TOKEN_FIELD},
    html::{csrf_field, escape, field_errors, hidden, layout, logout_form},
    i18n::Translator,
    pagination::Page,
};

fn stamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

fn session_path(session: &Session, suffix: &str) -> String {
    format!("/session/{}{}", session.id.unwrap_or_default(), suffix)
}

pub fn index(
    t: &Translator,
    flashes: &[Flash],
    page: &Page<Session>,
    logout_token: &str,
) -> String {
    let mut body = format!(
        r#"<p><a href="/session/new">{}</a></p>{}"#,
        escape(&t.t("action.create")),
        logout_form(t, logout_token)
    );

    if page.items.is_empty() {
        body.push_str(&format!("<p>{}</p>", escape(&t.t("message.empty_list"))));
    } else {
        body.push_str(&format!(
            "<table>\n<thead><tr><th>{}</th><th>{}</th><th></th></tr></thead>\n<tbody>\n",
            escape(&t.t("label.title")),
            escape(&t.t("label.updated_at")),
        ));
        for s in &page.items {
            body.push_str(&format!(
                r#"<tr><td>{title}</td><td>{updated}</td><td><a href="{view}">{view_label}</a> <a href="{edit}">{edit_label}</a> <a href="{delete}">{delete_label}</a></td></tr>"#,
                title = escape(&s.title),
                updated = stamp(s.updated_at),
                view = session_path(s, ""),
                edit = session_path(s, "/edit"),
                delete = session_path(s, "/delete"),
                view_label = escape(&t.t("action.view")),
                edit_label = escape(&t.t("action.edit")),
                delete_label = escape(&t.t("action.delete")),
            ));
            body.push('\n');
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str(&pager(t, page));
    layout(t, &t.t("title.session_list"), flashes, &body)
}

fn pager<T>(t: &Translator, page: &Page<T>) -> String {
    let mut nav = String::from(r#"<nav class="pagination">"#);
    if page.has_previous() {
        nav.push_str(&format!(
            r#"<a href="/session/?page={}" rel="prev">{}</a> "#,
            page.page - 1,
            escape(&t.t("action.previous"))
        ));
    }
    nav.push_str(&format!(
        "<span>{}</span>",
        escape(&t.t_with(
            "message.page",
            &[
                ("page", page.page.to_string()),
                ("pages", page.total_pages().to_string()),
            ],
        ))
    ));
    if page.has_next() {
        nav.push_str(&format!(
            r#" <a href="/session/?page={}" rel="next">{}</a>"#,
            page.page + 1,
            escape(&t.t("action.next"))
        ));
    }
    nav.push_str("</nav>");
    nav
}

pub fn view(t: &Translator, flashes: &[Flash], session: &Session) -> String {
    let body = format!(
        r#"<dl>
<dt>{title_label}</dt><dd class="session-title">{title}</dd>
<dt>{description_label}</dt><dd class="session-description">{description}</dd>
<dt>{created_label}</dt><dd>{created}</dd>
<dt>{updated_label}</dt><dd>{updated}</dd>
</dl>
<p><a href="{edit}">{edit_label}</a> <a href="{delete}">{delete_label}</a> <a href="/session/">{back}</a></p>"#,
        title_label = escape(&t.t("label.title")),
        title = escape(&session.title),
        description_label = escape(&t.t("label.description")),
        description = escape(session.description.as_deref().unwrap_or("")),
        created_label = escape(&t.t("label.created_at")),
        created = stamp(session.created_at),
        updated_label = escape(&t.t("label.updated_at")),
        updated = stamp(session.updated_at),
        edit = session_path(session, "/edit"),
        edit_label = escape(&t.t("action.edit")),
        delete = session_path(session, "/delete"),
        delete_label = escape(&t.t("action.delete")),
        back = escape(&t.t("action.back")),
    );
    layout(t, &t.t("title.session_view"), flashes, &body)
}

/// Where a session form posts and which verb it tunnels.
pub enum FormTarget<'a> {
    New,
    Edit(&'a Session),
}

pub fn form(
    t: &Translator,
    flashes: &[Flash],
    target: FormTarget<'_>,
    input: &SessionForm,
    errors: &[FieldError],
    token: &str,
) -> String {
    let (title, action, extra) = match target {
        FormTarget::New => (t.t("title.session_new"), "/session/new".to_string(), String::new()),
        FormTarget::Edit(session) => (
            t.t("title.session_edit"),
            session_path(session, "/edit"),
            format!("{}{}", hidden("_method", "PUT"), hidden("version", &input.version)),
        ),
    };

    let body = format!(
        r#"{form_errors}<form method="post" action="{action}">
{extra}{csrf}
<div><label for="title">{title_label}</label>
<input type="text" id="title" name="title" value="{title_value}" required maxlength="255">
{title_errors}</div>
<div><label for="description">{description_label}</label>
<textarea id="description" name="description">{description_value}</textarea>
{description_errors}</div>
<button type="submit">{save}</button>
</form>
<p><a href="/session/">{back}</a></p>"#,
        form_errors = field_errors(
            &[
                messages_for(errors, TOKEN_FIELD, t),
                messages_for(errors, VERSION_FIELD, t),
            ]
            .concat()
        ),
        action = escape(&action),
        csrf = csrf_field(token),
        title_label = escape(&t.t("label.title")),
        title_value = escape(&input.title),
        title_errors = field_errors(&messages_for(errors, "title", t)),
        description_label = escape(&t.t("label.description")),
        description_value = escape(&input.description),
        description_errors = field_errors(&messages_for(errors, "description", t)),
        save = escape(&t.t("action.save")),
        back = escape(&t.t("action.back")),
    );
    layout(t, &title, flashes, &body)
}

pub fn delete(
    t: &Translator,
    flashes: &[Flash],
    session: &Session,
    errors: &[FieldError],
    token: &str,
) -> String {
    let body = format!(
        r#"{form_errors}<p>{confirm}</p>
<p class="session-title">{title}</p>
<form method="post" action="{action}">
{method}{csrf}
<button type="submit">{delete_label}</button>
</form>
<p><a href="/session/">{back}</a></p>"#,
        form_errors = field_errors(&messages_for(errors, TOKEN_FIELD, t)),
        confirm = escape(&t.t("message.delete_confirm")),
        title = escape(&session.title),
        action = session_path(session, "/delete"),
        method = hidden("_method", "DELETE"),
        csrf = csrf_field(token),
        delete_label = escape(&t.t("action.delete")),
        back = escape(&t.t("action.back")),
    );
    layout(t, &t.t("title.session_delete"), flashes, &body)
}
