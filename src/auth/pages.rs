use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use tower_sessions::Session;
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{LoginForm, LogoutForm}, extractors::SESSION_USER_KEY, password::verify_password,
    services::normalize_email,
};
use crate::{
    error::AppError,
    state::AppState,
    web::{
        csrf,
        flash::{self, Flash},
        form::{messages_for, FieldError, TOKEN_FIELD},
        html::{csrf_field, escape, field_errors, found, layout},
        i18n::Translator,
    },
};

const FORM_ID: &str = "login";
pub const LOGOUT_FORM_ID: &str = "logout";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", post(logout))
}

fn login_view(
    t: &Translator,
    flashes: &[Flash],
    email: &str,
    errors: &[FieldError],
    token: &str,
) -> String {
    let body = format!(
        r#"{errors}<form method="post" action="/login">
{csrf}
<div><label for="email">{email_label}</label>
<input type="email" id="email" name="email" value="{email}" required></div>
<div><label for="password">{password_label}</label>
<input type="password" id="password" name="password" required></div>
<button type="submit">{submit}</button>
</form>"#,
        errors = field_errors(&messages_for(errors, TOKEN_FIELD, t)),
        csrf = csrf_field(token),
        email_label = escape(&t.t("label.email")),
        email = escape(email),
        password_label = escape(&t.t("label.password")),
        submit = escape(&t.t("action.login")),
    );
    layout(t, &t.t("title.login"), flashes, &body)
}

#[instrument(skip(state, session))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let token = csrf::token(&session, FORM_ID).await?;
    let flashes = flash::take(&session).await?;
    Ok(Html(login_view(&state.translator, &flashes, "", &[], &token)))
}

#[instrument(skip(state, session, form))]
pub async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let t = &state.translator;
    let email = normalize_email(&form.email);

    let mut errors = Vec::new();
    if !csrf::is_valid(&session, FORM_ID, &form.token).await? {
        errors.push(FieldError::new(TOKEN_FIELD, "validation.csrf"));
    } else {
        let user = state.users.find_by_email(&email).await?;
        let verified = match &user {
            Some(u) => verify_password(&form.password, &u.password_hash)?,
            None => false,
        };
        match user {
            Some(u) if verified => {
                session.cycle_id().await?;
                session.insert(SESSION_USER_KEY, u.id).await?;
                flash::add(
                    &session,
                    "success",
                    t.t_with("message.logged_in", &[("name", u.first_name.clone())]),
                )
                .await?;
                info!(user_id = u.id, username = u.username(), "browser login");
                return Ok(found("/session/"));
            }
            _ => errors.push(FieldError::new(TOKEN_FIELD, "validation.invalid_credentials")),
        }
    }

    debug!(email = %email, "browser login rejected");
    let token = csrf::token(&session, FORM_ID).await?;
    Ok(Html(login_view(t, &[], &email, &errors, &token)).into_response())
}

/// A request without a valid logout token leaves the session untouched.
#[instrument(skip(state, session, form))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    form: Option<Form<LogoutForm>>,
) -> Result<Response, AppError> {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    if !csrf::is_valid(&session, LOGOUT_FORM_ID, &form.token).await? {
        warn!("logout rejected: bad csrf token");
        return Ok(found("/session/"));
    }
    session.flush().await?;
    flash::add(&session, "success", state.translator.t("message.logged_out")).await?;
    Ok(found("/login"))
}
