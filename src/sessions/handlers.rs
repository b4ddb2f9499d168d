use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tower_sessions::Session as BrowserSession;
use tracing::{debug, info, instrument};

use super::{
    form::{tunnels, DeleteForm, SessionForm, DELETE_FORM_ID, FORM_ID},
    repo_types::Session,
    views::{self, FormTarget},
};
use crate::{
    auth::{pages::LOGOUT_FORM_ID, AuthUser},
    error::AppError,
    state::AppState,
    web::{
        csrf, flash,
        form::{FieldError, TOKEN_FIELD},
        html::found,
        pagination::{paginate, PageParams},
    },
};

const INDEX_PATH: &str = "/session/";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(index))
        .route("/session/", get(index))
        .route("/session/new", get(new_form).post(create))
        .route("/session/:id", get(view))
        .route("/session/:id/edit", get(edit_form).put(update).post(update))
        .route(
            "/session/:id/delete",
            get(delete_form).delete(destroy).post(destroy),
        )
}

/// Ids are decimal without a leading zero; anything else is not found.
fn parse_id(raw: &str) -> Option<i64> {
    lazy_static! {
        static ref ID_RE: Regex = Regex::new(r"^[1-9]\d*$").unwrap();
    }
    if !ID_RE.is_match(raw) {
        return None;
    }
    raw.parse().ok()
}

async fn load_owned(state: &AppState, raw_id: &str, user_id: i64) -> Result<Session, AppError> {
    let id = parse_id(raw_id).ok_or(AppError::NotFound)?;
    state
        .sessions
        .find_for_user(id, user_id)
        .await?
        .ok_or(AppError::NotFound)
}

async fn csrf_errors(
    browser: &BrowserSession,
    form_id: &str,
    submitted: &str,
) -> Result<Vec<FieldError>, AppError> {
    if csrf::is_valid(browser, form_id, submitted).await? {
        Ok(Vec::new())
    } else {
        Ok(vec![FieldError::new(TOKEN_FIELD, "validation.csrf")])
    }
}

#[instrument(skip(state, browser))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    browser: BrowserSession,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, AppError> {
    let query = state.sessions.query_all_for_user(user_id);
    let page = paginate(
        &*state.sessions,
        &query,
        params.number(),
        state.config.sessions_per_page,
    )
    .await?;
    let logout_token = csrf::token(&browser, LOGOUT_FORM_ID).await?;
    let flashes = flash::take(&browser).await?;
    Ok(Html(views::index(
        &state.translator,
        &flashes,
        &page,
        &logout_token,
    )))
}

#[instrument(skip(state, browser))]
pub async fn view(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    browser: BrowserSession,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let record = load_owned(&state, &id, user_id).await?;
    let flashes = flash::take(&browser).await?;
    Ok(Html(views::view(&state.translator, &flashes, &record)))
}

#[instrument(skip(state, browser))]
pub async fn new_form(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    browser: BrowserSession,
) -> Result<Html<String>, AppError> {
    let token = csrf::token(&browser, FORM_ID).await?;
    let flashes = flash::take(&browser).await?;
    Ok(Html(views::form(
        &state.translator,
        &flashes,
        FormTarget::New,
        &SessionForm::default(),
        &[],
        &token,
    )))
}

#[instrument(skip(state, browser, input))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    browser: BrowserSession,
    Form(input): Form<SessionForm>,
) -> Result<Response, AppError> {
    let t = &state.translator;
    let mut errors = csrf_errors(&browser, FORM_ID, &input.token).await?;
    errors.extend(input.validate());

    if !errors.is_empty() {
        debug!(user_id, errors = errors.len(), "session form rejected");
        let token = csrf::token(&browser, FORM_ID).await?;
        let page = views::form(t, &[], FormTarget::New, &input, &errors, &token);
        return Ok(Html(page).into_response());
    }

    let mut record = Session::new(user_id);
    input.apply(&mut record);
    record.user_id = user_id;
    state.sessions.save(&mut record).await?;

    flash::add(&browser, "success", t.t("message.created_successfully")).await?;
    info!(user_id, session_id = record.id, "session created");
    Ok(found(INDEX_PATH))
}

#[instrument(skip(state, browser))]
pub async fn edit_form(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    browser: BrowserSession,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let record = load_owned(&state, &id, user_id).await?;
    let token = csrf::token(&browser, FORM_ID).await?;
    let flashes = flash::take(&browser).await?;
    Ok(Html(views::form(
        &state.translator,
        &flashes,
        FormTarget::Edit(&record),
        &SessionForm::from_session(&record),
        &[],
        &token,
    )))
}

/// Handles `PUT`, and `POST` carrying `_method=PUT`.
#[instrument(skip(state, browser, input))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    method: Method,
    browser: BrowserSession,
    Path(id): Path<String>,
    Form(input): Form<SessionForm>,
) -> Result<Response, AppError> {
    if method == Method::POST && !tunnels(input.method.as_deref(), "PUT") {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }
    let t = &state.translator;
    let mut record = load_owned(&state, &id, user_id).await?;

    let mut errors = csrf_errors(&browser, FORM_ID, &input.token).await?;
    errors.extend(input.validate_edit());
    if !errors.is_empty() {
        debug!(user_id, errors = errors.len(), "session form rejected");
        let token = csrf::token(&browser, FORM_ID).await?;
        let page = views::form(t, &[], FormTarget::Edit(&record), &input, &errors, &token);
        return Ok(Html(page).into_response());
    }

    input.apply(&mut record);
    state.sessions.save(&mut record).await?;

    flash::add(&browser, "success", t.t("message.updated_successfully")).await?;
    info!(user_id, session_id = record.id, version = record.version, "session updated");
    Ok(found(INDEX_PATH))
}

#[instrument(skip(state, browser))]
pub async fn delete_form(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    browser: BrowserSession,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let record = load_owned(&state, &id, user_id).await?;
    let token = csrf::token(&browser, DELETE_FORM_ID).await?;
    let flashes = flash::take(&browser).await?;
    Ok(Html(views::delete(
        &state.translator,
        &flashes,
        &record,
        &[],
        &token,
    )))
}

/// Handles `DELETE`, and `POST` carrying `_method=DELETE`.
///
/// A request without a form body counts as an empty submission.
#[instrument(skip(state, browser, input))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    method: Method,
    browser: BrowserSession,
    Path(id): Path<String>,
    input: Option<Form<DeleteForm>>,
) -> Result<Response, AppError> {
    let input = input.map(|Form(f)| f).unwrap_or_default();
    if method == Method::POST && !tunnels(input.method.as_deref(), "DELETE") {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }
    let t = &state.translator;
    let record = load_owned(&state, &id, user_id).await?;

    let errors = csrf_errors(&browser, DELETE_FORM_ID, &input.token).await?;
    if !errors.is_empty() {
        debug!(user_id, session_id = record.id, "delete confirmation rejected");
        let token = csrf::token(&browser, DELETE_FORM_ID).await?;
        let page = views::delete(t, &[], &record, &errors, &token);
        return Ok(Html(page).into_response());
    }

    state.sessions.delete(&record).await?;

    flash::add(&browser, "success", t.t("message.deleted_successfully")).await?;
    info!(user_id, session_id = record.id, "session deleted");
    Ok(found(INDEX_PATH))
}
