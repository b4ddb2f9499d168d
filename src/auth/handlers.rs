use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MeResponse, PublicUser, RefreshRequest, RegisterRequest,
            UpdateProfileRequest,
        },
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::{NewUser, User},
        services::{first_name_problem, is_valid_email, normalize_email, password_problem},
    },
    error::RepoError,
    state::AppState,
};

type ApiError = (StatusCode, String);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me))
}

fn internal<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> ApiError {
    move |e| {
        error!(error = %e, "{context}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    }
}

fn issue_tokens(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys
        .sign_access(user.id)
        .map_err(internal("jwt sign access failed"))?;
    let refresh_token = keys
        .sign_refresh(user.id)
        .map_err(internal("jwt sign refresh failed"))?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if let Some(problem) = password_problem(&payload.password) {
        warn!("{problem}");
        return Err((StatusCode::BAD_REQUEST, problem.into()));
    }
    if let Some(problem) = first_name_problem(&payload.first_name) {
        warn!("{problem}");
        return Err((StatusCode::BAD_REQUEST, problem.into()));
    }

    // Ensure email is not taken
    if let Ok(Some(_)) = state.users.find_by_email(&payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err((StatusCode::CONFLICT, "Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password).map_err(internal("hash_password failed"))?;

    let new = NewUser {
        email: payload.email,
        password_hash,
        roles: Vec::new(),
        first_name: payload.first_name.trim().to_string(),
    };
    let user = match state.users.create(&new).await {
        Ok(u) => u,
        Err(RepoError::UniqueViolation(_)) => {
            warn!(email = %new.email, "email registered concurrently");
            return Err((StatusCode::CONFLICT, "Email already registered".into()));
        }
        Err(e) => return Err(internal("create user failed")(e)),
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Json(issue_tokens(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    let user = match state.users.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
        }
        Err(e) => return Err(internal("find_by_email failed")(e)),
    };

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(internal("verify_password failed"))?;
    if !ok {
        warn!(email = %payload.email, user_id = user.id, "login invalid password");
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".into()));
    }

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(issue_tokens(&state, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await
        .map_err(internal("find_by_id failed"))?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(issue_tokens(&state, &user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(internal("find_by_id failed"))?
        .ok_or_else(|| {
            error!(user_id, "user not found");
            (StatusCode::UNAUTHORIZED, "User not found".to_string())
        })?;

    let question_ids = state
        .users
        .question_ids_for_author(user_id)
        .await
        .map_err(internal("question lookup failed"))?;
    let session_ids = state
        .sessions
        .session_ids_for_user(user_id)
        .await
        .map_err(internal("session lookup failed"))?;

    Ok(Json(MeResponse {
        user: PublicUser::from(&user),
        question_ids,
        session_ids,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let current = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(internal("find_by_id failed"))?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    let email = payload
        .email
        .as_deref()
        .map(normalize_email)
        .unwrap_or(current.email);
    if !is_valid_email(&email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    let first_name = payload
        .first_name
        .map(|n| n.trim().to_string())
        .unwrap_or(current.first_name);
    if let Some(problem) = first_name_problem(&first_name) {
        return Err((StatusCode::BAD_REQUEST, problem.into()));
    }

    let user = match state.users.update_profile(user_id, &email, &first_name).await {
        Ok(u) => u,
        Err(RepoError::UniqueViolation(_)) => {
            return Err((StatusCode::CONFLICT, "Email already registered".into()))
        }
        Err(RepoError::NotFound) => {
            return Err((StatusCode::UNAUTHORIZED, "User not found".into()))
        }
        Err(e) => return Err(internal("update_profile failed")(e)),
    };

    info!(user_id, "profile updated");
    Ok(Json(PublicUser::from(&user)))
}
