//! Authentication routes for register, login, token refresh and logout.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use tally_core::auth::{User, hash_password, normalize_username, verify_password};
use tally_shared::{
    AuthResponse, CredentialsRequest, IssuedToken, RefreshRequest, TokenKind, TokenPair,
    UserInfo,
};
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiResult, unauthorized};
use crate::middleware::auth::{ACCESS_COOKIE, AuthUser, REFRESH_COOKIE};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Creates the auth routes that sit behind the auth middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/user", get(current_user))
}

fn auth_cookie(state: &AppState, name: &'static str, value: String) -> Cookie<'static> {
    let mut builder = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(state.cookies.secure)
        .same_site(SameSite::Lax);
    if !state.cookies.domain.is_empty() {
        builder = builder.domain(state.cookies.domain.clone());
    }
    builder.build()
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
    }
}

/// Issues an access/refresh pair, records the refresh session, and sets both cookies.
async fn issue_tokens(
    state: &AppState,
    user: &User,
    jar: CookieJar,
) -> ApiResult<(CookieJar, TokenPair)> {
    let access = state
        .jwt_service
        .generate_access_token(user.id, &user.username, &user.role)?;
    let refresh = state
        .jwt_service
        .generate_refresh_token(user.id, &user.username, &user.role)?;

    state
        .storage
        .sessions
        .create_session(user.id, &refresh.token, refresh.expires_at, state.clock.now())
        .await?;

    let jar = jar
        .add(auth_cookie(state, ACCESS_COOKIE, access.token.clone()))
        .add(auth_cookie(state, REFRESH_COOKIE, refresh.token.clone()));
    let pair = TokenPair::new(
        access.token,
        refresh.token,
        state.jwt_service.access_token_expires_in(),
    );
    Ok((jar, pair))
}

/// POST /auth/register - Create an account and sign it in.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = normalize_username(&payload.username)?;
    let password_hash = hash_password(&payload.password)?;
    let user = state
        .storage
        .users
        .create_user(User::new(username, password_hash, state.clock.now()))
        .await?;

    let (jar, tokens) = issue_tokens(&state, &user, jar).await?;
    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user: user_info(&user),
            tokens,
        }),
    ))
}

/// POST /auth/login - Authenticate and return tokens.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let Some(user) = state
        .storage
        .users
        .find_by_username(payload.username.trim())
        .await?
    else {
        info!(username = %payload.username, "Login attempt for non-existent user");
        return Err(unauthorized("Invalid username or password"));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(unauthorized("Invalid username or password"));
    }

    let (jar, tokens) = issue_tokens(&state, &user, jar).await?;
    info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(AuthResponse {
            user: user_info(&user),
            tokens,
        }),
    ))
}

/// POST /auth/refresh - Mint a new access token from a live refresh session.
async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    let claims = state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|e| {
            info!(error = %e, "Rejected refresh token");
            unauthorized("Invalid refresh token")
        })?;

    let now = state.clock.now();
    let Some(session) = state
        .storage
        .sessions
        .find_active(&payload.refresh_token, now)
        .await?
    else {
        warn!(user_id = %claims.sub, "Refresh token has no active session");
        return Err(unauthorized("Session expired or revoked"));
    };

    let Some(user) = state.storage.users.find_by_id(session.user_id).await? else {
        return Err(unauthorized("Session expired or revoked"));
    };

    let IssuedToken { token, .. } =
        state
            .jwt_service
            .generate_access_token(user.id, &user.username, &user.role)?;
    let jar = jar.add(auth_cookie(&state, ACCESS_COOKIE, token.clone()));

    Ok((
        jar,
        Json(json!({
            "accessToken": token,
            "expiresIn": state.jwt_service.access_token_expires_in(),
        })),
    ))
}

/// POST /auth/logout - Revoke the refresh session and clear the cookies.
///
/// The refresh token comes from the body or, failing that, the refresh cookie.
/// Unknown or already revoked tokens still clear the cookies.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Option<Json<RefreshRequest>>,
) -> ApiResult<impl IntoResponse> {
    let token = payload
        .map(|Json(body)| body.refresh_token)
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()));

    if let Some(token) = token {
        let now = state.clock.now();
        if let Some(session) = state.storage.sessions.find_active(&token, now).await? {
            state.storage.sessions.revoke(session.id, now).await?;
            info!(user_id = %session.user_id, "Session revoked");
        }
    }

    let jar = jar
        .remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"));
    Ok((StatusCode::NO_CONTENT, jar))
}

/// GET /auth/user - Current account.
async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserInfo>> {
    match state.storage.users.find_by_id(auth.user_id()).await? {
        Some(user) => Ok(Json(user_info(&user))),
        None => Err(unauthorized("Account no longer exists")),
    }
}
