use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, PublicIdentity, RegisterForm},
        extractors::{clear_session_cookie, session_cookie, CurrentIdentity, SessionCookie},
    },
    error::{AppError, AppResult},
    state::AppState,
    views::{render_rejection, View, ViewContext},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", get(logout))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

pub async fn home(State(state): State<AppState>) -> Response {
    state.views.render(View::Home, StatusCode::OK, ViewContext::new())
}

pub async fn login_page(State(state): State<AppState>) -> Response {
    state.views.render(View::Login, StatusCode::OK, ViewContext::new())
}

pub async fn signup_page(State(state): State<AppState>) -> Response {
    state.views.render(View::Signup, StatusCode::OK, ViewContext::new())
}

#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> AppResult<Response> {
    let ctx = ViewContext::new().with("username", &form.username);
    let creds = match form.validate() {
        Ok(c) => c,
        Err(e) => return render_rejection(state.views.as_ref(), View::Login, e, ctx),
    };

    match state
        .sessions
        .login(&creds.username, &creds.password, creds.remember)
        .await
    {
        Ok(token) => {
            let cookie = session_cookie(&state.config.session, &token);
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
        }
        Err(e) => render_rejection(state.views.as_ref(), View::Login, e, ctx),
    }
}

#[instrument(skip(state, form))]
pub async fn signup(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> AppResult<Response> {
    let ctx = ViewContext::new()
        .with("username", &form.username)
        .with("email", &form.email);
    let reg = match form.validate() {
        Ok(r) => r,
        Err(e) => return render_rejection(state.views.as_ref(), View::Signup, e, ctx),
    };

    match state
        .credentials
        .register(&reg.username, &reg.email, &reg.password)
        .await
    {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(e @ (AppError::Storage(_) | AppError::Internal(_))) => {
            error!(error = %e, "register failed");
            Err(e)
        }
        Err(e) => render_rejection(state.views.as_ref(), View::Signup, e, ctx),
    }
}

#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> AppResult<Response> {
    let records = state.records.find_records_by_owner(identity.id).await?;
    let ctx = ViewContext::new()
        .with("username", &identity.username)
        .with("email", &identity.email)
        .with(
            "identity",
            PublicIdentity {
                id: identity.id,
                username: identity.username.clone(),
                email: identity.email.clone(),
            },
        )
        .with("records", &records);
    Ok(state.views.render(View::Dashboard, StatusCode::OK, ctx))
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    SessionCookie(token): SessionCookie,
) -> Response {
    state.sessions.logout(token.as_deref()).await;
    info!(identity_id = %identity.id, "session closed by user");
    let cookie = clear_session_cookie(&state.config.session);
    (
        [(header::SET_COOKIE, cookie)],
        state.views.render(View::Home, StatusCode::OK, ViewContext::new()),
    )
        .into_response()
}
