use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{AppError, AppResult};

pub const MSG_USER_NOT_FOUND: &str = "user does not exist";

/// Pages the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Home,
    Login,
    Signup,
    Dashboard,
    Covid,
}

/// Values handed to a view, plus one-shot user messages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewContext {
    pub messages: Vec<String>,
    pub context: Map<String, Value>,
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.messages.push(msg.into());
        self
    }

    /// Values that fail to serialize are logged and stored as `null`.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "view context value failed to serialize");
                Value::Null
            }
        };
        self.context.insert(key.to_string(), value);
        self
    }
}

/// Presentation collaborator: turns a view name and its context into a response.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: View, status: StatusCode, ctx: ViewContext) -> Response;
}

/// Renders views as JSON documents: `{"view": ..., "messages": [...], "context": {...}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViews;

#[derive(Serialize)]
struct RenderedView {
    view: View,
    #[serde(flatten)]
    ctx: ViewContext,
}

impl ViewRenderer for JsonViews {
    fn render(&self, view: View, status: StatusCode, ctx: ViewContext) -> Response {
        (status, Json(RenderedView { view, ctx })).into_response()
    }
}

/// Re-renders the originating form for errors a user can fix. Anything else
/// is handed back to the caller.
pub fn render_rejection(
    views: &dyn ViewRenderer,
    view: View,
    err: AppError,
    ctx: ViewContext,
) -> AppResult<Response> {
    let status = err.status();
    let ctx = match err {
        AppError::Validation(errors) => ctx.with("errors", errors),
        AppError::UserNotFound | AppError::BadCredentials => ctx.message(MSG_USER_NOT_FOUND),
        e @ (AppError::DuplicateUsername | AppError::DuplicateEmail) => ctx.message(e.to_string()),
        other => return Err(other),
    };
    Ok(views.render(view, status, ctx))
}
