use axum::{extract::State, http::StatusCode, response::Response, routing::get, Form, Router};
use tracing::instrument;

use crate::{
    auth::extractors::CurrentIdentity,
    error::AppResult,
    records::dto::HealthRecordFields,
    state::AppState,
    views::{render_rejection, View, ViewContext},
};

pub const MSG_SAVED: &str = "data saved";

pub fn covid_routes() -> Router<AppState> {
    Router::new().route("/covid", get(covid_form).post(submit_covid_form))
}

#[instrument(skip_all)]
pub async fn covid_form(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Response {
    let ctx = ViewContext::new().with("username", &identity.username);
    state.views.render(View::Covid, StatusCode::OK, ctx)
}

#[instrument(skip_all)]
pub async fn submit_covid_form(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Form(fields): Form<HealthRecordFields>,
) -> AppResult<Response> {
    let ctx = ViewContext::new().with("username", &identity.username);
    match state.records.submit(&identity, &fields).await {
        Ok(record) => {
            let ctx = ctx.message(MSG_SAVED).with("record", &record);
            Ok(state.views.render(View::Covid, StatusCode::OK, ctx))
        }
        Err(e) => render_rejection(state.views.as_ref(), View::Covid, e, ctx),
    }
}
