use std::collections::HashMap;
use std::time::Instant;

use axum::extract::State;
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use super::session::Sessions;
use super::views::{render_confirm_page, render_page};
use crate::controller::unregister_prompt;
use crate::directory::ViewAction;

const REFRESH: HeaderName = HeaderName::from_static("refresh");

#[derive(Debug, Deserialize)]
pub(crate) struct SignupFields {
    email: String,
    activity: String,
}

pub(crate) async fn dashboard_handler(
    State(sessions): State<Sessions>,
    headers: HeaderMap,
) -> Response {
    let session = sessions.resolve(&headers).await;
    let now = Instant::now();
    let state = session.frontend.state();
    let html = render_page(&state, now);

    // reload once the visible message expires so it disappears on time
    let resp = match state.feedback.visible_at(now) {
        Some(f) => {
            let secs = f.remaining(now).as_secs_f64().ceil() as u64;
            ([(REFRESH, secs.to_string())], Html(html)).into_response()
        }
        None => Html(html).into_response(),
    };
    drop(state);
    session.respond(resp)
}

pub(crate) async fn signup_handler(
    State(sessions): State<Sessions>,
    headers: HeaderMap,
    Form(fields): Form<SignupFields>,
) -> Response {
    let session = sessions.resolve(&headers).await;
    session
        .frontend
        .submit_signup(&fields.email, &fields.activity)
        .await;
    session.respond(Redirect::to("/"))
}

/// Single entry point for every control rendered inside the activity list.
pub(crate) async fn actions_handler(
    State(sessions): State<Sessions>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let Some(action) = ViewAction::from_form(&fields) else {
        warn!("Unrecognised list action: {:?}", fields.get("action"));
        return StatusCode::BAD_REQUEST.into_response();
    };

    let session = sessions.resolve(&headers).await;
    let confirmed = fields.get("confirmed").is_some_and(|v| v == "true");
    if !confirmed {
        let prompt = match &action {
            ViewAction::Unregister { activity, email } => unregister_prompt(activity, email),
        };
        return session.respond(Html(render_confirm_page(&prompt, &action)));
    }

    session.frontend.dispatch(action, |_: &str| true).await;
    session.respond(Redirect::to("/"))
}

pub(crate) async fn refresh_handler(
    State(sessions): State<Sessions>,
    headers: HeaderMap,
) -> Response {
    let session = sessions.resolve(&headers).await;
    session.frontend.load_activities().await;
    session.respond(Redirect::to("/"))
}
