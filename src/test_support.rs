//! In-process stand-in for the activities service, used by tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use crate::models::{Activity, ActivityCollection};

/// Fixed answer for the signup route, bypassing the roster logic.
#[derive(Clone)]
pub(crate) enum CannedReply {
    Json(StatusCode, serde_json::Value),
    Text(StatusCode, &'static str),
}

impl IntoResponse for CannedReply {
    fn into_response(self) -> Response {
        match self {
            CannedReply::Json(status, body) => (status, Json(body)).into_response(),
            CannedReply::Text(status, body) => (status, body).into_response(),
        }
    }
}

#[derive(Clone)]
struct FakeState {
    activities: Arc<Mutex<ActivityCollection>>,
    list_calls: Arc<AtomicUsize>,
    mutation_calls: Arc<AtomicUsize>,
    list_broken: Arc<AtomicBool>,
    signup_reply: Arc<Mutex<Option<CannedReply>>>,
}

pub(crate) struct FakeActivitiesServer {
    pub(crate) base_url: String,
    state: FakeState,
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

fn activity(description: &str, schedule: &str, max: u32, participants: &[&str]) -> Activity {
    Activity {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants: max,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

fn rejection(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

impl FakeActivitiesServer {
    pub(crate) fn school_seed() -> ActivityCollection {
        ActivityCollection::new(vec![
            (
                "Chess Club".into(),
                activity(
                    "Learn strategies and compete in chess tournaments",
                    "Fridays, 3:30 PM - 5:00 PM",
                    12,
                    &["michael@mergington.edu", "daniel@mergington.edu"],
                ),
            ),
            (
                "Programming Class".into(),
                activity(
                    "Learn programming fundamentals and build software projects",
                    "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                    20,
                    &["emma@mergington.edu", "sophia@mergington.edu"],
                ),
            ),
            (
                "Gym Class".into(),
                activity(
                    "Physical education and sports activities",
                    "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                    30,
                    &["john@mergington.edu", "olivia@mergington.edu"],
                ),
            ),
            (
                "Tennis Club".into(),
                activity(
                    "Tennis lessons and tournament preparation",
                    "Tuesdays and Thursdays, 4:00 PM - 5:00 PM",
                    1,
                    &["alex@mergington.edu"],
                ),
            ),
            (
                "Science Club".into(),
                activity(
                    "Explore scientific experiments and research projects",
                    "Fridays, 4:00 PM - 5:30 PM",
                    18,
                    &[],
                ),
            ),
        ])
    }

    pub(crate) fn chess_seed() -> ActivityCollection {
        ActivityCollection::new(vec![(
            "Chess Club".into(),
            activity("Chess", "Fridays", 2, &["a@x.com"]),
        )])
    }

    pub(crate) async fn start(seed: ActivityCollection) -> Self {
        let state = FakeState {
            activities: Arc::new(Mutex::new(seed)),
            list_calls: Arc::new(AtomicUsize::new(0)),
            mutation_calls: Arc::new(AtomicUsize::new(0)),
            list_broken: Arc::new(AtomicBool::new(false)),
            signup_reply: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .route("/activities", get(list_handler))
            .route("/activities/{name}/signup", post(signup_handler))
            .route("/activities/{name}/participants", delete(unregister_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn mutation_calls(&self) -> usize {
        self.state.mutation_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn set_list_broken(&self, broken: bool) {
        self.state.list_broken.store(broken, Ordering::SeqCst);
    }

    pub(crate) fn answer_signups_with(&self, reply: CannedReply) {
        *self.state.signup_reply.lock().unwrap() = Some(reply);
    }

    pub(crate) fn participants(&self, name: &str) -> Vec<String> {
        self.state
            .activities
            .lock()
            .unwrap()
            .get(name)
            .map(|a| a.participants.clone())
            .unwrap_or_default()
    }

    /// Mutate server state behind the client's back, as another client would.
    pub(crate) fn remove_directly(&self, name: &str, email: &str) {
        if let Some(a) = self.state.activities.lock().unwrap().get_mut(name) {
            a.participants.retain(|p| p != email);
        }
    }
}

async fn list_handler(State(state): State<FakeState>) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    if state.list_broken.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }
    let activities = state.activities.lock().unwrap().clone();
    Json(activities).into_response()
}

async fn signup_handler(
    State(state): State<FakeState>,
    Path(name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Response {
    state.mutation_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(reply) = state.signup_reply.lock().unwrap().clone() {
        return reply.into_response();
    }
    let mut activities = state.activities.lock().unwrap();
    let Some(activity) = activities.get_mut(&name) else {
        return rejection(StatusCode::NOT_FOUND, "Activity not found");
    };
    if activity.participants.contains(&query.email) {
        return rejection(
            StatusCode::BAD_REQUEST,
            "Student already signed up for this activity",
        );
    }
    if activity.participants.len() >= activity.max_participants as usize {
        return rejection(StatusCode::BAD_REQUEST, "This activity is full");
    }
    activity.participants.push(query.email.clone());
    Json(json!({ "message": format!("Signed up {} for {}", query.email, name) })).into_response()
}

async fn unregister_handler(
    State(state): State<FakeState>,
    Path(name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Response {
    state.mutation_calls.fetch_add(1, Ordering::SeqCst);
    let mut activities = state.activities.lock().unwrap();
    let Some(activity) = activities.get_mut(&name) else {
        return rejection(StatusCode::NOT_FOUND, "Activity not found");
    };
    let Some(pos) = activity.participants.iter().position(|p| *p == query.email) else {
        return rejection(StatusCode::NOT_FOUND, "Student not found in activity");
    };
    activity.participants.remove(pos);
    Json(json!({ "message": format!("Removed {} from {}", query.email, name) })).into_response()
}
