use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use cookie::{Cookie, SameSite};
use tracing::debug;
use uuid::Uuid;

use crate::client::ActivitiesClient;
use crate::controller::Frontend;

pub(crate) const SESSION_COOKIE: &str = "signup_session";

/// One `Frontend` per browser, keyed by the session cookie. Every browser
/// gets its own rendered list, form and feedback slot.
#[derive(Clone)]
pub(crate) struct Sessions {
    client: ActivitiesClient,
    frontends: Arc<Mutex<HashMap<String, Frontend>>>,
}

pub(crate) struct Session {
    pub(crate) frontend: Frontend,
    id: String,
    fresh: bool,
}

impl Session {
    /// Attach the session cookie when this request started the session.
    pub(crate) fn respond(&self, resp: impl IntoResponse) -> Response {
        let mut resp = resp.into_response();
        if self.fresh {
            let mut cookie = Cookie::new(SESSION_COOKIE, self.id.clone());
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookie.set_same_site(SameSite::Lax);
            if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                resp.headers_mut().insert(SET_COOKIE, value);
            }
        }
        resp
    }
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|c| c.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        })
}

impl Sessions {
    pub(crate) fn new(client: ActivitiesClient) -> Self {
        Self {
            client,
            frontends: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lookup(&self, id: &str) -> Option<Frontend> {
        self.frontends
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Find the caller's session, or start one. A new session runs the
    /// initial directory load, as opening the page would.
    pub(crate) async fn resolve(&self, headers: &HeaderMap) -> Session {
        if let Some(id) = session_id(headers) {
            if let Some(frontend) = self.lookup(id) {
                return Session {
                    frontend,
                    id: id.to_string(),
                    fresh: false,
                };
            }
        }

        let id = Uuid::new_v4().to_string();
        let frontend = Frontend::new(self.client.clone());
        self.frontends
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), frontend.clone());
        debug!("Started session {}", id);

        frontend.load_activities().await;
        Session {
            frontend,
            id,
            fresh: true,
        }
    }
}
