use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

use crate::client::{ActivitiesClient, ApiError};
use crate::directory::{DirectoryView, ViewAction};
use crate::feedback::{FeedbackChannel, FeedbackKind};

pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_FAILED: &str = "Failed to unregister. Please try again.";
pub const REJECTED_FALLBACK: &str = "An error occurred";

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub fn unregister_prompt(activity: &str, email: &str) -> String {
    format!("Are you sure you want to unregister {email} from {activity}?")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: String,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub directory: DirectoryView,
    pub feedback: FeedbackChannel,
    pub form: SignupForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Declined,
    Succeeded,
    Rejected,
    Failed,
}

/// Owns the view state and runs the load/signup/unregister cycle against
/// the activities service. The state lock is never held across a request,
/// so overlapping actions interleave and the last reload to finish wins.
#[derive(Clone)]
pub struct Frontend {
    client: ActivitiesClient,
    state: Arc<Mutex<ViewState>>,
}

impl Frontend {
    pub fn new(client: ActivitiesClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(ViewState::default())),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the directory and replace the rendered list and options.
    pub async fn load_activities(&self) {
        match self.client.list_activities().await {
            Ok(activities) => {
                info!("Loaded {} activities", activities.len());
                self.state().directory.replace(&activities);
            }
            Err(e) => {
                error!("Error fetching activities: {:#}", e);
                self.state().directory.fail();
            }
        }
    }

    pub async fn submit_signup(&self, email: &str, activity: &str) -> Outcome {
        self.state().form = SignupForm {
            email: email.to_string(),
            activity: activity.to_string(),
        };

        match self.client.signup(activity, email).await {
            Ok(message) => {
                info!("Signed up {} for {}", email, activity);
                {
                    let mut state = self.state();
                    state.feedback.show(message, FeedbackKind::Success);
                    state.form = SignupForm::default();
                }
                self.load_activities().await;
                Outcome::Succeeded
            }
            Err(e) => self.report_failure(e, SIGNUP_FAILED),
        }
    }

    pub async fn submit_unregister(
        &self,
        activity: &str,
        email: &str,
        confirm: impl Confirm,
    ) -> Outcome {
        if !confirm.confirm(&unregister_prompt(activity, email)) {
            info!("Unregister of {} from {} cancelled", email, activity);
            return Outcome::Declined;
        }

        match self.client.unregister(activity, email).await {
            Ok(message) => {
                info!("Unregistered {} from {}", email, activity);
                self.state().feedback.show(message, FeedbackKind::Success);
                self.load_activities().await;
                Outcome::Succeeded
            }
            Err(e) => self.report_failure(e, UNREGISTER_FAILED),
        }
    }

    /// Route an action posted back from the rendered list to its controller.
    pub async fn dispatch(&self, action: ViewAction, confirm: impl Confirm) -> Outcome {
        match action {
            ViewAction::Unregister { activity, email } => {
                self.submit_unregister(&activity, &email, confirm).await
            }
        }
    }

    fn report_failure(&self, err: ApiError, generic: &str) -> Outcome {
        match err {
            ApiError::Rejected { status, detail } => {
                warn!(
                    "Request rejected ({}): {}",
                    status,
                    detail.as_deref().unwrap_or("no detail")
                );
                let text = detail.unwrap_or_else(|| REJECTED_FALLBACK.to_string());
                self.state().feedback.show(text, FeedbackKind::Error);
                Outcome::Rejected
            }
            ApiError::Transport(e) => {
                error!("{}: {:#}", generic, e);
                self.state().feedback.show(generic, FeedbackKind::Error);
                Outcome::Failed
            }
        }
    }
}
