use std::collections::HashMap;

use crate::models::ActivityCollection;

pub const NO_PARTICIPANTS: &str = "No participants yet";
pub const LOAD_FAILED: &str = "Failed to load activities. Please try again later.";
pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";

/// A user action carried by a rendered control. The data is bound when the
/// list is rendered, so it can be stale by the time it comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Unregister { activity: String, email: String },
}

impl ViewAction {
    pub fn kind(&self) -> &'static str {
        match self {
            ViewAction::Unregister { .. } => "unregister",
        }
    }

    /// Rebuild an action from the fields a rendered control posts back.
    pub fn from_form(fields: &HashMap<String, String>) -> Option<Self> {
        let field = |k: &str| fields.get(k).cloned();
        match fields.get("action").map(String::as_str)? {
            "unregister" => Some(ViewAction::Unregister {
                activity: field("activity")?,
                email: field("email")?,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub email: String,
    pub remove: ViewAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantRows {
    Placeholder,
    Listed(Vec<ParticipantRow>),
}

impl ParticipantRows {
    #[cfg(test)]
    pub fn removal_actions(&self) -> usize {
        match self {
            ParticipantRows::Placeholder => 0,
            ParticipantRows::Listed(rows) => rows.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: ParticipantRows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Activities(Vec<ActivityCard>),
    Failed(String),
}

impl ListView {
    #[cfg(test)]
    pub fn card(&self, name: &str) -> Option<&ActivityCard> {
        match self {
            ListView::Activities(cards) => cards.iter().find(|c| c.name == name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Rendered list plus the activity selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    pub list: ListView,
    pub options: Vec<SelectOption>,
}

impl Default for DirectoryView {
    fn default() -> Self {
        Self {
            list: ListView::Loading,
            options: vec![placeholder_option()],
        }
    }
}

impl DirectoryView {
    /// Replace everything with a rendering of `collection`.
    pub fn replace(&mut self, collection: &ActivityCollection) {
        self.list = render_list(collection);
        self.options = render_options(collection);
    }

    /// Replace the list with the load failure message. The selection control
    /// keeps whatever the last successful load put there.
    pub fn fail(&mut self) {
        self.list = ListView::Failed(LOAD_FAILED.to_string());
    }
}

fn placeholder_option() -> SelectOption {
    SelectOption {
        value: String::new(),
        label: SELECT_PLACEHOLDER.to_string(),
    }
}

pub fn render_list(collection: &ActivityCollection) -> ListView {
    let cards = collection
        .iter()
        .map(|(name, activity)| {
            let participants = if activity.participants.is_empty() {
                ParticipantRows::Placeholder
            } else {
                ParticipantRows::Listed(
                    activity
                        .participants
                        .iter()
                        .map(|email| ParticipantRow {
                            email: email.clone(),
                            remove: ViewAction::Unregister {
                                activity: name.to_string(),
                                email: email.clone(),
                            },
                        })
                        .collect(),
                )
            };
            ActivityCard {
                name: name.to_string(),
                description: activity.description.clone(),
                schedule: activity.schedule.clone(),
                spots_left: activity.spots_left(),
                participants,
            }
        })
        .collect();
    ListView::Activities(cards)
}

pub fn render_options(collection: &ActivityCollection) -> Vec<SelectOption> {
    std::iter::once(placeholder_option())
        .chain(collection.names().map(|name| SelectOption {
            value: name.to_string(),
            label: name.to_string(),
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;

    fn collection() -> ActivityCollection {
        ActivityCollection::new(vec![
            (
                "Chess Club".into(),
                Activity {
                    description: "Chess".into(),
                    schedule: "Fridays".into(),
                    max_participants: 12,
                    participants: vec!["michael@x.com".into(), "daniel@x.com".into()],
                },
            ),
            (
                "Science Club".into(),
                Activity {
                    description: "Experiments".into(),
                    schedule: "Fridays".into(),
                    max_participants: 18,
                    participants: vec![],
                },
            ),
        ])
    }

    #[test]
    fn test_rows_and_spots_match_roster() {
        let list = render_list(&collection());
        let chess = list.card("Chess Club").unwrap();
        assert_eq!(chess.spots_left, 10);
        match &chess.participants {
            ParticipantRows::Listed(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].email, "michael@x.com");
                assert_eq!(
                    rows[1].remove,
                    ViewAction::Unregister {
                        activity: "Chess Club".into(),
                        email: "daniel@x.com".into()
                    }
                );
            }
            other => panic!("expected listed rows, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_roster_renders_one_placeholder() {
        let list = render_list(&collection());
        let science = list.card("Science Club").unwrap();
        assert_eq!(science.participants, ParticipantRows::Placeholder);
        assert_eq!(science.participants.removal_actions(), 0);
        assert_eq!(science.spots_left, 18);
    }

    #[test]
    fn test_options_keep_leading_placeholder_and_order() {
        let options = render_options(&collection());
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["", "Chess Club", "Science Club"]);
        assert_eq!(options[0].label, SELECT_PLACEHOLDER);
    }

    #[test]
    fn test_render_is_idempotent() {
        let c = collection();
        assert_eq!(render_list(&c), render_list(&c));
    }

    #[test]
    fn test_failure_keeps_previous_options() {
        let mut view = DirectoryView::default();
        view.replace(&collection());
        let before = view.options.clone();
        view.fail();
        assert_eq!(view.list, ListView::Failed(LOAD_FAILED.to_string()));
        assert_eq!(view.options, before);
    }

    #[test]
    fn test_replace_drops_prior_rendering() {
        let mut view = DirectoryView::default();
        view.replace(&collection());
        view.replace(&ActivityCollection::default());
        assert_eq!(view.list, ListView::Activities(vec![]));
        assert_eq!(view.options.len(), 1);
    }

    #[test]
    fn test_action_from_form() {
        let mut fields = HashMap::new();
        fields.insert("action".to_string(), "unregister".to_string());
        fields.insert("activity".to_string(), "Chess Club".to_string());
        fields.insert("email".to_string(), "a@x.com".to_string());
        let action = ViewAction::from_form(&fields).unwrap();
        assert_eq!(action.kind(), "unregister");

        fields.remove("email");
        assert_eq!(ViewAction::from_form(&fields), None);

        fields.insert("action".to_string(), "promote".to_string());
        assert_eq!(ViewAction::from_form(&fields), None);
    }
}
