use std::time::Instant;

use leptos::prelude::*;

use crate::controller::{SignupForm, ViewState};
use crate::directory::{
    ActivityCard, ListView, ParticipantRow, ParticipantRows, SelectOption, ViewAction,
    NO_PARTICIPANTS,
};
use crate::feedback::Feedback;

const STYLE: &str = include_str!("../style.css");

pub(super) fn render_page(state: &ViewState, now: Instant) -> String {
    let list_html = render_list(&state.directory.list);
    let form_html = render_signup_form(&state.directory.options, &state.form);
    let message_html = render_message(state.feedback.visible_at(now));
    let updated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>"Extracurricular Activities"</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <header>
                    <h1>"Extracurricular Activities"</h1>
                    <p class="timestamp">"Updated: " {updated}</p>
                </header>
                <main>
                    <section id="activities-container">
                        <h3>"Available Activities"</h3>
                        <div id="activities-list" inner_html=list_html />
                        <form method="post" action="/refresh">
                            <button type="submit" class="secondary">"Refresh"</button>
                        </form>
                    </section>
                    <section id="signup-container">
                        <h3>"Sign Up for an Activity"</h3>
                        <div inner_html=form_html />
                        <div inner_html=message_html />
                    </section>
                </main>
            </body>
        </html>
    }
    .to_html()
}

fn render_list(list: &ListView) -> String {
    match list {
        ListView::Loading => view! { <p class="empty">"Loading activities..."</p> }.to_html(),
        ListView::Failed(msg) => {
            let msg = msg.clone();
            view! { <p class="error">{msg}</p> }.to_html()
        }
        ListView::Activities(cards) if cards.is_empty() => {
            view! { <p class="empty">"No activities available."</p> }.to_html()
        }
        ListView::Activities(cards) => cards.iter().map(render_card).collect(),
    }
}

fn render_card(card: &ActivityCard) -> String {
    let name = card.name.clone();
    let description = card.description.clone();
    let schedule = card.schedule.clone();
    let spots = format!("{} spots left", card.spots_left);
    let participants_html = render_participants(&card.participants);

    view! {
        <div class="activity-card">
            <h4>{name}</h4>
            <p>{description}</p>
            <p><strong>"Schedule: "</strong>{schedule}</p>
            <p><strong>"Availability: "</strong>{spots}</p>
            <div class="participants-section">
                <h5>"Participants"</h5>
                <ul class="participants-list" inner_html=participants_html />
            </div>
        </div>
    }
    .to_html()
}

fn render_participants(rows: &ParticipantRows) -> String {
    match rows {
        ParticipantRows::Placeholder => {
            view! { <li class="no-participants">{NO_PARTICIPANTS}</li> }.to_html()
        }
        ParticipantRows::Listed(rows) => rows.iter().map(render_participant).collect(),
    }
}

fn render_participant(row: &ParticipantRow) -> String {
    let email = row.email.clone();
    let action_html = render_action(&row.remove);

    view! {
        <li class="participant-item">
            <span class="participant-email">{email}</span>
            <span inner_html=action_html />
        </li>
    }
    .to_html()
}

/// Every list control posts to the same endpoint; the action data travels
/// as hidden fields bound at render time.
fn render_action(action: &ViewAction) -> String {
    let kind = action.kind();
    match action {
        ViewAction::Unregister { activity, email } => {
            let activity = activity.clone();
            let email = email.clone();
            view! {
                <form method="post" action="/actions" class="inline">
                    <input type="hidden" name="action" value=kind />
                    <input type="hidden" name="activity" value=activity />
                    <input type="hidden" name="email" value=email />
                    <button type="submit" class="delete-btn" title="Unregister">"✖"</button>
                </form>
            }
            .to_html()
        }
    }
}

fn render_signup_form(options: &[SelectOption], form: &SignupForm) -> String {
    let email = form.email.clone();
    let options_html: String = options
        .iter()
        .map(|o| {
            let value = o.value.clone();
            let label = o.label.clone();
            let selected = !o.value.is_empty() && o.value == form.activity;
            view! { <option value=value selected=selected>{label}</option> }.to_html()
        })
        .collect();

    view! {
        <form id="signup-form" method="post" action="/signup">
            <div class="form-group">
                <label>
                    "Student Email:"
                    <input
                        type="email"
                        id="email"
                        name="email"
                        required=true
                        placeholder="your-email@mergington.edu"
                        value=email
                    />
                </label>
            </div>
            <div class="form-group">
                <label>
                    "Select Activity:"
                    <select id="activity" name="activity" required=true inner_html=options_html />
                </label>
            </div>
            <button type="submit">"Sign Up"</button>
        </form>
    }
    .to_html()
}

fn render_message(feedback: Option<&Feedback>) -> String {
    match feedback {
        Some(f) => {
            let class = format!("message {}", f.kind.css_class());
            let text = f.text.clone();
            view! { <div id="message" class=class>{text}</div> }.to_html()
        }
        None => view! { <div id="message" class="message hidden"></div> }.to_html(),
    }
}

pub(super) fn render_confirm_page(prompt: &str, action: &ViewAction) -> String {
    let prompt = prompt.to_string();
    let kind = action.kind();
    let (activity, email) = match action {
        ViewAction::Unregister { activity, email } => (activity.clone(), email.clone()),
    };

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>"Confirm"</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <section class="confirm">
                    <p>{prompt}</p>
                    <form method="post" action="/actions">
                        <input type="hidden" name="action" value=kind />
                        <input type="hidden" name="activity" value=activity />
                        <input type="hidden" name="email" value=email />
                        <input type="hidden" name="confirmed" value="true" />
                        <button type="submit">"OK"</button>
                        <a href="/" class="cancel">"Cancel"</a>
                    </form>
                </section>
            </body>
        </html>
    }
    .to_html()
}
