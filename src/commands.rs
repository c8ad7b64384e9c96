use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use tracing::info;

use crate::client::ActivitiesClient;
use crate::controller::{Frontend, Outcome};
use crate::directory::{ListView, ParticipantRows, NO_PARTICIPANTS};
use crate::feedback::FeedbackKind;
use crate::models::Config;

fn frontend(config: &Config) -> Result<Frontend> {
    let client = ActivitiesClient::new(&config.api.base_url)?;
    info!("Using activities service at {}", client.base_url());
    Ok(Frontend::new(client))
}

/// Plain-text rendering of the directory for the terminal.
pub fn format_list(list: &ListView) -> String {
    let mut out = String::new();
    match list {
        ListView::Loading => out.push_str("Loading activities...\n"),
        ListView::Failed(msg) => {
            out.push_str(msg);
            out.push('\n');
        }
        ListView::Activities(cards) => {
            for card in cards {
                out.push_str(&format!("{}\n", card.name));
                out.push_str(&format!("  {}\n", card.description));
                out.push_str(&format!("  Schedule: {}\n", card.schedule));
                out.push_str(&format!("  Availability: {} spots left\n", card.spots_left));
                match &card.participants {
                    ParticipantRows::Placeholder => {
                        out.push_str(&format!("  - {NO_PARTICIPANTS}\n"));
                    }
                    ParticipantRows::Listed(rows) => {
                        for row in rows {
                            out.push_str(&format!("  - {}\n", row.email));
                        }
                    }
                }
            }
        }
    }
    out
}

fn print_feedback(frontend: &Frontend) {
    if let Some(f) = frontend.state().feedback.visible() {
        match f.kind {
            FeedbackKind::Success => println!("{}", f.text),
            FeedbackKind::Error => eprintln!("Error: {}", f.text),
        }
    }
}

fn finish(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Succeeded | Outcome::Declined => Ok(()),
        Outcome::Rejected => bail!("Request was rejected by the server"),
        Outcome::Failed => bail!("Request could not be completed"),
    }
}

fn stdin_confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

pub async fn run_list(config: &Config) -> Result<()> {
    let frontend = frontend(config)?;
    frontend.load_activities().await;
    let state = frontend.state();
    print!("{}", format_list(&state.directory.list));
    if matches!(state.directory.list, ListView::Failed(_)) {
        bail!("Could not load activities");
    }
    Ok(())
}

pub async fn run_signup(config: &Config, activity: &str, email: &str) -> Result<()> {
    let frontend = frontend(config)?;
    let outcome = frontend.submit_signup(email, activity).await;
    print_feedback(&frontend);
    if outcome == Outcome::Succeeded {
        print!("{}", format_list(&frontend.state().directory.list));
    }
    finish(outcome)
}

pub async fn run_unregister(config: &Config, activity: &str, email: &str, yes: bool) -> Result<()> {
    let frontend = frontend(config)?;
    let outcome = frontend
        .submit_unregister(activity, email, |prompt: &str| yes || stdin_confirm(prompt))
        .await;
    match outcome {
        Outcome::Declined => println!("Cancelled."),
        Outcome::Succeeded => {
            print_feedback(&frontend);
            print!("{}", format_list(&frontend.state().directory.list));
        }
        _ => print_feedback(&frontend),
    }
    finish(outcome)
}
