use chrono::{DateTime, NaiveDateTime, Utc};
use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Schedule a reminder
    Add {
        title: String,
        /// When to remind: RFC3339 or "YYYY-MM-DDTHH:MM" (UTC)
        #[arg(long)]
        at: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// List all reminders, soonest first
    List,
    /// Reminders that have come due within the last 24 hours
    Due,
    /// Delete a reminder
    Remove {
        id: i64,
    },
}

fn parse_remind_at(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    Err(format!("invalid time '{raw}', expected RFC3339 or YYYY-MM-DDTHH:MM").into())
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::load()?;

    match action {
        ReminderAction::Add { title, at, message } => {
            let remind_at = parse_remind_at(&at)?;
            let id =
                ctx.db
                    .insert_reminder(&ctx.user_id, &title, message.as_deref(), remind_at)?;
            eprintln!("Reminder created: {id}");
        }
        ReminderAction::List => {
            let reminders = ctx.db.list_reminders(&ctx.user_id)?;
            println!("{}", serde_json::to_string_pretty(&reminders)?);
        }
        ReminderAction::Due => {
            let due = ctx.db.list_due_reminders(&ctx.user_id, Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        ReminderAction::Remove { id } => {
            if !ctx.db.delete_reminder(id)? {
                return Err(format!("no reminder with id {id}").into());
            }
            eprintln!("Reminder removed: {id}");
        }
    }
    Ok(())
}
