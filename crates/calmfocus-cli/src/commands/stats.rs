use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions and focus minutes, against the daily goal
    Today,
    /// All-time totals
    All,
    /// Most recent sessions
    Recent {
        #[arg(long, default_value = "10")]
        limit: u64,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::load()?;
    let settings = ctx.db.get_settings(&ctx.user_id)?.unwrap_or_default();

    match action {
        StatsAction::Today => {
            let today = ctx.db.stats_today(&ctx.user_id)?;
            let report = serde_json::json!({
                "today_sessions": today.sessions,
                "today_focus_min": today.focus_min,
                "daily_goal": settings.daily_goal,
                "sessions_to_goal": settings.daily_goal.saturating_sub(today.sessions),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatsAction::All => {
            let stats = ctx.db.stats_all(&ctx.user_id)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Recent { limit } => {
            let sessions = ctx.db.list_recent_sessions(&ctx.user_id, limit)?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}
