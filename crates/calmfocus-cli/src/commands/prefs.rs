use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the current preferences
    Show,
    /// Update preferences (only the given fields change)
    Set {
        /// Default focus duration in minutes (5-60)
        #[arg(long)]
        focus: Option<u64>,
        /// Default break duration in minutes (1-30)
        #[arg(long = "break")]
        break_minutes: Option<u64>,
        /// Daily goal in sessions (1-20)
        #[arg(long)]
        goal: Option<u64>,
    },
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::load()?;

    match action {
        PrefsAction::Show => {
            let settings = ctx.db.get_settings(&ctx.user_id)?.unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        PrefsAction::Set {
            focus,
            break_minutes,
            goal,
        } => {
            let mut settings = ctx.db.get_settings(&ctx.user_id)?.unwrap_or_default();
            if let Some(focus) = focus {
                settings.focus_minutes = focus;
            }
            if let Some(break_minutes) = break_minutes {
                settings.break_minutes = break_minutes;
            }
            if let Some(goal) = goal {
                settings.daily_goal = goal;
            }
            settings.validate()?;
            ctx.db.set_settings(&ctx.user_id, &settings)?;

            // New durations apply to the stored timer immediately; any
            // partial interval is discarded.
            let mut timer = crate::commands::timer::load_timer(&ctx)?;
            timer.set_preferences(settings.timer_preferences())?;
            crate::commands::timer::save_timer(&ctx, &timer)?;

            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
