use calmfocus_core::{Event, FocusTimer, TimerMode};
use chrono::Utc;
use clap::Subcommand;

use crate::common::{self, AppContext};

const TIMER_KEY: &str = "focus_timer";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown (no-op if already running)
    Start,
    /// Pause the countdown (no-op if not running)
    Pause,
    /// Flip between running and paused
    Toggle,
    /// Put the interval back to its full duration
    Reset,
    /// Set an explicit interval length in seconds
    Duration {
        seconds: u64,
    },
    /// Switch between focus and break
    Mode {
        /// "focus" or "break"
        mode: String,
    },
    /// Print current timer state as JSON
    Status,
    /// Drive the timer with a one-second tick loop; records the session
    /// and reports milestone unlocks when a focus interval completes
    Run {
        /// Stop after this many ticks (default: run to completion)
        #[arg(long)]
        ticks: Option<u64>,
    },
}

pub(crate) fn load_timer(ctx: &AppContext) -> Result<FocusTimer, Box<dyn std::error::Error>> {
    if let Some(json) = ctx.db.kv_get(TIMER_KEY)? {
        if let Ok(timer) = serde_json::from_str::<FocusTimer>(&json) {
            return Ok(timer);
        }
    }
    Ok(FocusTimer::with_preferences(ctx.timer_preferences()?))
}

pub(crate) fn save_timer(
    ctx: &AppContext,
    timer: &FocusTimer,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(timer)?;
    ctx.db.kv_set(TIMER_KEY, &json)?;
    Ok(())
}

fn parse_mode(mode: &str) -> Result<TimerMode, Box<dyn std::error::Error>> {
    match mode {
        "focus" => Ok(TimerMode::Focus),
        "break" => Ok(TimerMode::Break),
        other => Err(format!("unknown mode '{other}', expected focus or break").into()),
    }
}

fn print_status(timer: &FocusTimer) -> Result<(), Box<dyn std::error::Error>> {
    let status = serde_json::json!({
        "state": timer.state(),
        "mode": timer.mode(),
        "time_left_secs": timer.time_left_secs(),
        "duration_secs": timer.duration_secs(),
        "is_running": timer.is_running(),
        "progress": timer.progress(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::load()?;
    let mut timer = load_timer(&ctx)?;

    match action {
        TimerAction::Start => {
            if !timer.is_running() {
                let event = timer.toggle();
                print_event(&event)?;
            } else {
                print_status(&timer)?;
            }
        }
        TimerAction::Pause => {
            if timer.is_running() {
                let event = timer.toggle();
                print_event(&event)?;
            } else {
                print_status(&timer)?;
            }
        }
        TimerAction::Toggle => {
            let event = timer.toggle();
            print_event(&event)?;
        }
        TimerAction::Reset => {
            let event = timer.reset();
            print_event(&event)?;
        }
        TimerAction::Duration { seconds } => {
            timer.set_duration(seconds)?;
            print_status(&timer)?;
        }
        TimerAction::Mode { mode } => {
            let event = timer.set_mode(parse_mode(&mode)?);
            print_event(&event)?;
        }
        TimerAction::Status => {
            print_status(&timer)?;
        }
        TimerAction::Run { ticks } => {
            run_loop(&ctx, &mut timer, ticks)?;
        }
    }

    save_timer(&ctx, &timer)?;
    Ok(())
}

/// The periodic tick driver. Owns the one-second interval so the timer
/// itself stays free of wall-clock concerns.
fn run_loop(
    ctx: &AppContext,
    timer: &mut FocusTimer,
    ticks: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = ctx.service();
    if !timer.is_running() {
        let event = timer.toggle();
        print_event(&event)?;
    }

    let mut remaining = ticks;
    loop {
        if let Some(n) = remaining.as_mut() {
            if *n == 0 {
                break;
            }
            *n -= 1;
        }
        std::thread::sleep(std::time::Duration::from_secs(1));

        let Some(event) = timer.tick() else { continue };
        print_event(&event)?;
        let Event::IntervalCompleted {
            mode,
            duration_secs,
            at,
        } = event
        else {
            continue;
        };

        let outcome = service.save_session(duration_secs, mode, at)?;
        for milestone in &outcome.new_milestones {
            let unlocked = Event::MilestoneUnlocked {
                milestone_id: milestone.id,
                title: milestone.title.clone(),
                at: Utc::now(),
            };
            print_event(&unlocked)?;
        }

        if mode == TimerMode::Focus && ctx.config.auto_start_break {
            let event = timer.set_mode(TimerMode::Break);
            print_event(&event)?;
            timer.toggle();
        } else {
            break;
        }
    }
    Ok(())
}
