use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum MilestoneAction {
    /// List milestones (active only unless --all)
    List {
        /// Include inactive milestones
        #[arg(long)]
        all: bool,
    },
    /// Add a milestone definition
    Add {
        title: String,
        /// Completed focus sessions required to unlock
        #[arg(long)]
        threshold: u64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Create the milestone without activating it
        #[arg(long)]
        inactive: bool,
    },
    /// Update fields of an existing milestone
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        threshold: Option<u64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a milestone (unlocked achievements for it are removed too)
    Remove {
        id: i64,
    },
    /// Progress toward the next locked milestone
    Progress,
}

pub fn run(action: MilestoneAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = common::load()?;

    match action {
        MilestoneAction::List { all } => {
            let milestones = if all {
                ctx.db.list_milestones()?
            } else {
                ctx.db.list_active_milestones()?
            };
            println!("{}", serde_json::to_string_pretty(&milestones)?);
        }
        MilestoneAction::Add {
            title,
            threshold,
            description,
            icon,
            color,
            inactive,
        } => {
            let id = ctx.db.insert_milestone(
                &title,
                description.as_deref(),
                threshold,
                icon.as_deref(),
                color.as_deref(),
                !inactive,
            )?;
            eprintln!("Milestone created: {id}");
        }
        MilestoneAction::Update {
            id,
            title,
            threshold,
            description,
            icon,
            color,
            active,
        } => {
            let Some(mut milestone) = ctx.db.get_milestone(id)? else {
                return Err(format!("no milestone with id {id}").into());
            };
            if let Some(title) = title {
                milestone.title = title;
            }
            if let Some(threshold) = threshold {
                milestone.session_threshold = threshold;
            }
            if let Some(description) = description {
                milestone.description = Some(description);
            }
            if let Some(icon) = icon {
                milestone.badge_icon = Some(icon);
            }
            if let Some(color) = color {
                milestone.badge_color = Some(color);
            }
            if let Some(active) = active {
                milestone.is_active = active;
            }
            ctx.db.update_milestone(&milestone)?;
            println!("{}", serde_json::to_string_pretty(&milestone)?);
        }
        MilestoneAction::Remove { id } => {
            if !ctx.db.delete_milestone(id)? {
                return Err(format!("no milestone with id {id}").into());
            }
            eprintln!("Milestone removed: {id}");
        }
        MilestoneAction::Progress => {
            let progress = ctx.service().progress()?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
    }
    Ok(())
}
