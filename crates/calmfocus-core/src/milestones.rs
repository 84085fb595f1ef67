//! Milestone progress calculation.
//!
//! Pure functions over an ordered milestone list and the set of already
//! unlocked milestone ids. Persistence of unlocks lives in the session
//! service; keeping the calculator free of IO makes the edge cases
//! (shared thresholds, fully-unlocked users) directly testable.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An achievement definition. Ordered by `session_threshold` ascending;
/// inactive milestones are never considered for progress or unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub session_threshold: u64,
    pub badge_icon: Option<String>,
    pub badge_color: Option<String>,
    pub is_active: bool,
}

/// A milestone unlocked by a user, joined with its definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub unlocked_at: DateTime<Utc>,
    pub milestone: Milestone,
}

/// Progress toward the next locked milestone.
///
/// `milestone` is `None` when every active milestone is unlocked; the
/// percentage is then 100 with nothing left to go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub milestone: Option<Milestone>,
    /// Sessions completed past the previous rung's threshold.
    pub progress: u64,
    pub progress_percentage: f64,
    pub total_sessions: u64,
    pub sessions_to_go: u64,
}

/// Compute progress toward the first milestone not yet unlocked.
///
/// `active` must be the active milestones sorted by threshold ascending.
/// Progress is measured from the previous rung in the sorted list
/// (threshold strictly below the next one, regardless of its unlock
/// status) so the bar restarts at each rung.
pub fn next_milestone(
    session_count: u64,
    active: &[Milestone],
    unlocked: &HashSet<i64>,
) -> MilestoneProgress {
    let next = match active.iter().find(|m| !unlocked.contains(&m.id)) {
        Some(m) => m.clone(),
        None => {
            return MilestoneProgress {
                milestone: None,
                progress: 0,
                progress_percentage: 100.0,
                total_sessions: session_count,
                sessions_to_go: 0,
            }
        }
    };

    let start = active
        .iter()
        .filter(|m| m.session_threshold < next.session_threshold)
        .map(|m| m.session_threshold)
        .max()
        .unwrap_or(0);

    let range = next.session_threshold - start;
    let sessions_to_go = next.session_threshold.saturating_sub(session_count);

    // Two milestones sharing a threshold leave a zero-width range; the
    // second one counts as fully progressed.
    if range == 0 {
        return MilestoneProgress {
            milestone: Some(next),
            progress: 0,
            progress_percentage: 100.0,
            total_sessions: session_count,
            sessions_to_go,
        };
    }

    let progress = session_count.saturating_sub(start).min(range);
    let progress_percentage = (progress as f64 / range as f64 * 100.0).clamp(0.0, 100.0);

    MilestoneProgress {
        milestone: Some(next),
        progress,
        progress_percentage,
        total_sessions: session_count,
        sessions_to_go,
    }
}

/// Milestones whose threshold is now met but which the user has not
/// unlocked yet. The session service persists one achievement per entry.
pub fn newly_qualified(
    session_count: u64,
    active: &[Milestone],
    unlocked: &HashSet<i64>,
) -> Vec<Milestone> {
    active
        .iter()
        .filter(|m| m.session_threshold <= session_count && !unlocked.contains(&m.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(id: i64, threshold: u64) -> Milestone {
        Milestone {
            id,
            title: format!("Milestone {id}"),
            description: None,
            session_threshold: threshold,
            badge_icon: None,
            badge_color: None,
            is_active: true,
        }
    }

    fn ladder() -> Vec<Milestone> {
        vec![milestone(1, 5), milestone(2, 10), milestone(3, 20)]
    }

    #[test]
    fn fresh_user_targets_the_first_rung() {
        let progress = next_milestone(0, &ladder(), &HashSet::new());
        let next = progress.milestone.unwrap();
        assert_eq!(next.session_threshold, 5);
        assert_eq!(progress.progress, 0);
        assert_eq!(progress.progress_percentage, 0.0);
        assert_eq!(progress.sessions_to_go, 5);
    }

    #[test]
    fn progress_is_measured_from_the_previous_rung() {
        let unlocked = HashSet::from([1]);
        let progress = next_milestone(7, &ladder(), &unlocked);
        let next = progress.milestone.unwrap();
        assert_eq!(next.session_threshold, 10);
        assert_eq!(progress.progress, 2);
        assert_eq!(progress.progress_percentage, 40.0);
        assert_eq!(progress.sessions_to_go, 3);
    }

    #[test]
    fn all_unlocked_is_terminal() {
        let unlocked = HashSet::from([1, 2, 3]);
        let progress = next_milestone(50, &ladder(), &unlocked);
        assert!(progress.milestone.is_none());
        assert_eq!(progress.progress_percentage, 100.0);
        assert_eq!(progress.sessions_to_go, 0);
        assert_eq!(progress.total_sessions, 50);
    }

    #[test]
    fn previous_rung_counts_even_when_not_unlocked() {
        // Rung 1 skipped (never unlocked) but rung 2 unlocked: next is
        // rung 1, measured from zero.
        let unlocked = HashSet::from([2]);
        let progress = next_milestone(12, &ladder(), &unlocked);
        let next = progress.milestone.unwrap();
        assert_eq!(next.id, 1);
        assert_eq!(progress.progress, 5); // clamped to the range
        assert_eq!(progress.progress_percentage, 100.0);
        assert_eq!(progress.sessions_to_go, 0);
    }

    #[test]
    fn shared_threshold_reports_full_progress() {
        let milestones = vec![milestone(1, 5), milestone(2, 5)];
        let unlocked = HashSet::from([1]);
        let progress = next_milestone(3, &milestones, &unlocked);
        assert_eq!(progress.milestone.unwrap().id, 2);
        assert_eq!(progress.progress_percentage, 100.0);
        assert_eq!(progress.sessions_to_go, 2);
    }

    #[test]
    fn percentage_clamps_below_the_next_rung() {
        let progress = next_milestone(3, &ladder(), &HashSet::new());
        assert_eq!(progress.progress_percentage, 60.0);
        assert_eq!(progress.sessions_to_go, 2);
    }

    #[test]
    fn newly_qualified_excludes_unreached_thresholds() {
        let unlocked = newly_qualified(12, &ladder(), &HashSet::new());
        let thresholds: Vec<u64> = unlocked.iter().map(|m| m.session_threshold).collect();
        assert_eq!(thresholds, vec![5, 10]);
    }

    #[test]
    fn newly_qualified_is_empty_once_reflected() {
        let first = newly_qualified(12, &ladder(), &HashSet::new());
        let now_unlocked: HashSet<i64> = first.iter().map(|m| m.id).collect();
        let second = newly_qualified(12, &ladder(), &now_unlocked);
        assert!(second.is_empty());
    }
}
