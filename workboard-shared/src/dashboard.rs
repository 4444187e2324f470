/// Project dashboard aggregation
///
/// All dashboard figures are computed in one pass over a project's tasks by
/// [`project_dashboard`]. The function is pure: it takes the task list and a
/// reference instant, so results are reproducible in tests without a clock or
/// database.
///
/// # Example
///
/// ```no_run
/// use chrono::Utc;
/// use workboard_shared::dashboard::project_dashboard;
///
/// # fn example(tasks: Vec<workboard_shared::models::task::Task>) {
/// let dashboard = project_dashboard(&tasks, Utc::now());
/// println!("{}% complete", dashboard.completion_percent);
/// # }
/// ```

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::task::{Task, TaskStatus};

/// Number of daily points in the completion trend, today included
const TREND_DAYS: usize = 8;

/// Task counts broken down by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub not_started: u64,
}

/// Counts of open tasks due within the next hours, in disjoint windows
///
/// A task falls into exactly one bucket. `within_1h` covers (now, now+1h],
/// `within_2h` covers (now+1h, now+2h], `within_4h` covers (now+2h, now+4h].
/// Overdue and completed tasks fall into none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DueSoonBuckets {
    pub within_1h: u64,
    pub within_2h: u64,
    pub within_4h: u64,
}

/// One point of the daily completion trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Calendar date (UTC) in `YYYY-MM-DD` form
    pub date: String,

    /// Tasks completed on that date
    pub completed: u64,
}

/// Per-assignee task counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssigneeLoad {
    pub assignee: String,
    pub total: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub not_started: u64,
}

/// Aggregated dashboard for one project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDashboard {
    /// Status breakdown over all tasks
    pub counts: StatusCounts,

    /// Completed share of all tasks, 0.0 to 100.0; 0.0 for an empty project
    pub completion_percent: f64,

    /// Open tasks past their due instant
    pub overdue_count: u64,

    /// Ids of the overdue tasks, sorted
    pub overdue_tasks: Vec<String>,

    /// Open tasks coming due soon, in disjoint windows
    pub due_soon: DueSoonBuckets,

    /// Ids of open tasks due within the next 24 hours, soonest first
    pub upcoming_24h: Vec<String>,

    /// Tasks completed per day over the last week, oldest first
    pub completion_trend: Vec<TrendPoint>,

    /// Task counts per assignee, sorted by assignee id
    pub per_assignee: Vec<AssigneeLoad>,

    /// Tasks nobody has picked up yet
    pub unassigned_count: u64,
}

/// Computes the dashboard for a project's tasks at a given instant
pub fn project_dashboard(tasks: &[Task], now: DateTime<Utc>) -> ProjectDashboard {
    let mut counts = StatusCounts::default();
    let mut due_soon = DueSoonBuckets::default();
    let mut overdue_tasks = Vec::new();
    let mut upcoming: Vec<(DateTime<Utc>, String)> = Vec::new();
    let mut per_assignee: BTreeMap<&str, AssigneeLoad> = BTreeMap::new();
    let mut unassigned_count = 0u64;

    // One trend slot per day, index 0 = seven days ago, index 7 = today
    let mut trend_counts = [0u64; TREND_DAYS];
    let trend_start = now.date_naive() - Duration::days(TREND_DAYS as i64 - 1);

    for task in tasks {
        counts.total += 1;
        match task.status {
            TaskStatus::NotStarted => counts.not_started += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Completed => counts.completed += 1,
        }

        if task.is_unassigned() {
            unassigned_count += 1;
        } else {
            let load = per_assignee.entry(task.assignee.as_str()).or_default();
            load.total += 1;
            match task.status {
                TaskStatus::NotStarted => load.not_started += 1,
                TaskStatus::InProgress => load.in_progress += 1,
                TaskStatus::Completed => load.completed += 1,
            }
        }

        if task.status == TaskStatus::Completed {
            if let Some(ended_at) = task.ended_at {
                let day = (ended_at.date_naive() - trend_start).num_days();
                if (0..TREND_DAYS as i64).contains(&day) {
                    trend_counts[day as usize] += 1;
                }
            }
            continue;
        }

        // Everything below only applies to open tasks
        let until_due = task.due_at - now;

        if until_due <= Duration::zero() {
            overdue_tasks.push(task.task_id.clone());
        } else if until_due <= Duration::hours(1) {
            due_soon.within_1h += 1;
        } else if until_due <= Duration::hours(2) {
            due_soon.within_2h += 1;
        } else if until_due <= Duration::hours(4) {
            due_soon.within_4h += 1;
        }

        if until_due > Duration::zero() && until_due <= Duration::hours(24) {
            upcoming.push((task.due_at, task.task_id.clone()));
        }
    }

    overdue_tasks.sort();
    upcoming.sort();

    let completion_percent = if counts.total == 0 {
        0.0
    } else {
        counts.completed as f64 / counts.total as f64 * 100.0
    };

    let completion_trend = trend_counts
        .iter()
        .enumerate()
        .map(|(i, &completed)| TrendPoint {
            date: (trend_start + Duration::days(i as i64))
                .format("%Y-%m-%d")
                .to_string(),
            completed,
        })
        .collect();

    ProjectDashboard {
        counts,
        completion_percent,
        overdue_count: overdue_tasks.len() as u64,
        overdue_tasks,
        due_soon,
        upcoming_24h: upcoming.into_iter().map(|(_, id)| id).collect(),
        completion_trend,
        per_assignee: per_assignee
            .into_iter()
            .map(|(assignee, load)| AssigneeLoad {
                assignee: assignee.to_string(),
                ..load
            })
            .collect(),
        unassigned_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(task_id: &str, status: TaskStatus, assignee: &str, due_at: DateTime<Utc>) -> Task {
        Task {
            project_id: "AB12C".to_string(),
            task_id: task_id.to_string(),
            description: String::new(),
            assignee: assignee.to_string(),
            status,
            started_at: None,
            ended_at: None,
            time_spent_seconds: None,
            due_at,
            created_at: due_at - Duration::days(1),
            updated_at: due_at - Duration::days(1),
        }
    }

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_project() {
        let dashboard = project_dashboard(&[], reference_now());

        assert_eq!(dashboard.counts, StatusCounts::default());
        assert_eq!(dashboard.completion_percent, 0.0);
        assert_eq!(dashboard.overdue_count, 0);
        assert!(dashboard.per_assignee.is_empty());
        assert_eq!(dashboard.completion_trend.len(), 8);
        assert!(dashboard.completion_trend.iter().all(|p| p.completed == 0));
    }

    #[test]
    fn test_status_counts_and_completion_percent() {
        let now = reference_now();
        let tasks = vec![
            task("T1", TaskStatus::Completed, "a@example.com", now + Duration::days(1)),
            task("T2", TaskStatus::InProgress, "a@example.com", now + Duration::days(1)),
            task("T3", TaskStatus::NotStarted, "", now + Duration::days(1)),
            task("T4", TaskStatus::NotStarted, "b@example.com", now + Duration::days(1)),
        ];

        let dashboard = project_dashboard(&tasks, now);

        assert_eq!(dashboard.counts.total, 4);
        assert_eq!(dashboard.counts.completed, 1);
        assert_eq!(dashboard.counts.in_progress, 1);
        assert_eq!(dashboard.counts.not_started, 2);
        assert_eq!(dashboard.completion_percent, 25.0);
        assert_eq!(dashboard.unassigned_count, 1);
    }

    #[test]
    fn test_overdue_excludes_completed() {
        let now = reference_now();
        let tasks = vec![
            // Past due but still open
            task("LATE1", TaskStatus::InProgress, "a@example.com", now - Duration::hours(1)),
            // Not due yet
            task("OK1", TaskStatus::NotStarted, "a@example.com", now + Duration::hours(1)),
            // Past due but finished
            task("DONE1", TaskStatus::Completed, "a@example.com", now - Duration::hours(3)),
        ];

        let dashboard = project_dashboard(&tasks, now);

        assert_eq!(dashboard.overdue_count, 1);
        assert_eq!(dashboard.overdue_tasks, vec!["LATE1".to_string()]);
    }

    #[test]
    fn test_due_soon_buckets_are_disjoint() {
        let now = reference_now();
        let tasks = vec![
            task("A", TaskStatus::NotStarted, "", now + Duration::minutes(30)),
            task("B", TaskStatus::NotStarted, "", now + Duration::minutes(60)),
            task("C", TaskStatus::NotStarted, "", now + Duration::minutes(90)),
            task("D", TaskStatus::NotStarted, "", now + Duration::minutes(180)),
            task("E", TaskStatus::NotStarted, "", now + Duration::minutes(300)),
            // Overdue, belongs in no bucket
            task("F", TaskStatus::NotStarted, "", now - Duration::minutes(5)),
            // Due in 30 minutes but already completed
            task("G", TaskStatus::Completed, "", now + Duration::minutes(30)),
        ];

        let dashboard = project_dashboard(&tasks, now);

        // Window edges are inclusive on the far side, so B lands in within_1h
        assert_eq!(dashboard.due_soon.within_1h, 2);
        assert_eq!(dashboard.due_soon.within_2h, 1);
        assert_eq!(dashboard.due_soon.within_4h, 1);

        let bucketed =
            dashboard.due_soon.within_1h + dashboard.due_soon.within_2h + dashboard.due_soon.within_4h;
        assert_eq!(bucketed, 4);
    }

    #[test]
    fn test_upcoming_24h_sorted_by_due() {
        let now = reference_now();
        let tasks = vec![
            task("LATER", TaskStatus::NotStarted, "", now + Duration::hours(20)),
            task("SOON", TaskStatus::InProgress, "", now + Duration::hours(2)),
            task("FAR", TaskStatus::NotStarted, "", now + Duration::hours(30)),
            task("PAST", TaskStatus::NotStarted, "", now - Duration::hours(1)),
            // A finished task's deadline is not upcoming work
            task("DONE", TaskStatus::Completed, "a@example.com", now + Duration::hours(3)),
        ];

        let dashboard = project_dashboard(&tasks, now);

        assert_eq!(
            dashboard.upcoming_24h,
            vec!["SOON".to_string(), "LATER".to_string()]
        );
    }

    #[test]
    fn test_completion_trend_buckets_by_day() {
        let now = reference_now();

        let mut done_today = task("T1", TaskStatus::Completed, "a@example.com", now);
        done_today.ended_at = Some(now - Duration::hours(2));

        let mut done_three_days_ago = task("T2", TaskStatus::Completed, "a@example.com", now);
        done_three_days_ago.ended_at = Some(now - Duration::days(3));

        let mut done_last_month = task("T3", TaskStatus::Completed, "a@example.com", now);
        done_last_month.ended_at = Some(now - Duration::days(30));

        // Completed without ever being started; no ended_at was recorded
        let done_unknown = task("T4", TaskStatus::Completed, "a@example.com", now);

        let tasks = vec![done_today, done_three_days_ago, done_last_month, done_unknown];
        let dashboard = project_dashboard(&tasks, now);

        assert_eq!(dashboard.completion_trend.len(), 8);
        assert_eq!(dashboard.completion_trend[7].date, "2025-06-15");
        assert_eq!(dashboard.completion_trend[7].completed, 1);
        assert_eq!(dashboard.completion_trend[4].date, "2025-06-12");
        assert_eq!(dashboard.completion_trend[4].completed, 1);

        let total_in_window: u64 = dashboard.completion_trend.iter().map(|p| p.completed).sum();
        assert_eq!(total_in_window, 2);
    }

    #[test]
    fn test_per_assignee_counts_sorted() {
        let now = reference_now();
        let due = now + Duration::days(1);
        let tasks = vec![
            task("T1", TaskStatus::Completed, "zoe@example.com", due),
            task("T2", TaskStatus::InProgress, "amy@example.com", due),
            task("T3", TaskStatus::NotStarted, "amy@example.com", due),
            task("T4", TaskStatus::NotStarted, "", due),
        ];

        let dashboard = project_dashboard(&tasks, now);

        assert_eq!(dashboard.per_assignee.len(), 2);
        assert_eq!(dashboard.per_assignee[0].assignee, "amy@example.com");
        assert_eq!(dashboard.per_assignee[0].total, 2);
        assert_eq!(dashboard.per_assignee[0].in_progress, 1);
        assert_eq!(dashboard.per_assignee[0].not_started, 1);
        assert_eq!(dashboard.per_assignee[1].assignee, "zoe@example.com");
        assert_eq!(dashboard.per_assignee[1].completed, 1);
        assert_eq!(dashboard.unassigned_count, 1);
    }
}
