//! Report projections
//!
//! Pure functions over a ticket snapshot, recomputed on each call. Nothing
//! here stores derived state, so reports can never go stale relative to the
//! repository they were computed from.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use helpdesk_domain::{
    sla_deadline, AnalystLoad, CategoryResolution, DashboardStats, MonthlyCount, SlaPerformance,
    Ticket, TicketStatus,
};

/// Tickets whose status is in the open bucket.
#[must_use]
pub fn open(tickets: &[Ticket]) -> Vec<&Ticket> {
    tickets.iter().filter(|t| t.status == TicketStatus::Open).collect()
}

/// Tickets whose status is in the in-progress bucket.
#[must_use]
pub fn in_progress(tickets: &[Ticket]) -> Vec<&Ticket> {
    tickets.iter().filter(|t| t.status == TicketStatus::InProgress).collect()
}

/// Tickets whose status is terminal. Tickets with an unrecognized status
/// belong to no bucket and are absent from all three lists.
#[must_use]
pub fn closed(tickets: &[Ticket]) -> Vec<&Ticket> {
    tickets.iter().filter(|t| t.status.is_terminal()).collect()
}

/// Non-terminal tickets requested by the given display name. Everything not
/// terminal counts as open here, unrecognized statuses included.
///
/// Matching is by exact name, not by a stable identifier; two requesters
/// sharing a display name will collide. The transport contract carries no
/// requester id to key on.
#[must_use]
pub fn mine_open<'a>(tickets: &'a [Ticket], requester: &str) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| t.requester == requester && !t.status.is_terminal()).collect()
}

/// Terminal tickets requested by the given display name. Same name-equality
/// caveat as [`mine_open`].
#[must_use]
pub fn mine_closed<'a>(tickets: &'a [Ticket], requester: &str) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| t.requester == requester && t.status.is_terminal()).collect()
}

/// Open and in-progress tickets within two hours of their SLA deadline
/// (overdue tickets included).
#[must_use]
pub fn sla_risk(tickets: &[Ticket], now: DateTime<Utc>) -> Vec<&Ticket> {
    tickets
        .iter()
        .filter(|t| t.status.is_active())
        .filter(|t| sla_deadline(t.opened_at, t.priority) - now < Duration::hours(2))
        .collect()
}

/// Per-analyst ticket totals from the dashboard snapshot, busiest first.
#[must_use]
pub fn analyst_load(stats: &DashboardStats) -> Vec<AnalystLoad> {
    let mut rows = stats.per_analyst.clone();
    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.analyst.cmp(&b.analyst)));
    rows
}

/// Average resolution time in hours per category.
///
/// Only resolved tickets carrying both timestamps contribute; a category
/// with no such ticket is absent from the result. Rows come out in
/// category-name order.
#[must_use]
pub fn category_resolution(tickets: &[Ticket]) -> Vec<CategoryResolution> {
    let mut sums: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for ticket in tickets {
        if ticket.status != TicketStatus::Resolved {
            continue;
        }
        let Some(closed_at) = ticket.closed_at else { continue };
        let hours = (closed_at - ticket.opened_at).num_seconds() as f64 / 3600.0;
        let entry = sums.entry(ticket.category.as_str()).or_insert((0.0, 0));
        entry.0 += hours;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(category, (total, count))| CategoryResolution {
            category: category.to_string(),
            avg_hours: total / f64::from(count),
        })
        .collect()
}

/// Ticket counts per month for the given year, months in calendar order.
/// Months with no tickets are absent.
#[must_use]
pub fn monthly_counts(tickets: &[Ticket], year: i32) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for ticket in tickets {
        if ticket.opened_at.year() == year {
            *counts.entry(ticket.opened_at.month()).or_insert(0) += 1;
        }
    }
    counts.into_iter().map(|(month, total)| MonthlyCount { month, total }).collect()
}

/// Years with at least one ticket opened, most recent first.
#[must_use]
pub fn available_years(tickets: &[Ticket]) -> Vec<i32> {
    let mut years: Vec<i32> = tickets.iter().map(|t| t.opened_at.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// SLA compliance over resolved and closed tickets.
///
/// A ticket counts as within SLA when it carries a close timestamp at or
/// before its deadline. With no resolved/closed tickets the rate is 0, not
/// NaN.
#[must_use]
pub fn sla_performance(tickets: &[Ticket]) -> SlaPerformance {
    let finished: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| matches!(t.status, TicketStatus::Resolved | TicketStatus::Closed))
        .collect();
    let total = finished.len() as u64;
    let within = finished
        .iter()
        .filter(|t| {
            t.closed_at.is_some_and(|closed_at| closed_at <= sla_deadline(t.opened_at, t.priority))
        })
        .count() as u64;
    let outside = total - within;
    let compliance_rate =
        if total == 0 { 0.0 } else { (within as f64 / total as f64) * 100.0 };
    SlaPerformance { total, within, outside, compliance_rate }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use helpdesk_domain::TicketPriority;

    use super::*;

    fn ticket(id: i64, requester: &str, status: &str, priority: &str) -> Ticket {
        Ticket {
            id,
            number: format!("CH-{id:04}"),
            requester: requester.to_string(),
            description: "desc".into(),
            category: "Rede".into(),
            priority: TicketPriority::parse(priority),
            priority_label: priority.to_string(),
            status: TicketStatus::parse(status),
            status_label: status.to_string(),
            opened_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            closed_at: None,
            assigned_to: None,
            solution: None,
            history: Vec::new(),
            reopened: false,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn buckets_partition_known_statuses_and_drop_unknown() {
        let tickets = vec![
            ticket(1, "Ana", "Aberto", "Alta"),
            ticket(2, "Ana", "Em Andamento", "Alta"),
            ticket(3, "Ana", "Cancelado", "Alta"),
            ticket(4, "Ana", "Triagem", "Alta"), // unrecognized
        ];
        assert_eq!(open(&tickets).len(), 1);
        assert_eq!(in_progress(&tickets).len(), 1);
        assert_eq!(closed(&tickets).len(), 1);
    }

    #[test]
    fn mine_filters_split_by_terminal_membership() {
        let tickets = vec![
            ticket(1, "Ana", "Aberto", "Alta"),
            ticket(2, "Ana", "Resolvido", "Alta"),
            ticket(3, "Bruno", "Aberto", "Alta"),
            ticket(4, "Ana", "Aguardando Peça", "Alta"), // unrecognized, not terminal
        ];
        let open = mine_open(&tickets, "Ana");
        let ids: Vec<i64> = open.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 4]);
        let closed = mine_closed(&tickets, "Ana");
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, 2);
    }

    #[test]
    fn sla_risk_includes_near_deadline_and_overdue_active_tickets() {
        let mut safe = ticket(1, "Ana", "Aberto", "Baixa"); // deadline +2d
        safe.opened_at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut near = ticket(2, "Ana", "Em Andamento", "Alta"); // deadline +8h
        near.opened_at = Utc.with_ymd_and_hms(2024, 3, 10, 5, 0, 0).unwrap();
        let mut overdue = ticket(3, "Ana", "Aberto", "Critica"); // deadline +2h
        overdue.opened_at = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        let mut terminal = ticket(4, "Ana", "Fechado", "Critica");
        terminal.opened_at = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let tickets = [safe, near, overdue, terminal];
        let risky = sla_risk(&tickets, now);
        let ids: Vec<i64> = risky.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn category_resolution_averages_only_resolved_with_timestamps() {
        let mut fast = ticket(1, "Ana", "Resolvido", "Alta");
        fast.closed_at = Some(fast.opened_at + Duration::hours(2));
        let mut slow = ticket(2, "Ana", "Resolvido", "Alta");
        slow.closed_at = Some(slow.opened_at + Duration::hours(6));
        let mut other_category = ticket(3, "Ana", "Resolvido", "Alta");
        other_category.category = "Hardware".into();
        other_category.closed_at = Some(other_category.opened_at + Duration::hours(10));
        let no_timestamp = ticket(4, "Ana", "Resolvido", "Alta");
        let mut closed_not_resolved = ticket(5, "Ana", "Fechado", "Alta");
        closed_not_resolved.closed_at = Some(closed_not_resolved.opened_at + Duration::hours(1));

        let rows =
            category_resolution(&[fast, slow, other_category, no_timestamp, closed_not_resolved]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Hardware");
        assert!((rows[0].avg_hours - 10.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].category, "Rede");
        assert!((rows[1].avg_hours - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn monthly_counts_filter_by_year() {
        let mut january = ticket(1, "Ana", "Aberto", "Alta");
        january.opened_at = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let mut march_a = ticket(2, "Ana", "Aberto", "Alta");
        march_a.opened_at = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        let mut march_b = ticket(3, "Ana", "Aberto", "Alta");
        march_b.opened_at = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let mut other_year = ticket(4, "Ana", "Aberto", "Alta");
        other_year.opened_at = Utc.with_ymd_and_hms(2023, 3, 5, 0, 0, 0).unwrap();

        let tickets = [january, march_a, march_b, other_year];
        let rows = monthly_counts(&tickets, 2024);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].month, rows[0].total), (1, 1));
        assert_eq!((rows[1].month, rows[1].total), (3, 2));

        assert_eq!(available_years(&tickets), vec![2024, 2023]);
    }

    #[test]
    fn compliance_rate_is_zero_for_empty_denominator() {
        let tickets = vec![ticket(1, "Ana", "Aberto", "Alta")];
        let perf = sla_performance(&tickets);
        assert_eq!(perf.total, 0);
        assert_eq!(perf.compliance_rate, 0.0);
    }

    #[test]
    fn compliance_rate_counts_within_and_outside() {
        let mut within = ticket(1, "Ana", "Resolvido", "Alta"); // deadline +8h
        within.closed_at = Some(within.opened_at + Duration::hours(4));
        let mut outside = ticket(2, "Ana", "Fechado", "Alta");
        outside.closed_at = Some(outside.opened_at + Duration::hours(20));
        let mut no_timestamp = ticket(3, "Ana", "Resolvido", "Alta");
        no_timestamp.closed_at = None;

        let perf = sla_performance(&[within, outside, no_timestamp]);
        assert_eq!(perf.total, 3);
        assert_eq!(perf.within, 1);
        assert_eq!(perf.outside, 2);
        assert!((perf.compliance_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn analyst_load_sorts_busiest_first() {
        let stats = DashboardStats {
            queue_size: 3,
            per_analyst: vec![
                AnalystLoad { analyst: "Bruno".into(), total: 2 },
                AnalystLoad { analyst: "Ana".into(), total: 5 },
                AnalystLoad { analyst: "Carla".into(), total: 2 },
            ],
            sla_violated: Vec::new(),
        };
        let rows = analyst_load(&stats);
        assert_eq!(rows[0].analyst, "Ana");
        assert_eq!(rows[1].analyst, "Bruno");
        assert_eq!(rows[2].analyst, "Carla");
    }
}
