//! Dashboard metrics computed over the full unfiltered candidate set.
//!
//! Top-line metrics intentionally ignore the active filters so the
//! dashboard reads stably while the user explores; every value is a pure
//! function of `(candidates, context)`.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use rolodex_core::{Record, SegmentContext};

use crate::segments::{is_new_this_period, needs_attention};

/// Summary statistics for a record surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Total candidate count.
    pub total: usize,
    /// Records connected within the trailing new period.
    pub new_this_period: usize,
    /// Records needing attention (no contact, or contact too old).
    pub dormant: usize,
    /// Mean strength across all candidates, missing treated as 0, rounded.
    pub average_strength: u32,
    /// Percentage of denominator records with a response in the trailing
    /// response window, rounded; 0 when the denominator is empty.
    pub response_rate: u32,
}

impl DashboardMetrics {
    /// Computes metrics for the candidate set at the context instant.
    #[must_use]
    pub fn compute<R: Record>(candidates: &[R], ctx: &SegmentContext) -> Self {
        let total = candidates.len();
        if total == 0 {
            return Self::default();
        }

        let new_this_period = candidates
            .iter()
            .filter(|r| is_new_this_period(*r, ctx))
            .count();
        let dormant = candidates.iter().filter(|r| needs_attention(*r, ctx)).count();

        let strength_sum: u64 = candidates
            .iter()
            .map(|r| u64::from(r.strength().unwrap_or(0)))
            .sum();
        let average_strength = (strength_sum as f64 / total as f64).round() as u32;

        let response_cutoff = ctx.now - Duration::days(ctx.cohorts.response_window_days);
        let denominator = candidates
            .iter()
            .filter(|r| r.in_response_denominator())
            .count();
        let responded = candidates
            .iter()
            .filter(|r| r.in_response_denominator())
            .filter(|r| r.responded_at().is_some_and(|at| at >= response_cutoff))
            .count();
        let response_rate = if denominator == 0 {
            0
        } else {
            (responded as f64 * 100.0 / denominator as f64).round() as u32
        };

        Self {
            total,
            new_this_period,
            dormant,
            average_strength,
            response_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rolodex_core::{CohortConfig, Connection, Direction, Invitation};

    fn ctx() -> SegmentContext {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        SegmentContext::new(now, CohortConfig::default())
    }

    #[test]
    fn test_empty_set_yields_zeroes() {
        let metrics = DashboardMetrics::compute::<Connection>(&[], &ctx());
        assert_eq!(metrics, DashboardMetrics::default());
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.average_strength, 0);
        assert_eq!(metrics.response_rate, 0);
        assert_eq!(metrics.dormant, 0);
    }

    #[test]
    fn test_missing_timestamps_classify_as_dormant_not_new() {
        let ctx = ctx();
        let records = vec![Connection::new("a")];

        let metrics = DashboardMetrics::compute(&records, &ctx);
        assert_eq!(metrics.new_this_period, 0);
        assert_eq!(metrics.dormant, 1);
    }

    #[test]
    fn test_average_strength_treats_missing_as_zero() {
        let ctx = ctx();
        let records = vec![
            Connection::new("a").with_strength(90),
            Connection::new("b").with_strength(51),
            Connection::new("c"),
        ];

        // (90 + 51 + 0) / 3 = 47
        let metrics = DashboardMetrics::compute(&records, &ctx);
        assert_eq!(metrics.average_strength, 47);
    }

    #[test]
    fn test_response_rate_over_received_invitations() {
        let ctx = ctx();
        let records = vec![
            Invitation::new("a")
                .with_direction(Direction::Received)
                .with_responded_at(ctx.now - Duration::days(2)),
            Invitation::new("b").with_direction(Direction::Received),
            Invitation::new("c")
                .with_direction(Direction::Sent)
                .with_responded_at(ctx.now - Duration::days(1)),
        ];

        // 1 of 2 received invitations responded inside the window.
        let metrics = DashboardMetrics::compute(&records, &ctx);
        assert_eq!(metrics.response_rate, 50);
    }

    #[test]
    fn test_response_outside_window_does_not_count() {
        let ctx = ctx();
        let records = vec![Invitation::new("a")
            .with_direction(Direction::Received)
            .with_responded_at(ctx.now - Duration::days(8))];

        let metrics = DashboardMetrics::compute(&records, &ctx);
        assert_eq!(metrics.response_rate, 0);
    }
}
