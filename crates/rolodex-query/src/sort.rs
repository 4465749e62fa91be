//! Named total orders applied as the final pipeline stage.

use std::cmp::Reverse;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rolodex_core::Record;

/// Sort key for the filtered result.
///
/// All comparators rely on a stable sort so records with equal keys keep
/// their pre-sort relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Descending by most recent touch (`max(last_contacted, connected)`);
    /// records with no timestamps sort last.
    Recency,
    /// Descending by strength; missing sorts as 0.
    Strength,
    /// Descending by mutual connection count; missing sorts as 0.
    Mutual,
    /// Ascending by organisation name; missing sorts as the empty string.
    Organisation,
}

impl SortKey {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recency => "recency",
            Self::Strength => "strength",
            Self::Mutual => "mutual",
            Self::Organisation => "organisation",
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::Recency
    }
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recency" => Ok(Self::Recency),
            "strength" => Ok(Self::Strength),
            "mutual" => Ok(Self::Mutual),
            "organisation" => Ok(Self::Organisation),
            _ => Err(()),
        }
    }
}

/// Reorders `positions` (indices into `records`) in place by the given key.
///
/// `slice::sort_by_key` is stable, which is what keeps equal-key records in
/// their original relative order.
pub fn order<R: Record>(records: &[R], positions: &mut [usize], key: SortKey) {
    match key {
        SortKey::Recency => {
            positions.sort_by_key(|&i| Reverse(recency_millis(&records[i])));
        }
        SortKey::Strength => {
            positions.sort_by_key(|&i| Reverse(records[i].strength().unwrap_or(0)));
        }
        SortKey::Mutual => {
            positions.sort_by_key(|&i| Reverse(records[i].mutual_connections().unwrap_or(0)));
        }
        SortKey::Organisation => {
            positions.sort_by(|&a, &b| {
                let left = records[a].organisation().unwrap_or("");
                let right = records[b].organisation().unwrap_or("");
                left.cmp(right)
            });
        }
    }
}

/// Millisecond key for recency ordering; missing timestamps become epoch 0.
fn recency_millis<R: Record>(record: &R) -> i64 {
    let last = record.last_contacted_at().map_or(0, |ts| ts.timestamp_millis());
    let connected = record.connected_at().map_or(0, |ts| ts.timestamp_millis());
    last.max(connected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rolodex_core::Connection;

    fn fixtures() -> Vec<Connection> {
        vec![
            Connection::new("a")
                .with_organisation("Zephyr")
                .with_strength(40)
                .with_connected_at(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            Connection::new("b")
                .with_organisation("Acme")
                .with_strength(90)
                .with_last_contacted_at(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()),
            Connection::new("c").with_strength(40),
        ]
    }

    #[test]
    fn test_recency_descending_missing_last() {
        let records = fixtures();
        let mut positions = vec![0, 1, 2];
        order(&records, &mut positions, SortKey::Recency);
        assert_eq!(positions, vec![1, 0, 2]);
    }

    #[test]
    fn test_strength_ties_are_stable() {
        let records = fixtures();
        let mut positions = vec![0, 1, 2];
        order(&records, &mut positions, SortKey::Strength);
        // b first, then a and c keep their original relative order.
        assert_eq!(positions, vec![1, 0, 2]);
    }

    #[test]
    fn test_organisation_missing_sorts_first() {
        let records = fixtures();
        let mut positions = vec![0, 1, 2];
        order(&records, &mut positions, SortKey::Organisation);
        assert_eq!(positions, vec![2, 1, 0]);
    }

    #[test]
    fn test_sort_key_roundtrip() {
        for key in [
            SortKey::Recency,
            SortKey::Strength,
            SortKey::Mutual,
            SortKey::Organisation,
        ] {
            let parsed: SortKey = key.as_str().parse().unwrap();
            assert_eq!(key, parsed);
        }
    }
}
