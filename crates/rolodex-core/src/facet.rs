//! Facet model: filterable dimensions and the active filter state.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One filterable dimension of a record.
///
/// Groups combine with AND in the filter pipeline; values within a group
/// combine with OR. A group with no active values places no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetGroup {
    /// Record status vocabulary (follow status / invitation status).
    Statuses,
    /// Relationship kind (connections) or direction (invitations).
    Relationships,
    /// Organisation names.
    Organisations,
    /// Industry labels.
    Industries,
    /// Location strings.
    Locations,
    /// Free-form tags.
    Tags,
    /// Seniority labels.
    Seniority,
}

impl FacetGroup {
    /// Every facet group, in canonical order.
    pub const ALL: [FacetGroup; 7] = [
        Self::Statuses,
        Self::Relationships,
        Self::Organisations,
        Self::Industries,
        Self::Locations,
        Self::Tags,
        Self::Seniority,
    ];

    /// Groups whose value catalogs are derived from the record set.
    ///
    /// Statuses and relationships come from fixed vocabularies and are not
    /// catalog-derived.
    pub const DERIVED: [FacetGroup; 5] = [
        Self::Organisations,
        Self::Industries,
        Self::Locations,
        Self::Tags,
        Self::Seniority,
    ];

    /// Returns the canonical lowercase name of the group.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Statuses => "statuses",
            Self::Relationships => "relationships",
            Self::Organisations => "organisations",
            Self::Industries => "industries",
            Self::Locations => "locations",
            Self::Tags => "tags",
            Self::Seniority => "seniority",
        }
    }
}

impl FromStr for FacetGroup {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "statuses" => Ok(Self::Statuses),
            "relationships" => Ok(Self::Relationships),
            "organisations" => Ok(Self::Organisations),
            "industries" => Ok(Self::Industries),
            "locations" => Ok(Self::Locations),
            "tags" => Ok(Self::Tags),
            "seniority" => Ok(Self::Seniority),
            _ => Err(()),
        }
    }
}

/// One selectable value inside a facet group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    /// Stable value identifier (the raw record value).
    pub id: String,
    /// Display label (first-seen casing of the value).
    pub label: String,
}

impl FacetValue {
    /// Creates a facet value whose id and label are the raw record value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: value.clone(),
            label: value,
        }
    }
}

/// Active facet filter state: facet group → set of selected values.
///
/// `BTreeMap`/`BTreeSet` keep iteration (and serialization) deterministic,
/// which saved-segment round-trips rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetFilterState(BTreeMap<FacetGroup, BTreeSet<String>>);

impl FacetFilterState {
    /// Creates an empty filter state (no constraints).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `value` in `group`.
    ///
    /// Removing the last value of a group removes the group entry entirely,
    /// so an exhausted group never constrains the pipeline.
    pub fn toggle(&mut self, group: FacetGroup, value: impl Into<String>) {
        let value = value.into();
        let values = self.0.entry(group).or_default();
        if !values.remove(&value) {
            values.insert(value);
        }
        if values.is_empty() {
            self.0.remove(&group);
        }
    }

    /// Replaces the active values of a group wholesale.
    pub fn set(&mut self, group: FacetGroup, values: impl IntoIterator<Item = String>) {
        let values: BTreeSet<String> = values.into_iter().collect();
        if values.is_empty() {
            self.0.remove(&group);
        } else {
            self.0.insert(group, values);
        }
    }

    /// Removes every active value.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the active values of a group, if the group constrains at all.
    #[must_use]
    pub fn active(&self, group: FacetGroup) -> Option<&BTreeSet<String>> {
        self.0.get(&group).filter(|values| !values.is_empty())
    }

    /// Iterates groups that currently carry at least one active value.
    pub fn active_groups(&self) -> impl Iterator<Item = (FacetGroup, &BTreeSet<String>)> {
        self.0
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(group, values)| (*group, values))
    }

    /// True when no group constrains the result.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.active_groups().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_symmetric() {
        let mut state = FacetFilterState::new();
        state.toggle(FacetGroup::Tags, "Design");
        assert!(state.active(FacetGroup::Tags).unwrap().contains("Design"));

        state.toggle(FacetGroup::Tags, "Design");
        assert!(state.active(FacetGroup::Tags).is_none());
        assert!(state.is_unconstrained());
    }

    #[test]
    fn test_empty_group_never_constrains() {
        let mut state = FacetFilterState::new();
        state.set(FacetGroup::Locations, Vec::new());
        assert!(state.active(FacetGroup::Locations).is_none());
        assert_eq!(state.active_groups().count(), 0);
    }

    #[test]
    fn test_group_name_roundtrip() {
        for group in FacetGroup::ALL {
            let parsed: FacetGroup = group.as_str().parse().unwrap();
            assert_eq!(group, parsed);
        }
    }

    #[test]
    fn test_filter_state_serialization_is_stable() {
        let mut state = FacetFilterState::new();
        state.toggle(FacetGroup::Tags, "Design");
        state.toggle(FacetGroup::Organisations, "Acme");

        let a = serde_json::to_string(&state).unwrap();
        let b = serde_json::to_string(&state).unwrap();
        assert_eq!(a, b);

        let back: FacetFilterState = serde_json::from_str(&a).unwrap();
        assert_eq!(state, back);
    }
}
