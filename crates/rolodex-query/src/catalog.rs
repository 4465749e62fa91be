//! Facet catalog builder: derives the selectable values per facet group.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use rolodex_core::{FacetGroup, FacetValue, Record};

/// Distinct facet values available per group, derived from the candidate
/// set in one scan.
///
/// Values are de-duplicated, keep first-occurrence order, and are capped
/// per group to keep the filter UI tractable. Building twice from the same
/// input yields an identical catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCatalog {
    groups: BTreeMap<FacetGroup, Vec<FacetValue>>,
}

impl FacetCatalog {
    /// Scans the candidate set and derives capped value lists for every
    /// derived facet group.
    #[must_use]
    pub fn build<R: Record>(records: &[R], cap: usize) -> Self {
        let mut groups = BTreeMap::new();

        for group in FacetGroup::DERIVED {
            let mut seen: HashSet<String> = HashSet::new();
            let mut values: Vec<FacetValue> = Vec::new();

            'records: for record in records {
                for value in record.facet_values(group) {
                    if value.is_empty() || seen.contains(value) {
                        continue;
                    }
                    seen.insert(value.to_string());
                    values.push(FacetValue::new(value));
                    if values.len() >= cap {
                        break 'records;
                    }
                }
            }

            groups.insert(group, values);
        }

        Self { groups }
    }

    /// Returns the available values for a group.
    #[must_use]
    pub fn values(&self, group: FacetGroup) -> &[FacetValue] {
        self.groups.get(&group).map_or(&[], Vec::as_slice)
    }

    /// Iterates groups with at least one available value.
    pub fn populated_groups(&self) -> impl Iterator<Item = (FacetGroup, &[FacetValue])> {
        self.groups
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(group, values)| (*group, values.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_core::Connection;

    fn fixtures() -> Vec<Connection> {
        vec![
            Connection::new("1")
                .with_organisation("Acme")
                .with_tags(["Design", "Founder"]),
            Connection::new("2")
                .with_organisation("Acme")
                .with_tags(["Design"]),
            Connection::new("3").with_organisation("Zephyr"),
        ]
    }

    #[test]
    fn test_catalog_deduplicates_preserving_order() {
        let catalog = FacetCatalog::build(&fixtures(), 30);

        let orgs: Vec<&str> = catalog
            .values(FacetGroup::Organisations)
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(orgs, vec!["Acme", "Zephyr"]);

        let tags: Vec<&str> = catalog
            .values(FacetGroup::Tags)
            .iter()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(tags, vec!["Design", "Founder"]);
    }

    #[test]
    fn test_catalog_respects_cap() {
        let records: Vec<Connection> = (0..50)
            .map(|i| Connection::new(format!("c{i}")).with_organisation(format!("Org {i}")))
            .collect();

        let catalog = FacetCatalog::build(&records, 30);
        assert_eq!(catalog.values(FacetGroup::Organisations).len(), 30);
    }

    #[test]
    fn test_catalog_is_deterministic() {
        let records = fixtures();
        let a = FacetCatalog::build(&records, 30);
        let b = FacetCatalog::build(&records, 30);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_yields_empty_groups() {
        let catalog = FacetCatalog::build::<Connection>(&[], 30);
        assert_eq!(catalog.populated_groups().count(), 0);
    }
}
