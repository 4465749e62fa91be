//! The generic record contract shared by connections and invitations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::facet::FacetGroup;
use crate::ids::RecordId;

/// Weak reference to an external session or event entity.
///
/// Lookup only; the engine never owns or mutates the referenced entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRef {
    /// Identifier of the external entity.
    pub id: String,
    /// Denormalized display label captured at reference time.
    pub label: String,
}

/// Read-only view of one relationship record.
///
/// Both concrete shapes (`Connection`, `Invitation`) implement this
/// contract; the query and engine layers only ever see the trait. Every
/// accessor degrades missing or malformed data to a safe default rather
/// than failing.
pub trait Record {
    /// Stable platform-supplied identifier.
    fn id(&self) -> &RecordId;

    /// Resolved display name, never empty.
    ///
    /// Falls back through: dedicated name field → linked contact given and
    /// family names → contact email → `Contact <id>` placeholder.
    fn display_name(&self) -> String;

    /// Best-known email address.
    fn email(&self) -> Option<&str>;

    /// Organisation the person belongs to.
    fn organisation(&self) -> Option<&str>;

    /// One-line descriptive headline.
    fn headline(&self) -> Option<&str>;

    /// Location string.
    fn location(&self) -> Option<&str>;

    /// Free-form tags. Storage is unbounded; display capping is a host
    /// concern.
    fn tags(&self) -> &[String];

    /// Canonical lowercase status label from the surface vocabulary.
    fn status_label(&self) -> &'static str;

    /// Relationship strength or engagement score in 0-100.
    fn strength(&self) -> Option<u8>;

    /// Number of mutual connections.
    fn mutual_connections(&self) -> Option<u32>;

    /// When the relationship was established (or the invitation created).
    fn connected_at(&self) -> Option<DateTime<Utc>>;

    /// Most recent outreach or response timestamp.
    fn last_contacted_at(&self) -> Option<DateTime<Utc>>;

    /// Response timestamp used by the response-rate metric.
    fn responded_at(&self) -> Option<DateTime<Utc>>;

    /// Weak reference to an external session entity, when present.
    fn session_ref(&self) -> Option<&SessionRef>;

    /// True when the record carries an explicit champion flag or tag.
    fn is_champion_flagged(&self) -> bool {
        false
    }

    /// True when the record carries an explicit warm-introduction flag.
    fn is_warm_flagged(&self) -> bool {
        false
    }

    /// True for executive-persona records.
    fn is_executive(&self) -> bool {
        false
    }

    /// Whether this record counts toward the response-rate denominator.
    fn in_response_denominator(&self) -> bool {
        true
    }

    /// Values this record contributes to a facet group.
    ///
    /// Array-valued fields contribute every element; scalar fields
    /// contribute their single value when present.
    fn facet_values(&self, group: FacetGroup) -> Vec<&str>;

    /// Lowercased concatenation of the searchable fields.
    ///
    /// Shared by the free-text pipeline stage and custom-segment predicate
    /// reconstruction so both match identically.
    fn search_haystack(&self) -> String {
        let mut haystack = self.display_name().to_lowercase();
        for part in [self.organisation(), self.headline(), self.location()] {
            if let Some(part) = part {
                haystack.push(' ');
                haystack.push_str(&part.to_lowercase());
            }
        }
        for tag in self.tags() {
            haystack.push(' ');
            haystack.push_str(&tag.to_lowercase());
        }
        haystack
    }
}

/// Resolves a display name through the standard fallback chain.
#[must_use]
pub fn resolve_display_name(
    name: Option<&str>,
    given_name: Option<&str>,
    family_name: Option<&str>,
    email: Option<&str>,
    id: &RecordId,
) -> String {
    if let Some(name) = non_blank(name) {
        return name.to_string();
    }

    let composed = [given_name, family_name]
        .iter()
        .filter_map(|part| non_blank(*part))
        .collect::<Vec<_>>()
        .join(" ");
    if !composed.is_empty() {
        return composed;
    }

    if let Some(email) = non_blank(email) {
        return email.to_string();
    }

    format!("Contact {id}")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Deserializes an optional ISO-8601 timestamp, degrading malformed input
/// to `None` instead of failing the whole record.
pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_dedicated_field() {
        let id = RecordId::new("c1");
        let name = resolve_display_name(Some("Avery Quinn"), Some("A"), None, None, &id);
        assert_eq!(name, "Avery Quinn");
    }

    #[test]
    fn test_display_name_composes_contact_names() {
        let id = RecordId::new("c1");
        let name = resolve_display_name(None, Some("Avery"), Some("Quinn"), None, &id);
        assert_eq!(name, "Avery Quinn");

        let given_only = resolve_display_name(None, Some("Avery"), None, None, &id);
        assert_eq!(given_only, "Avery");
    }

    #[test]
    fn test_display_name_falls_back_to_email_then_placeholder() {
        let id = RecordId::new("c7");
        let email = resolve_display_name(None, None, None, Some("a@example.com"), &id);
        assert_eq!(email, "a@example.com");

        let placeholder = resolve_display_name(Some("   "), None, None, None, &id);
        assert_eq!(placeholder, "Contact c7");
    }

    #[test]
    fn test_lenient_datetime_degrades_garbage_to_none() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "lenient_datetime")]
            at: Option<DateTime<Utc>>,
        }

        let ok: Probe = serde_json::from_str(r#"{"at":"2026-01-05T10:00:00Z"}"#).unwrap();
        assert!(ok.at.is_some());

        let bad: Probe = serde_json::from_str(r#"{"at":"last tuesday"}"#).unwrap();
        assert!(bad.at.is_none());

        let missing: Probe = serde_json::from_str("{}").unwrap();
        assert!(missing.at.is_none());
    }
}
