//! Connection records: established or in-progress professional
//! relationships.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::facet::FacetGroup;
use crate::ids::RecordId;
use crate::record::{lenient_datetime, resolve_display_name, Record, SessionRef};

/// Follow status vocabulary for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowStatus {
    /// Bookmarked but no outreach yet.
    Saved,
    /// Connection request sent.
    Requested,
    /// Following without a mutual connection.
    Following,
    /// Mutually connected.
    Connected,
    /// Archived out of the active pipeline.
    Archived,
}

impl FollowStatus {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Requested => "requested",
            Self::Following => "following",
            Self::Connected => "connected",
            Self::Archived => "archived",
        }
    }
}

impl Default for FollowStatus {
    fn default() -> Self {
        Self::Saved
    }
}

impl FromStr for FollowStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saved" => Ok(Self::Saved),
            "requested" => Ok(Self::Requested),
            "following" => Ok(Self::Following),
            "connected" => Ok(Self::Connected),
            "archived" => Ok(Self::Archived),
            _ => Err(()),
        }
    }
}

/// Linked contact details used for display-name and email fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCard {
    /// Given name of the linked contact.
    pub given_name: Option<String>,
    /// Family name of the linked contact.
    pub family_name: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
}

/// A connection record as supplied by the upstream data layer.
///
/// The engine treats connections as read-only snapshots; every mutable
/// field is owned by the external data-access layer and refreshed
/// wholesale on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Stable record identifier.
    pub id: RecordId,
    /// Dedicated display name, when the platform resolved one.
    #[serde(default)]
    pub name: Option<String>,
    /// Linked contact card.
    #[serde(default)]
    pub contact: Option<ContactCard>,
    /// Organisation name.
    #[serde(default)]
    pub organisation: Option<String>,
    /// One-line headline.
    #[serde(default)]
    pub headline: Option<String>,
    /// Location string.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Industry labels.
    #[serde(default)]
    pub industries: Vec<String>,
    /// Seniority label.
    #[serde(default)]
    pub seniority: Option<String>,
    /// Relationship kind (e.g. "client", "mentor").
    #[serde(default)]
    pub relationship: Option<String>,
    /// Follow status.
    #[serde(default)]
    pub status: FollowStatus,
    /// Relationship strength in 0-100.
    #[serde(default)]
    pub strength: Option<u8>,
    /// Mutual connection count.
    #[serde(default)]
    pub mutual_connections: Option<u32>,
    /// When the connection was established.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub connected_at: Option<DateTime<Utc>>,
    /// Most recent outreach timestamp.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_contacted_at: Option<DateTime<Utc>>,
    /// Explicit champion flag.
    #[serde(default)]
    pub champion: bool,
    /// Weak reference to the session where the contact was made.
    #[serde(default)]
    pub session_ref: Option<SessionRef>,
}

impl Connection {
    /// Creates a minimal connection with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            contact: None,
            organisation: None,
            headline: None,
            location: None,
            tags: Vec::new(),
            industries: Vec::new(),
            seniority: None,
            relationship: None,
            status: FollowStatus::default(),
            strength: None,
            mutual_connections: None,
            connected_at: None,
            last_contacted_at: None,
            champion: false,
            session_ref: None,
        }
    }

    /// Sets the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the organisation (builder pattern).
    #[must_use]
    pub fn with_organisation(mut self, organisation: impl Into<String>) -> Self {
        self.organisation = Some(organisation.into());
        self
    }

    /// Sets the tags (builder pattern).
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the follow status (builder pattern).
    #[must_use]
    pub fn with_status(mut self, status: FollowStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the relationship strength (builder pattern).
    #[must_use]
    pub fn with_strength(mut self, strength: u8) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Sets the connection timestamp (builder pattern).
    #[must_use]
    pub fn with_connected_at(mut self, at: DateTime<Utc>) -> Self {
        self.connected_at = Some(at);
        self
    }

    /// Sets the last-contacted timestamp (builder pattern).
    #[must_use]
    pub fn with_last_contacted_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_contacted_at = Some(at);
        self
    }
}

impl Record for Connection {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        let contact = self.contact.as_ref();
        resolve_display_name(
            self.name.as_deref(),
            contact.and_then(|c| c.given_name.as_deref()),
            contact.and_then(|c| c.family_name.as_deref()),
            contact.and_then(|c| c.email.as_deref()),
            &self.id,
        )
    }

    fn email(&self) -> Option<&str> {
        self.contact.as_ref().and_then(|c| c.email.as_deref())
    }

    fn organisation(&self) -> Option<&str> {
        self.organisation.as_deref()
    }

    fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn status_label(&self) -> &'static str {
        self.status.as_str()
    }

    fn strength(&self) -> Option<u8> {
        self.strength
    }

    fn mutual_connections(&self) -> Option<u32> {
        self.mutual_connections
    }

    fn connected_at(&self) -> Option<DateTime<Utc>> {
        self.connected_at
    }

    fn last_contacted_at(&self) -> Option<DateTime<Utc>> {
        self.last_contacted_at
    }

    fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.last_contacted_at
    }

    fn session_ref(&self) -> Option<&SessionRef> {
        self.session_ref.as_ref()
    }

    fn is_champion_flagged(&self) -> bool {
        self.champion
            || self
                .tags
                .iter()
                .any(|tag| tag.eq_ignore_ascii_case("champion"))
    }

    fn facet_values(&self, group: FacetGroup) -> Vec<&str> {
        match group {
            FacetGroup::Statuses => vec![self.status.as_str()],
            FacetGroup::Relationships => scalar(self.relationship.as_deref()),
            FacetGroup::Organisations => scalar(self.organisation.as_deref()),
            FacetGroup::Industries => self.industries.iter().map(String::as_str).collect(),
            FacetGroup::Locations => scalar(self.location.as_deref()),
            FacetGroup::Tags => self.tags.iter().map(String::as_str).collect(),
            FacetGroup::Seniority => scalar(self.seniority.as_deref()),
        }
    }
}

pub(crate) fn scalar(value: Option<&str>) -> Vec<&str> {
    value.map(|v| vec![v]).unwrap_or_default()
}
