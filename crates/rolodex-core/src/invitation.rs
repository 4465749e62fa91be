//! Invitation records: pending and resolved invitations to connect.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::connection::scalar;
use crate::facet::FacetGroup;
use crate::ids::RecordId;
use crate::record::{lenient_datetime, resolve_display_name, Record, SessionRef};

/// Invitation status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting a response.
    Pending,
    /// Accepted by the invitee.
    Accepted,
    /// Declined by the invitee.
    Declined,
    /// Lapsed without a response.
    Expired,
}

impl InvitationStatus {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
        }
    }
}

impl Default for InvitationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl FromStr for InvitationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "expired" => Ok(Self::Expired),
            _ => Err(()),
        }
    }
}

/// Direction of an invitation relative to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent by the current user.
    Sent,
    /// Received from another user.
    Received,
}

impl Direction {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Received
    }
}

/// An invitation record as supplied by the upstream data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    /// Stable record identifier.
    pub id: RecordId,
    /// Invitee display name, when the platform resolved one.
    #[serde(default)]
    pub name: Option<String>,
    /// Invitee given name.
    #[serde(default)]
    pub given_name: Option<String>,
    /// Invitee family name.
    #[serde(default)]
    pub family_name: Option<String>,
    /// Invitee email address.
    #[serde(default)]
    pub email: Option<String>,
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
    /// Invitation status.
    #[serde(default)]
    pub status: InvitationStatus,
    /// Direction relative to the current user.
    #[serde(default)]
    pub direction: Direction,
    /// Executive-persona flag.
    #[serde(default)]
    pub executive: bool,
    /// Explicit warm-introduction flag.
    #[serde(default)]
    pub warm: bool,
    /// Engagement score in 0-100.
    #[serde(default)]
    pub engagement_score: Option<u8>,
    /// Mutual connection count.
    #[serde(default)]
    pub mutual_connections: Option<u32>,
    /// When the invitation was created.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the invitee responded.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub responded_at: Option<DateTime<Utc>>,
    /// Weak reference to the originating session.
    #[serde(default)]
    pub session_ref: Option<SessionRef>,
}

impl Invitation {
    /// Creates a minimal invitation with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            given_name: None,
            family_name: None,
            email: None,
            organisation: None,
            headline: None,
            location: None,
            tags: Vec::new(),
            industries: Vec::new(),
            seniority: None,
            status: InvitationStatus::default(),
            direction: Direction::default(),
            executive: false,
            warm: false,
            engagement_score: None,
            mutual_connections: None,
            created_at: None,
            responded_at: None,
            session_ref: None,
        }
    }

    /// Sets the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the invitation status (builder pattern).
    #[must_use]
    pub fn with_status(mut self, status: InvitationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the direction (builder pattern).
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the mutual connection count (builder pattern).
    #[must_use]
    pub fn with_mutual_connections(mut self, count: u32) -> Self {
        self.mutual_connections = Some(count);
        self
    }

    /// Sets the response timestamp (builder pattern).
    #[must_use]
    pub fn with_responded_at(mut self, at: DateTime<Utc>) -> Self {
        self.responded_at = Some(at);
        self
    }
}

impl Record for Invitation {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn display_name(&self) -> String {
        resolve_display_name(
            self.name.as_deref(),
            self.given_name.as_deref(),
            self.family_name.as_deref(),
            self.email.as_deref(),
            &self.id,
        )
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
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
        self.engagement_score
    }

    fn mutual_connections(&self) -> Option<u32> {
        self.mutual_connections
    }

    fn connected_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn last_contacted_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    fn responded_at(&self) -> Option<DateTime<Utc>> {
        self.responded_at
    }

    fn session_ref(&self) -> Option<&SessionRef> {
        self.session_ref.as_ref()
    }

    fn is_warm_flagged(&self) -> bool {
        self.warm
    }

    fn is_executive(&self) -> bool {
        self.executive
    }

    fn in_response_denominator(&self) -> bool {
        self.direction == Direction::Received
    }

    fn facet_values(&self, group: FacetGroup) -> Vec<&str> {
        match group {
            FacetGroup::Statuses => vec![self.status.as_str()],
            FacetGroup::Relationships => vec![self.direction.as_str()],
            FacetGroup::Organisations => scalar(self.organisation.as_deref()),
            FacetGroup::Industries => self.industries.iter().map(String::as_str).collect(),
            FacetGroup::Locations => scalar(self.location.as_deref()),
            FacetGroup::Tags => self.tags.iter().map(String::as_str).collect(),
            FacetGroup::Seniority => scalar(self.seniority.as_deref()),
        }
    }
}
