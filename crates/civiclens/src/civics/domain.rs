use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for counties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountyId(pub String);

/// Identifier wrapper for constituencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstituencyId(pub String);

/// Identifier wrapper for wards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WardId(pub String);

/// Identifier wrapper for citizens (identity-provider subject ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitizenId(pub String);

/// Identifier wrapper for leaders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderId(pub String);

impl fmt::Display for LeaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository-assigned comment identifier. Monotonically increasing so that
/// same-instant comments keep a stable display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The administrative tier a jurisdiction (and the position holding it) sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionTier {
    Nationwide,
    County,
    Constituency,
    Ward,
}

/// Elected or aspirant positions, each tied to exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    President,
    Governor,
    Senator,
    WomenRep,
    Mp,
    Mca,
}

impl Position {
    pub const fn label(self) -> &'static str {
        match self {
            Position::President => "President",
            Position::Governor => "Governor",
            Position::Senator => "Senator",
            Position::WomenRep => "Women Rep",
            Position::Mp => "MP",
            Position::Mca => "MCA",
        }
    }

    pub const fn tier(self) -> JurisdictionTier {
        match self {
            Position::President => JurisdictionTier::Nationwide,
            Position::Governor | Position::Senator | Position::WomenRep => JurisdictionTier::County,
            Position::Mp => JurisdictionTier::Constituency,
            Position::Mca => JurisdictionTier::Ward,
        }
    }
}

/// Where a leader's mandate applies. Exactly one level is carried; the
/// position's tier must match (`Leader::new` enforces this).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", content = "id", rename_all = "snake_case")]
pub enum Jurisdiction {
    Nationwide,
    County(CountyId),
    Constituency(ConstituencyId),
    Ward(WardId),
}

impl Jurisdiction {
    pub const fn tier(&self) -> JurisdictionTier {
        match self {
            Jurisdiction::Nationwide => JurisdictionTier::Nationwide,
            Jurisdiction::County(_) => JurisdictionTier::County,
            Jurisdiction::Constituency(_) => JurisdictionTier::Constituency,
            Jurisdiction::Ward(_) => JurisdictionTier::Ward,
        }
    }
}

/// Raised when a leader is constructed with a jurisdiction at the wrong tier.
#[derive(Debug, thiserror::Error)]
#[error("{position:?} holds a {found:?} jurisdiction but requires {expected:?}")]
pub struct JurisdictionMismatch {
    pub position: Position,
    pub expected: JurisdictionTier,
    pub found: JurisdictionTier,
}

/// An elected official or candidate citizens can rate and discuss.
///
/// `bio`, `manifesto`, and `photo_url` are presentation payloads; the engine
/// stores the photo URL string and never touches image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub id: LeaderId,
    pub name: String,
    pub position: Position,
    pub jurisdiction: Jurisdiction,
    pub bio: Option<String>,
    pub manifesto: Option<String>,
    pub photo_url: Option<String>,
}

impl Leader {
    pub fn new(
        id: LeaderId,
        name: impl Into<String>,
        position: Position,
        jurisdiction: Jurisdiction,
    ) -> Result<Self, JurisdictionMismatch> {
        if jurisdiction.tier() != position.tier() {
            return Err(JurisdictionMismatch {
                position,
                expected: position.tier(),
                found: jurisdiction.tier(),
            });
        }

        Ok(Self {
            id,
            name: name.into(),
            position,
            jurisdiction,
            bio: None,
            manifesto: None,
            photo_url: None,
        })
    }
}

/// A citizen's profile as the engine sees it: identity, location assignment,
/// and role flags. Created at signup completion; the core reads it, external
/// profile flows mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitizenProfile {
    pub id: CitizenId,
    pub county_id: Option<CountyId>,
    pub constituency_id: Option<ConstituencyId>,
    pub ward_id: Option<WardId>,
    #[serde(default)]
    pub is_leader: bool,
    #[serde(default)]
    pub is_aspirant: bool,
    #[serde(default)]
    pub is_admin: bool,
}

impl CitizenProfile {
    pub fn new(id: CitizenId) -> Self {
        Self {
            id,
            county_id: None,
            constituency_id: None,
            ward_id: None,
            is_leader: false,
            is_aspirant: false,
            is_admin: false,
        }
    }
}

/// A scored review, unique per (citizen, leader) pair. Re-submission replaces
/// the stored value; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub citizen_id: CitizenId,
    pub leader_id: LeaderId,
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

/// A discussion entry. `parent_id`, when present, always references a
/// top-level comment (one reply level, enforced at post time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub leader_id: LeaderId,
    pub author_id: CitizenId,
    pub body: String,
    pub parent_id: Option<CommentId>,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub const fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Citizen feedback is either a scored review or a free-text discussion post.
/// The tag keeps the two apart: a review never carries text, a discussion
/// never carries a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    Review {
        score: u8,
    },
    Discussion {
        body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<CommentId>,
    },
}

/// What a feedback submission produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackReceipt {
    Review { score: u8 },
    Discussion { comment_id: CommentId },
}
