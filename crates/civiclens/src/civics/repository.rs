use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    CitizenId, CitizenProfile, Comment, CommentId, ConstituencyId, CountyId, Leader, LeaderId,
    Position, Rating, WardId,
};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Optional narrowing for moderation and admin listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderFilter {
    #[serde(default)]
    pub county_id: Option<CountyId>,
    #[serde(default)]
    pub position: Option<Position>,
}

impl LeaderFilter {
    pub fn matches(&self, leader: &Leader) -> bool {
        if let Some(position) = self.position {
            if leader.position != position {
                return false;
            }
        }
        if let Some(county) = &self.county_id {
            if !leader_sits_in_county(leader, county) {
                return false;
            }
        }
        true
    }
}

fn leader_sits_in_county(leader: &Leader, county: &CountyId) -> bool {
    match &leader.jurisdiction {
        super::domain::Jurisdiction::County(id) => id == county,
        // Constituency/ward jurisdictions carry no county id of their own;
        // directories that can resolve ancestry may override via `filtered`.
        _ => false,
    }
}

/// Read-side access to the leader register, mirroring the per-tier lookups
/// the dashboard issues: nationwide singleton, county trio, one MP, one MCA.
pub trait LeaderDirectory: Send + Sync {
    fn fetch(&self, id: &LeaderId) -> Result<Option<Leader>, RepositoryError>;
    /// Leaders whose mandate is nationwide (President).
    fn nationwide(&self) -> Result<Vec<Leader>, RepositoryError>;
    /// Leaders whose jurisdiction is exactly this county (Governor, Senator,
    /// Women Rep; zero or more, no cardinality imposed here).
    fn for_county(&self, county: &CountyId) -> Result<Vec<Leader>, RepositoryError>;
    /// The MP for a constituency, if registered.
    fn for_constituency(
        &self,
        constituency: &ConstituencyId,
    ) -> Result<Option<Leader>, RepositoryError>;
    /// The MCA for a ward, if registered.
    fn for_ward(&self, ward: &WardId) -> Result<Option<Leader>, RepositoryError>;
    /// Every registered leader matching the filter, for admin listings.
    fn filtered(&self, filter: &LeaderFilter) -> Result<Vec<Leader>, RepositoryError>;
}

/// Rating persistence. `upsert` is the uniqueness mechanism: the store keys on
/// (citizen, leader) and the last committed write wins, which is what makes
/// concurrent submissions from one citizen serialize safely.
pub trait RatingRepository: Send + Sync {
    fn upsert(&self, rating: Rating) -> Result<Rating, RepositoryError>;
    fn find(
        &self,
        citizen: &CitizenId,
        leader: &LeaderId,
    ) -> Result<Option<Rating>, RepositoryError>;
    fn for_leader(&self, leader: &LeaderId) -> Result<Vec<Rating>, RepositoryError>;
}

/// A comment as handed to the repository, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub leader_id: LeaderId,
    pub author_id: CitizenId,
    pub body: String,
    pub parent_id: Option<CommentId>,
    pub created_at: DateTime<Utc>,
}

/// Append-only comment persistence plus the moderation-only hidden flag.
pub trait CommentRepository: Send + Sync {
    /// Store the comment, assigning the next monotonically increasing id.
    fn append(&self, comment: NewComment) -> Result<Comment, RepositoryError>;
    fn fetch(&self, id: &CommentId) -> Result<Option<Comment>, RepositoryError>;
    /// Every comment for the leader, hidden included, ordered by
    /// (created_at, id).
    fn for_leader(&self, leader: &LeaderId) -> Result<Vec<Comment>, RepositoryError>;
    /// Idempotent; `NotFound` for an unknown id.
    fn set_hidden(&self, id: &CommentId, hidden: bool) -> Result<(), RepositoryError>;
}

/// Identity collaborator. The HTTP layer resolves an explicit citizen token
/// through this store and hands the profile to the core; the core never reads
/// ambient auth state itself.
pub trait ProfileStore: Send + Sync {
    fn fetch(&self, id: &CitizenId) -> Result<Option<CitizenProfile>, RepositoryError>;
}
