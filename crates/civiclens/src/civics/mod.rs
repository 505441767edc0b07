//! Representative resolution, rating, and moderated discussion.
//!
//! Leaf-first: [`hierarchy`] holds the fixed county/constituency/ward tree,
//! [`resolver`] maps a citizen's location to the leaders covering it,
//! [`ratings`] and [`comments`] keep the per-leader feedback, and
//! [`moderation`] is the admin-side composition of the same stores. The
//! [`service`] facade wires them together; [`router`] exposes the facade over
//! HTTP.

pub mod comments;
pub mod domain;
pub mod hierarchy;
pub mod moderation;
pub mod ratings;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use comments::{CommentError, CommentNode, CommentThread};
pub use domain::{
    CitizenId, CitizenProfile, Comment, CommentId, ConstituencyId, CountyId, Feedback,
    FeedbackReceipt, Jurisdiction, JurisdictionMismatch, JurisdictionTier, Leader, LeaderId,
    Position, Rating, WardId,
};
pub use hierarchy::{
    AdministrativeHierarchy, Constituency, County, HierarchyError, LocationSelection, Ward,
};
pub use moderation::{ExportRow, LeaderStats, ModeratedComment, ModerationDesk, ModerationError};
pub use ratings::{AverageScore, RatingError, RatingLedger, RatingSummary, MAX_SCORE, MIN_SCORE};
pub use repository::{
    CommentRepository, LeaderDirectory, LeaderFilter, NewComment, ProfileStore, RatingRepository,
    RepositoryError,
};
pub use resolver::LeaderResolver;
pub use router::{civic_router, CivicRouterState, CITIZEN_HEADER};
pub use service::{CivicService, EngineError, LeaderPageView};
