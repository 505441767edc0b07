use std::sync::Arc;

use serde::Serialize;

use super::comments::{CommentError, CommentNode, CommentThread};
use super::domain::{CitizenId, CitizenProfile, Feedback, FeedbackReceipt, Leader, LeaderId};
use super::hierarchy::AdministrativeHierarchy;
use super::moderation::{ModerationDesk, ModerationError};
use super::ratings::{RatingError, RatingLedger};
use super::repository::{
    CommentRepository, LeaderDirectory, RatingRepository, RepositoryError,
};
use super::resolver::LeaderResolver;

/// Error raised by the civic service facade.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("leader {0} not found")]
    LeaderNotFound(LeaderId),
    #[error("location selection is not a valid county/constituency/ward path")]
    InvalidLocation,
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Comment(#[from] CommentError),
    #[error(transparent)]
    Moderation(#[from] ModerationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Public page payload for one leader: profile, aggregate score, and the
/// citizen-visible thread.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderPageView {
    pub leader: Leader,
    pub average: Option<f64>,
    pub rating_count: usize,
    pub thread: Vec<CommentNode>,
}

/// Facade composing the hierarchy, resolver, rating ledger, comment threads,
/// and moderation desk behind shared repositories.
pub struct CivicService<L, R, C> {
    hierarchy: Arc<AdministrativeHierarchy>,
    directory: Arc<L>,
    resolver: LeaderResolver<L>,
    ratings: RatingLedger<R>,
    comments: CommentThread<C>,
    moderation: ModerationDesk<L, R, C>,
}

impl<L, R, C> CivicService<L, R, C>
where
    L: LeaderDirectory,
    R: RatingRepository,
    C: CommentRepository,
{
    pub fn new(
        hierarchy: Arc<AdministrativeHierarchy>,
        directory: Arc<L>,
        ratings: Arc<R>,
        comments: Arc<C>,
    ) -> Self {
        Self {
            hierarchy,
            directory: directory.clone(),
            resolver: LeaderResolver::new(directory.clone()),
            ratings: RatingLedger::new(ratings.clone()),
            comments: CommentThread::new(comments.clone()),
            moderation: ModerationDesk::new(directory, ratings, comments),
        }
    }

    pub fn hierarchy(&self) -> &AdministrativeHierarchy {
        &self.hierarchy
    }

    pub fn moderation(&self) -> &ModerationDesk<L, R, C> {
        &self.moderation
    }

    /// Resolve the ordered leader list for a citizen. The stored location is
    /// re-validated against the hierarchy first so an orphaned child
    /// selection never reaches the resolver.
    pub fn resolve_leaders(&self, profile: &CitizenProfile) -> Result<Vec<Leader>, EngineError> {
        if let Some(county) = &profile.county_id {
            let valid = self.hierarchy.validate_path(
                county,
                profile.constituency_id.as_ref(),
                profile.ward_id.as_ref(),
            );
            if !valid {
                return Err(EngineError::InvalidLocation);
            }
        } else if profile.constituency_id.is_some() || profile.ward_id.is_some() {
            return Err(EngineError::InvalidLocation);
        }

        Ok(self.resolver.resolve(profile)?)
    }

    /// Everything the public leader page needs; `LeaderNotFound` when the id
    /// is unknown, since a single entity was requested explicitly.
    pub fn leader_page(&self, id: &LeaderId) -> Result<LeaderPageView, EngineError> {
        let leader = self
            .directory
            .fetch(id)?
            .ok_or_else(|| EngineError::LeaderNotFound(id.clone()))?;

        let summary = self.ratings.summary_for(id)?;
        let thread = self.comments.list_public(id)?;

        Ok(LeaderPageView {
            leader,
            average: summary.average.mean(),
            rating_count: summary.count,
            thread,
        })
    }

    /// Route a tagged feedback submission: reviews go to the rating ledger,
    /// discussions to the comment thread.
    pub fn submit_feedback(
        &self,
        author: &CitizenProfile,
        leader_id: &LeaderId,
        feedback: Feedback,
    ) -> Result<FeedbackReceipt, EngineError> {
        if self.directory.fetch(leader_id)?.is_none() {
            return Err(EngineError::LeaderNotFound(leader_id.clone()));
        }

        match feedback {
            Feedback::Review { score } => {
                let rating =
                    self.ratings
                        .submit(author.id.clone(), leader_id.clone(), score)?;
                Ok(FeedbackReceipt::Review {
                    score: rating.score,
                })
            }
            Feedback::Discussion { body, parent_id } => {
                let comment = self.comments.post(
                    leader_id.clone(),
                    author.id.clone(),
                    &body,
                    parent_id,
                )?;
                Ok(FeedbackReceipt::Discussion {
                    comment_id: comment.id,
                })
            }
        }
    }

    pub fn has_rated(
        &self,
        citizen: &CitizenId,
        leader: &LeaderId,
    ) -> Result<bool, EngineError> {
        Ok(self.ratings.has_rated(citizen, leader)?)
    }
}
