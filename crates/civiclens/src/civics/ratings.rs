use std::sync::Arc;

use chrono::Utc;

use super::domain::{CitizenId, LeaderId, Rating};
use super::repository::{RatingRepository, RepositoryError};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("score {value} is outside the accepted 1..=5 range")]
    InvalidScore { value: u8 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Mean score for a leader. The dedicated no-ratings arm keeps "nobody has
/// rated yet" distinct from an actual low score; it is a sentinel, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AverageScore {
    NoRatings,
    Mean(f64),
}

impl AverageScore {
    pub fn mean(self) -> Option<f64> {
        match self {
            AverageScore::NoRatings => None,
            AverageScore::Mean(value) => Some(value),
        }
    }
}

/// Average plus the count backing it, for moderation and page views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: AverageScore,
    pub count: usize,
}

/// One-rating-per-citizen ledger over a [`RatingRepository`].
pub struct RatingLedger<R> {
    repository: Arc<R>,
}

impl<R: RatingRepository> RatingLedger<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Insert-or-replace the citizen's rating for this leader. Last write
    /// wins; no history is retained.
    pub fn submit(
        &self,
        citizen_id: CitizenId,
        leader_id: LeaderId,
        score: u8,
    ) -> Result<Rating, RatingError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(RatingError::InvalidScore { value: score });
        }

        let rating = Rating {
            citizen_id,
            leader_id,
            score,
            created_at: Utc::now(),
        };
        Ok(self.repository.upsert(rating)?)
    }

    pub fn average_for(&self, leader: &LeaderId) -> Result<AverageScore, RatingError> {
        Ok(self.summary_for(leader)?.average)
    }

    pub fn summary_for(&self, leader: &LeaderId) -> Result<RatingSummary, RatingError> {
        let ratings = self.repository.for_leader(leader)?;
        if ratings.is_empty() {
            return Ok(RatingSummary {
                average: AverageScore::NoRatings,
                count: 0,
            });
        }

        let sum: u32 = ratings.iter().map(|rating| u32::from(rating.score)).sum();
        Ok(RatingSummary {
            average: AverageScore::Mean(f64::from(sum) / ratings.len() as f64),
            count: ratings.len(),
        })
    }

    /// Gate for the review form: one scored review per citizen per leader.
    pub fn has_rated(&self, citizen: &CitizenId, leader: &LeaderId) -> Result<bool, RatingError> {
        Ok(self.repository.find(citizen, leader)?.is_some())
    }
}
