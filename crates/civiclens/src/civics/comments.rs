use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::domain::{CitizenId, Comment, CommentId, LeaderId};
use super::repository::{CommentRepository, NewComment, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("comment body is empty")]
    EmptyBody,
    #[error("comment {0} is not a valid parent for this thread")]
    InvalidParent(CommentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A top-level comment with its replies, both oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Two-level discussion threads per leader over a [`CommentRepository`].
pub struct CommentThread<C> {
    repository: Arc<C>,
}

impl<C: CommentRepository> CommentThread<C> {
    pub fn new(repository: Arc<C>) -> Self {
        Self { repository }
    }

    /// Append a comment or reply. A parent must exist, be top-level, and
    /// belong to the same leader; anything else is `InvalidParent`.
    pub fn post(
        &self,
        leader_id: LeaderId,
        author_id: CitizenId,
        body: &str,
        parent_id: Option<CommentId>,
    ) -> Result<Comment, CommentError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(CommentError::EmptyBody);
        }

        if let Some(parent_id) = parent_id {
            let parent = self
                .repository
                .fetch(&parent_id)?
                .ok_or(CommentError::InvalidParent(parent_id))?;
            if parent.is_reply() || parent.leader_id != leader_id {
                return Err(CommentError::InvalidParent(parent_id));
            }
        }

        Ok(self.repository.append(NewComment {
            leader_id,
            author_id,
            body: trimmed.to_string(),
            parent_id,
            created_at: Utc::now(),
        })?)
    }

    /// Citizen-facing view: hidden comments are omitted entirely, and a
    /// hidden parent takes its replies with it.
    pub fn list_public(&self, leader: &LeaderId) -> Result<Vec<CommentNode>, CommentError> {
        self.assemble(leader, false)
    }

    /// Moderation view: same shape, hidden entries included and flagged by
    /// their `hidden` field.
    pub fn list_for_moderation(
        &self,
        leader: &LeaderId,
    ) -> Result<Vec<CommentNode>, CommentError> {
        self.assemble(leader, true)
    }

    pub fn set_hidden(&self, id: &CommentId, hidden: bool) -> Result<(), CommentError> {
        Ok(self.repository.set_hidden(id, hidden)?)
    }

    fn assemble(
        &self,
        leader: &LeaderId,
        include_hidden: bool,
    ) -> Result<Vec<CommentNode>, CommentError> {
        let mut comments = self.repository.for_leader(leader)?;
        comments.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

        let (parents, replies): (Vec<Comment>, Vec<Comment>) =
            comments.into_iter().partition(|c| !c.is_reply());

        let mut nodes = Vec::with_capacity(parents.len());
        for parent in parents {
            if parent.hidden && !include_hidden {
                continue;
            }
            let replies = replies
                .iter()
                .filter(|reply| reply.parent_id == Some(parent.id))
                .filter(|reply| include_hidden || !reply.hidden)
                .cloned()
                .collect();
            nodes.push(CommentNode {
                comment: parent,
                replies,
            });
        }
        Ok(nodes)
    }
}
