use std::collections::HashSet;
use std::sync::Arc;

use super::domain::{CitizenProfile, Leader};
use super::repository::{LeaderDirectory, RepositoryError};

/// Produces the ordered leader set covering a citizen's location.
///
/// Fixed tier order: nationwide, county, constituency, ward. Every step
/// degrades to "nothing found" on a missing id; an incomplete profile yields a
/// partial but valid list, never an error.
pub struct LeaderResolver<L> {
    directory: Arc<L>,
}

impl<L: LeaderDirectory> LeaderResolver<L> {
    pub fn new(directory: Arc<L>) -> Self {
        Self { directory }
    }

    pub fn resolve(&self, profile: &CitizenProfile) -> Result<Vec<Leader>, RepositoryError> {
        let mut leaders = self.directory.nationwide()?;

        if let Some(county) = &profile.county_id {
            leaders.extend(self.directory.for_county(county)?);

            if let Some(constituency) = &profile.constituency_id {
                if let Some(mp) = self.directory.for_constituency(constituency)? {
                    leaders.push(mp);
                }
            }

            if let Some(ward) = &profile.ward_id {
                if let Some(mca) = self.directory.for_ward(ward)? {
                    leaders.push(mca);
                }
            }
        }

        let mut seen = HashSet::new();
        leaders.retain(|leader| seen.insert(leader.id.clone()));
        Ok(leaders)
    }
}
