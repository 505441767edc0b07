use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::civics::domain::{
    CitizenId, CitizenProfile, Comment, CommentId, ConstituencyId, CountyId, Jurisdiction, Leader,
    LeaderId, Position, Rating, WardId,
};
use crate::civics::hierarchy::{AdministrativeHierarchy, Constituency, County, Ward};
use crate::civics::repository::{
    CommentRepository, LeaderDirectory, LeaderFilter, NewComment, ProfileStore, RatingRepository,
    RepositoryError,
};
use crate::civics::router::civic_router;
use crate::civics::service::CivicService;

pub(super) fn county_id(raw: &str) -> CountyId {
    CountyId(raw.to_string())
}

pub(super) fn constituency_id(raw: &str) -> ConstituencyId {
    ConstituencyId(raw.to_string())
}

pub(super) fn ward_id(raw: &str) -> WardId {
    WardId(raw.to_string())
}

pub(super) fn leader_id(raw: &str) -> LeaderId {
    LeaderId(raw.to_string())
}

pub(super) fn citizen_id(raw: &str) -> CitizenId {
    CitizenId(raw.to_string())
}

/// Two counties, two constituencies, two wards; enough to exercise cascades
/// and cross-county filters.
pub(super) fn sample_hierarchy() -> AdministrativeHierarchy {
    AdministrativeHierarchy::new(
        vec![
            County {
                id: county_id("c-nairobi"),
                name: "Nairobi".to_string(),
            },
            County {
                id: county_id("c-kiambu"),
                name: "Kiambu".to_string(),
            },
        ],
        vec![
            Constituency {
                id: constituency_id("cn-westlands"),
                name: "Westlands".to_string(),
                county_id: county_id("c-nairobi"),
            },
            Constituency {
                id: constituency_id("cn-kabete"),
                name: "Kabete".to_string(),
                county_id: county_id("c-kiambu"),
            },
        ],
        vec![
            Ward {
                id: ward_id("w-parklands"),
                name: "Parklands".to_string(),
                constituency_id: constituency_id("cn-westlands"),
            },
            Ward {
                id: ward_id("w-kitisuru"),
                name: "Kitisuru".to_string(),
                constituency_id: constituency_id("cn-westlands"),
            },
        ],
    )
    .expect("sample hierarchy is well formed")
}

fn leader(raw_id: &str, name: &str, position: Position, jurisdiction: Jurisdiction) -> Leader {
    Leader::new(leader_id(raw_id), name, position, jurisdiction)
        .expect("fixture jurisdiction matches position tier")
}

pub(super) fn sample_leaders() -> Vec<Leader> {
    vec![
        leader(
            "l-president",
            "S. Okello",
            Position::President,
            Jurisdiction::Nationwide,
        ),
        leader(
            "l-governor-nairobi",
            "A. Mwangi",
            Position::Governor,
            Jurisdiction::County(county_id("c-nairobi")),
        ),
        leader(
            "l-senator-nairobi",
            "J. Wanjiru",
            Position::Senator,
            Jurisdiction::County(county_id("c-nairobi")),
        ),
        leader(
            "l-womenrep-nairobi",
            "E. Achieng",
            Position::WomenRep,
            Jurisdiction::County(county_id("c-nairobi")),
        ),
        leader(
            "l-governor-kiambu",
            "P. Njoroge",
            Position::Governor,
            Jurisdiction::County(county_id("c-kiambu")),
        ),
        leader(
            "l-mp-westlands",
            "T. Kamau",
            Position::Mp,
            Jurisdiction::Constituency(constituency_id("cn-westlands")),
        ),
        leader(
            "l-mca-parklands",
            "N. Odhiambo",
            Position::Mca,
            Jurisdiction::Ward(ward_id("w-parklands")),
        ),
    ]
}

/// Citizen fully located in Nairobi / Westlands / Parklands.
pub(super) fn located_citizen() -> CitizenProfile {
    let mut profile = CitizenProfile::new(citizen_id("cit-wanjiku"));
    profile.county_id = Some(county_id("c-nairobi"));
    profile.constituency_id = Some(constituency_id("cn-westlands"));
    profile.ward_id = Some(ward_id("w-parklands"));
    profile
}

pub(super) fn admin() -> CitizenProfile {
    let mut profile = CitizenProfile::new(citizen_id("adm-otieno"));
    profile.is_admin = true;
    profile
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    leaders: Vec<Leader>,
}

impl MemoryDirectory {
    pub(super) fn with_leaders(leaders: Vec<Leader>) -> Self {
        Self { leaders }
    }
}

impl LeaderDirectory for MemoryDirectory {
    fn fetch(&self, id: &LeaderId) -> Result<Option<Leader>, RepositoryError> {
        Ok(self.leaders.iter().find(|l| &l.id == id).cloned())
    }

    fn nationwide(&self) -> Result<Vec<Leader>, RepositoryError> {
        Ok(self
            .leaders
            .iter()
            .filter(|l| l.jurisdiction == Jurisdiction::Nationwide)
            .cloned()
            .collect())
    }

    fn for_county(&self, county: &CountyId) -> Result<Vec<Leader>, RepositoryError> {
        Ok(self
            .leaders
            .iter()
            .filter(|l| l.jurisdiction == Jurisdiction::County(county.clone()))
            .cloned()
            .collect())
    }

    fn for_constituency(
        &self,
        constituency: &ConstituencyId,
    ) -> Result<Option<Leader>, RepositoryError> {
        Ok(self
            .leaders
            .iter()
            .find(|l| l.jurisdiction == Jurisdiction::Constituency(constituency.clone()))
            .cloned())
    }

    fn for_ward(&self, ward: &WardId) -> Result<Option<Leader>, RepositoryError> {
        Ok(self
            .leaders
            .iter()
            .find(|l| l.jurisdiction == Jurisdiction::Ward(ward.clone()))
            .cloned())
    }

    fn filtered(&self, filter: &LeaderFilter) -> Result<Vec<Leader>, RepositoryError> {
        Ok(self
            .leaders
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryRatings {
    rows: Mutex<HashMap<(CitizenId, LeaderId), Rating>>,
}

impl RatingRepository for MemoryRatings {
    fn upsert(&self, rating: Rating) -> Result<Rating, RepositoryError> {
        let mut guard = self.rows.lock().expect("rating mutex poisoned");
        guard.insert(
            (rating.citizen_id.clone(), rating.leader_id.clone()),
            rating.clone(),
        );
        Ok(rating)
    }

    fn find(
        &self,
        citizen: &CitizenId,
        leader: &LeaderId,
    ) -> Result<Option<Rating>, RepositoryError> {
        let guard = self.rows.lock().expect("rating mutex poisoned");
        Ok(guard.get(&(citizen.clone(), leader.clone())).cloned())
    }

    fn for_leader(&self, leader: &LeaderId) -> Result<Vec<Rating>, RepositoryError> {
        let guard = self.rows.lock().expect("rating mutex poisoned");
        Ok(guard
            .values()
            .filter(|rating| &rating.leader_id == leader)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryComments {
    rows: Mutex<Vec<Comment>>,
    next_id: Mutex<u64>,
}

impl CommentRepository for MemoryComments {
    fn append(&self, comment: NewComment) -> Result<Comment, RepositoryError> {
        let mut next_id = self.next_id.lock().expect("sequence mutex poisoned");
        *next_id += 1;
        let stored = Comment {
            id: CommentId(*next_id),
            leader_id: comment.leader_id,
            author_id: comment.author_id,
            body: comment.body,
            parent_id: comment.parent_id,
            hidden: false,
            created_at: comment.created_at,
        };
        self.rows
            .lock()
            .expect("comment mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: &CommentId) -> Result<Option<Comment>, RepositoryError> {
        let guard = self.rows.lock().expect("comment mutex poisoned");
        Ok(guard.iter().find(|c| &c.id == id).cloned())
    }

    fn for_leader(&self, leader: &LeaderId) -> Result<Vec<Comment>, RepositoryError> {
        let guard = self.rows.lock().expect("comment mutex poisoned");
        Ok(guard
            .iter()
            .filter(|c| &c.leader_id == leader)
            .cloned()
            .collect())
    }

    fn set_hidden(&self, id: &CommentId, hidden: bool) -> Result<(), RepositoryError> {
        let mut guard = self.rows.lock().expect("comment mutex poisoned");
        match guard.iter_mut().find(|c| &c.id == id) {
            Some(comment) => {
                comment.hidden = hidden;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    rows: Mutex<HashMap<CitizenId, CitizenProfile>>,
}

impl MemoryProfiles {
    pub(super) fn insert(&self, profile: CitizenProfile) {
        self.rows
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.id.clone(), profile);
    }
}

impl ProfileStore for MemoryProfiles {
    fn fetch(&self, id: &CitizenId) -> Result<Option<CitizenProfile>, RepositoryError> {
        let guard = self.rows.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) type TestService = CivicService<MemoryDirectory, MemoryRatings, MemoryComments>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryDirectory>,
    Arc<MemoryRatings>,
    Arc<MemoryComments>,
) {
    let directory = Arc::new(MemoryDirectory::with_leaders(sample_leaders()));
    let ratings = Arc::new(MemoryRatings::default());
    let comments = Arc::new(MemoryComments::default());
    let service = Arc::new(CivicService::new(
        Arc::new(sample_hierarchy()),
        directory.clone(),
        ratings.clone(),
        comments.clone(),
    ));
    (service, directory, ratings, comments)
}

pub(super) fn build_router() -> (axum::Router, Arc<MemoryProfiles>) {
    let (service, _, _, _) = build_service();
    let profiles = Arc::new(MemoryProfiles::default());
    profiles.insert(located_citizen());
    profiles.insert(admin());
    (civic_router(service, profiles.clone()), profiles)
}
