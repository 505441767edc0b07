use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;

use civiclens::civics::{
    AdministrativeHierarchy, CitizenId, CitizenProfile, CivicService, Comment, CommentId,
    CommentRepository, Constituency, ConstituencyId, County, CountyId, Jurisdiction, Leader,
    LeaderDirectory, LeaderFilter, LeaderId, NewComment, Position, ProfileStore, Rating,
    RatingRepository, RepositoryError, Ward, WardId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fixed leader register. The set is reference data loaded at startup; only
/// ratings and comments mutate at runtime.
pub(crate) struct InMemoryLeaderDirectory {
    leaders: Vec<Leader>,
}

impl InMemoryLeaderDirectory {
    pub(crate) fn new(leaders: Vec<Leader>) -> Self {
        Self { leaders }
    }
}

impl LeaderDirectory for InMemoryLeaderDirectory {
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
pub(crate) struct InMemoryRatingRepository {
    rows: Mutex<HashMap<(CitizenId, LeaderId), Rating>>,
}

impl RatingRepository for InMemoryRatingRepository {
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
pub(crate) struct InMemoryCommentRepository {
    rows: Mutex<Vec<Comment>>,
    next_id: Mutex<u64>,
}

impl CommentRepository for InMemoryCommentRepository {
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
pub(crate) struct InMemoryProfileStore {
    rows: Mutex<HashMap<CitizenId, CitizenProfile>>,
}

impl InMemoryProfileStore {
    pub(crate) fn insert(&self, profile: CitizenProfile) {
        self.rows
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.id.clone(), profile);
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch(&self, id: &CitizenId) -> Result<Option<CitizenProfile>, RepositoryError> {
        let guard = self.rows.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(crate) type InMemoryCivicService =
    CivicService<InMemoryLeaderDirectory, InMemoryRatingRepository, InMemoryCommentRepository>;

fn county_id(raw: &str) -> CountyId {
    CountyId(raw.to_string())
}

fn constituency_id(raw: &str) -> ConstituencyId {
    ConstituencyId(raw.to_string())
}

fn ward_id(raw: &str) -> WardId {
    WardId(raw.to_string())
}

/// Built-in reference tree used when no seed file is configured.
pub(crate) fn sample_hierarchy() -> AdministrativeHierarchy {
    AdministrativeHierarchy::new(
        vec![
            County {
                id: county_id("047"),
                name: "Nairobi".to_string(),
            },
            County {
                id: county_id("001"),
                name: "Mombasa".to_string(),
            },
        ],
        vec![
            Constituency {
                id: constituency_id("047-westlands"),
                name: "Westlands".to_string(),
                county_id: county_id("047"),
            },
            Constituency {
                id: constituency_id("047-dagoretti-north"),
                name: "Dagoretti North".to_string(),
                county_id: county_id("047"),
            },
            Constituency {
                id: constituency_id("001-nyali"),
                name: "Nyali".to_string(),
                county_id: county_id("001"),
            },
        ],
        vec![
            Ward {
                id: ward_id("047-parklands"),
                name: "Parklands/Highridge".to_string(),
                constituency_id: constituency_id("047-westlands"),
            },
            Ward {
                id: ward_id("047-kitisuru"),
                name: "Kitisuru".to_string(),
                constituency_id: constituency_id("047-westlands"),
            },
            Ward {
                id: ward_id("047-kilimani"),
                name: "Kilimani".to_string(),
                constituency_id: constituency_id("047-dagoretti-north"),
            },
            Ward {
                id: ward_id("001-frere-town"),
                name: "Frere Town".to_string(),
                constituency_id: constituency_id("001-nyali"),
            },
        ],
    )
    .expect("built-in reference tree is well formed")
}

fn leader(raw_id: &str, name: &str, position: Position, jurisdiction: Jurisdiction) -> Leader {
    Leader::new(LeaderId(raw_id.to_string()), name, position, jurisdiction)
        .expect("built-in leader jurisdiction matches position tier")
}

pub(crate) fn sample_leaders() -> Vec<Leader> {
    vec![
        leader(
            "ldr-president",
            "Samuel Okello",
            Position::President,
            Jurisdiction::Nationwide,
        ),
        leader(
            "ldr-gov-nairobi",
            "Agnes Mwangi",
            Position::Governor,
            Jurisdiction::County(county_id("047")),
        ),
        leader(
            "ldr-sen-nairobi",
            "Josephine Wanjiru",
            Position::Senator,
            Jurisdiction::County(county_id("047")),
        ),
        leader(
            "ldr-wr-nairobi",
            "Esther Achieng",
            Position::WomenRep,
            Jurisdiction::County(county_id("047")),
        ),
        leader(
            "ldr-gov-mombasa",
            "Fatuma Hassan",
            Position::Governor,
            Jurisdiction::County(county_id("001")),
        ),
        leader(
            "ldr-mp-westlands",
            "Timothy Kamau",
            Position::Mp,
            Jurisdiction::Constituency(constituency_id("047-westlands")),
        ),
        leader(
            "ldr-mp-nyali",
            "Khalid Baya",
            Position::Mp,
            Jurisdiction::Constituency(constituency_id("001-nyali")),
        ),
        leader(
            "ldr-mca-parklands",
            "Naomi Odhiambo",
            Position::Mca,
            Jurisdiction::Ward(ward_id("047-parklands")),
        ),
    ]
}

pub(crate) fn demo_citizen() -> CitizenProfile {
    let mut citizen = CitizenProfile::new(CitizenId("demo-citizen".to_string()));
    citizen.county_id = Some(county_id("047"));
    citizen.constituency_id = Some(constituency_id("047-westlands"));
    citizen.ward_id = Some(ward_id("047-parklands"));
    citizen
}

pub(crate) fn demo_admin() -> CitizenProfile {
    let mut admin = CitizenProfile::new(CitizenId("demo-admin".to_string()));
    admin.is_admin = true;
    admin
}

pub(crate) fn sample_profiles(profiles: &InMemoryProfileStore) {
    profiles.insert(demo_citizen());
    profiles.insert(demo_admin());
}

pub(crate) fn seeded_service(
    hierarchy: Arc<AdministrativeHierarchy>,
) -> (Arc<InMemoryCivicService>, Arc<InMemoryProfileStore>) {
    let directory = Arc::new(InMemoryLeaderDirectory::new(sample_leaders()));
    let ratings = Arc::new(InMemoryRatingRepository::default());
    let comments = Arc::new(InMemoryCommentRepository::default());
    let service = Arc::new(CivicService::new(hierarchy, directory, ratings, comments));

    let profiles = Arc::new(InMemoryProfileStore::default());
    sample_profiles(&profiles);

    (service, profiles)
}

pub(crate) fn parse_position(raw: &str) -> Result<Position, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "president" => Ok(Position::President),
        "governor" => Ok(Position::Governor),
        "senator" => Ok(Position::Senator),
        "women_rep" | "women-rep" | "womenrep" => Ok(Position::WomenRep),
        "mp" => Ok(Position::Mp),
        "mca" => Ok(Position::Mca),
        other => Err(format!(
            "unknown position '{other}', expected one of president, governor, senator, women_rep, mp, mca"
        )),
    }
}
