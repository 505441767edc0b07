use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{CitizenProfile, ConstituencyId, CountyId, WardId};

/// Top administrative tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    pub id: CountyId,
    pub name: String,
}

/// Middle tier; every constituency belongs to exactly one county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituency {
    pub id: ConstituencyId,
    pub name: String,
    pub county_id: CountyId,
}

/// Leaf tier; every ward belongs to exactly one constituency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    pub id: WardId,
    pub name: String,
    pub constituency_id: ConstituencyId,
}

/// Raised while assembling reference data; never during lookups.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("duplicate administrative unit id '{0}'")]
    DuplicateId(String),
    #[error("constituency '{constituency}' references unknown county '{county}'")]
    UnknownCounty { constituency: String, county: String },
    #[error("ward '{ward}' references unknown constituency '{constituency}'")]
    UnknownConstituency { ward: String, constituency: String },
    #[error("failed to read hierarchy seed '{path}': {source}")]
    SeedIo {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse hierarchy seed '{path}': {source}")]
    SeedFormat {
        path: String,
        source: serde_json::Error,
    },
}

/// On-disk shape of the reference-data seed file.
#[derive(Debug, Deserialize)]
struct HierarchySeed {
    counties: Vec<County>,
    constituencies: Vec<Constituency>,
    wards: Vec<Ward>,
}

/// The fixed three-level county -> constituency -> ward tree.
///
/// Loaded once and treated as shared read-only state; all lookup methods are
/// pure. Unknown ids yield empty results rather than errors so callers can
/// cascade selects without special-casing.
#[derive(Debug, Clone)]
pub struct AdministrativeHierarchy {
    counties: Vec<County>,
    constituencies: Vec<Constituency>,
    wards: Vec<Ward>,
}

impl AdministrativeHierarchy {
    pub fn new(
        mut counties: Vec<County>,
        mut constituencies: Vec<Constituency>,
        mut wards: Vec<Ward>,
    ) -> Result<Self, HierarchyError> {
        let mut seen = HashSet::new();
        for county in &counties {
            if !seen.insert(county.id.0.clone()) {
                return Err(HierarchyError::DuplicateId(county.id.0.clone()));
            }
        }
        let county_ids: HashSet<&CountyId> = counties.iter().map(|c| &c.id).collect();
        for constituency in &constituencies {
            if !seen.insert(constituency.id.0.clone()) {
                return Err(HierarchyError::DuplicateId(constituency.id.0.clone()));
            }
            if !county_ids.contains(&constituency.county_id) {
                return Err(HierarchyError::UnknownCounty {
                    constituency: constituency.id.0.clone(),
                    county: constituency.county_id.0.clone(),
                });
            }
        }
        let constituency_ids: HashSet<&ConstituencyId> =
            constituencies.iter().map(|c| &c.id).collect();
        for ward in &wards {
            if !seen.insert(ward.id.0.clone()) {
                return Err(HierarchyError::DuplicateId(ward.id.0.clone()));
            }
            if !constituency_ids.contains(&ward.constituency_id) {
                return Err(HierarchyError::UnknownConstituency {
                    ward: ward.id.0.clone(),
                    constituency: ward.constituency_id.0.clone(),
                });
            }
        }

        counties.sort_by(|a, b| a.name.cmp(&b.name));
        constituencies.sort_by(|a, b| a.name.cmp(&b.name));
        wards.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            counties,
            constituencies,
            wards,
        })
    }

    pub fn from_seed_file(path: &Path) -> Result<Self, HierarchyError> {
        let bytes = std::fs::read(path).map_err(|source| HierarchyError::SeedIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_seed_slice(&bytes, &path.display().to_string())
    }

    pub fn from_seed_slice(bytes: &[u8], origin: &str) -> Result<Self, HierarchyError> {
        let seed: HierarchySeed =
            serde_json::from_slice(bytes).map_err(|source| HierarchyError::SeedFormat {
                path: origin.to_string(),
                source,
            })?;
        Self::new(seed.counties, seed.constituencies, seed.wards)
    }

    /// All counties, ordered by name.
    pub fn counties(&self) -> &[County] {
        &self.counties
    }

    /// Constituencies under one county, ordered by name. Unknown county: empty.
    pub fn constituencies_of(&self, county: &CountyId) -> Vec<&Constituency> {
        self.constituencies
            .iter()
            .filter(|c| &c.county_id == county)
            .collect()
    }

    /// Wards under one constituency, ordered by name. Unknown constituency: empty.
    pub fn wards_of(&self, constituency: &ConstituencyId) -> Vec<&Ward> {
        self.wards
            .iter()
            .filter(|w| &w.constituency_id == constituency)
            .collect()
    }

    pub fn county(&self, id: &CountyId) -> Option<&County> {
        self.counties.iter().find(|c| &c.id == id)
    }

    pub fn constituency(&self, id: &ConstituencyId) -> Option<&Constituency> {
        self.constituencies.iter().find(|c| &c.id == id)
    }

    pub fn ward(&self, id: &WardId) -> Option<&Ward> {
        self.wards.iter().find(|w| &w.id == id)
    }

    /// True iff every present level is a real descendant of the previous one.
    /// A ward without its constituency is an orphaned selection and fails.
    pub fn validate_path(
        &self,
        county: &CountyId,
        constituency: Option<&ConstituencyId>,
        ward: Option<&WardId>,
    ) -> bool {
        if self.county(county).is_none() {
            return false;
        }

        match (constituency, ward) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(constituency_id), ward) => {
                let Some(found) = self.constituency(constituency_id) else {
                    return false;
                };
                if &found.county_id != county {
                    return false;
                }
                match ward {
                    None => true,
                    Some(ward_id) => self
                        .ward(ward_id)
                        .is_some_and(|w| &w.constituency_id == constituency_id),
                }
            }
        }
    }
}

/// A citizen's in-progress location choice. Changing a parent always clears
/// its descendants, so an orphaned child selection can never reach the
/// resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSelection {
    pub county_id: Option<CountyId>,
    pub constituency_id: Option<ConstituencyId>,
    pub ward_id: Option<WardId>,
}

impl LocationSelection {
    pub fn select_county(&mut self, county: Option<CountyId>) {
        if self.county_id != county {
            self.constituency_id = None;
            self.ward_id = None;
        }
        self.county_id = county;
    }

    pub fn select_constituency(&mut self, constituency: Option<ConstituencyId>) {
        if self.constituency_id != constituency {
            self.ward_id = None;
        }
        self.constituency_id = constituency;
    }

    pub fn select_ward(&mut self, ward: Option<WardId>) {
        self.ward_id = ward;
    }

    pub fn is_valid(&self, hierarchy: &AdministrativeHierarchy) -> bool {
        match &self.county_id {
            None => self.constituency_id.is_none() && self.ward_id.is_none(),
            Some(county) => hierarchy.validate_path(
                county,
                self.constituency_id.as_ref(),
                self.ward_id.as_ref(),
            ),
        }
    }

    pub fn apply_to(&self, profile: &mut CitizenProfile) {
        profile.county_id = self.county_id.clone();
        profile.constituency_id = self.constituency_id.clone();
        profile.ward_id = self.ward_id.clone();
    }
}
