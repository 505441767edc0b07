use super::common::*;
use crate::civics::domain::{CitizenProfile, Position};
use crate::civics::service::EngineError;

#[test]
fn fully_located_citizen_gets_all_four_tiers_in_order() {
    let (service, _, _, _) = build_service();
    let leaders = service
        .resolve_leaders(&located_citizen())
        .expect("resolution succeeds");

    let positions: Vec<Position> = leaders.iter().map(|l| l.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::President,
            Position::Governor,
            Position::Senator,
            Position::WomenRep,
            Position::Mp,
            Position::Mca,
        ]
    );
    assert_eq!(leaders[1].id, leader_id("l-governor-nairobi"));
    assert_eq!(leaders[4].id, leader_id("l-mp-westlands"));
    assert_eq!(leaders[5].id, leader_id("l-mca-parklands"));
}

#[test]
fn missing_ward_drops_only_the_mca() {
    let (service, _, _, _) = build_service();
    let mut profile = located_citizen();
    profile.ward_id = None;

    let leaders = service.resolve_leaders(&profile).expect("resolution");
    assert!(leaders.iter().all(|l| l.position != Position::Mca));
    assert!(leaders.iter().any(|l| l.position == Position::Mp));
}

#[test]
fn unset_county_skips_every_located_tier() {
    let (service, _, _, _) = build_service();
    let profile = CitizenProfile::new(citizen_id("cit-newcomer"));

    let leaders = service.resolve_leaders(&profile).expect("resolution");
    assert_eq!(leaders.len(), 1);
    assert_eq!(leaders[0].position, Position::President);
}

#[test]
fn exactly_one_president_regardless_of_location_completeness() {
    let (service, _, _, _) = build_service();
    for profile in [
        CitizenProfile::new(citizen_id("cit-a")),
        located_citizen(),
    ] {
        let leaders = service.resolve_leaders(&profile).expect("resolution");
        let presidents = leaders
            .iter()
            .filter(|l| l.position == Position::President)
            .count();
        assert_eq!(presidents, 1);
    }
}

#[test]
fn unknown_location_ids_degrade_to_partial_results() {
    let (service, _, _, _) = build_service();
    let mut profile = CitizenProfile::new(citizen_id("cit-b"));
    profile.county_id = Some(county_id("c-kiambu"));
    profile.constituency_id = Some(constituency_id("cn-kabete"));

    // Kabete has no registered MP in the fixture; the step is skipped.
    let leaders = service.resolve_leaders(&profile).expect("resolution");
    let positions: Vec<Position> = leaders.iter().map(|l| l.position).collect();
    assert_eq!(positions, vec![Position::President, Position::Governor]);
}

#[test]
fn orphaned_stored_selection_is_rejected_before_resolution() {
    let (service, _, _, _) = build_service();
    let mut profile = located_citizen();
    // Ward kept from a previous county selection.
    profile.county_id = Some(county_id("c-kiambu"));
    profile.constituency_id = None;

    assert!(matches!(
        service.resolve_leaders(&profile),
        Err(EngineError::InvalidLocation)
    ));
}

#[test]
fn no_leader_appears_twice() {
    let (service, _, _, _) = build_service();
    let leaders = service
        .resolve_leaders(&located_citizen())
        .expect("resolution");
    let mut ids: Vec<_> = leaders.iter().map(|l| l.id.clone()).collect();
    ids.sort_by(|a, b| a.0.cmp(&b.0));
    ids.dedup();
    assert_eq!(ids.len(), leaders.len());
}
