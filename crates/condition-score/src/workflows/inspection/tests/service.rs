use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::common::*;
use crate::workflows::inspection::domain::{MediaHandle, ObservationKey, ScoringError, Severity};
use crate::workflows::inspection::instance::{InspectionError, InspectionId, InspectionStatus};
use crate::workflows::inspection::repository::{InspectionRepository, RepositoryError};
use crate::workflows::inspection::sampling::SampleSizeTable;
use crate::workflows::inspection::scoring::ScoringPolicy;
use crate::workflows::inspection::service::{InspectionService, InspectionServiceError};

#[test]
fn start_resolves_sample_size_and_persists() {
    let (service, repository) = build_service();

    let inspection = service.start(request(100)).expect("inspection starts");

    assert_eq!(inspection.total_units(), 100);
    assert_eq!(inspection.sample_size(), 10);
    assert_eq!(inspection.status(), InspectionStatus::InProgress);
    assert!(inspection.id().0.starts_with("insp-"));
    let stored = repository
        .fetch(inspection.id())
        .expect("fetch succeeds")
        .expect("inspection stored");
    assert_eq!(stored, inspection);
}

#[test]
fn small_property_inspects_every_unit() {
    let (service, _) = build_service();
    let inspection = service.start(request(4)).expect("inspection starts");
    assert_eq!(inspection.sample_size(), 4);
}

#[test]
fn zero_unit_property_is_rejected() {
    let (service, _) = build_service();
    let error = service.start(request(0)).expect_err("zero units rejected");
    assert!(matches!(
        error,
        InspectionServiceError::Inspection(InspectionError::Scoring(
            ScoringError::InvalidPopulationSize { total_units: 0, .. }
        ))
    ));
}

#[test]
fn recorded_occurrences_flow_into_the_score() {
    let (service, _) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");
    let id = inspection.id().clone();

    assert_eq!(service.record_occurrence(&id, plumbing_leak(2), 1).unwrap(), 1);
    assert_eq!(service.record_occurrence(&id, plumbing_leak(2), 1).unwrap(), 2);
    assert_eq!(service.record_occurrence(&id, plumbing_leak(2), -1).unwrap(), 1);

    let report = service.score(&id).expect("score computes");
    assert_eq!(report.interior_score, Decimal::from(25));
    assert!(report.pass);
}

#[test]
fn unknown_catalog_key_is_rejected_before_touching_the_ledger() {
    let (service, _) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");
    let bogus = ObservationKey::unit(1, UNITS, 0, Severity::Low, 0);

    let error = service
        .record_occurrence(inspection.id(), bogus, 1)
        .expect_err("bogus key rejected");

    assert!(matches!(
        error,
        InspectionServiceError::Scoring(ScoringError::DanglingDefectReference { .. })
    ));
    let stored = service.get(inspection.id()).expect("still stored");
    assert!(stored.ledger().is_empty());
}

#[test]
fn units_outside_the_sample_are_rejected() {
    let (service, _) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");

    let error = service
        .record_occurrence(inspection.id(), plumbing_leak(11), 1)
        .expect_err("unit 11 is not sampled");

    assert_eq!(
        error.to_string(),
        InspectionError::UnitOutsideSample {
            unit: 11,
            sample_size: 10
        }
        .to_string()
    );
}

#[test]
fn notes_and_media_are_kept_without_occurrences() {
    let (service, _) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");
    let id = inspection.id().clone();

    service
        .set_note(&id, fence_holes(), "north side".to_string())
        .expect("note stored");
    service
        .attach_media(&id, fence_holes(), MediaHandle("photos/fence-1.jpg".to_string()))
        .expect("media stored");

    let stored = service.get(&id).expect("fetch");
    let entry = stored.ledger().get(&fence_holes()).expect("entry kept");
    assert_eq!(entry.count, 0);
    assert_eq!(entry.note.as_deref(), Some("north side"));
    assert_eq!(entry.media.len(), 1);
    assert_eq!(service.score(&id).expect("score").final_score, Decimal::ONE_HUNDRED);
}

#[test]
fn completion_freezes_the_inspection() {
    let (service, _) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");
    let id = inspection.id().clone();
    service
        .record_occurrence(&id, exposed_wires(), 1)
        .expect("recorded");

    let completed_on = NaiveDate::from_ymd_opt(2025, 10, 3).expect("valid date");
    let report = service.complete(&id, completed_on).expect("completes");
    assert!(!report.pass);
    assert_eq!(report.critical_findings.len(), 1);

    let stored = service.get(&id).expect("fetch");
    assert_eq!(stored.status(), InspectionStatus::Completed);
    assert_eq!(stored.completed_on(), Some(completed_on));

    let error = service
        .record_occurrence(&id, fence_holes(), 1)
        .expect_err("completed inspection is read-only");
    assert!(matches!(
        error,
        InspectionServiceError::Inspection(InspectionError::Completed(_))
    ));
    let error = service
        .complete(&id, completed_on)
        .expect_err("cannot complete twice");
    assert!(matches!(
        error,
        InspectionServiceError::Inspection(InspectionError::Completed(_))
    ));
}

#[test]
fn missing_inspection_reports_not_found() {
    let (service, _) = build_service();
    let error = service
        .score(&InspectionId("insp-missing".to_string()))
        .expect_err("missing inspection");
    assert!(matches!(
        error,
        InspectionServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn repository_outage_surfaces_as_repository_error() {
    let service = InspectionService::new(
        Arc::new(UnavailableRepository),
        Arc::new(catalog()),
        ScoringPolicy::default(),
        SampleSizeTable::standard(),
    );

    let error = service.start(request(20)).expect_err("repository offline");
    assert!(matches!(
        error,
        InspectionServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn list_returns_started_inspections() {
    let (service, _) = build_service();
    let first = service.start(request(12)).expect("first");
    let second = service.start(request(30)).expect("second");

    let listed = service.list(10).expect("list");
    let ids: Vec<&InspectionId> = listed.iter().map(|inspection| inspection.id()).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
    assert_eq!(service.list(1).expect("limited").len(), 1);
}

#[test]
fn report_includes_view_and_findings() {
    let (service, _) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");
    let id = inspection.id().clone();
    service
        .record_occurrence(&id, exhaust_fan(1), 2)
        .expect("recorded");

    let report = service.report(&id).expect("report builds");
    assert_eq!(report.inspection.id, id);
    assert_eq!(report.inspection.recorded_defects, 1);
    assert_eq!(report.findings[0].points, Decimal::new(260, 2));
}

#[test]
fn dangling_entries_can_be_counted_down_after_a_catalog_change() {
    let (service, repository) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");
    let id = inspection.id().clone();
    service
        .record_occurrence(&id, exposed_wires(), 1)
        .expect("recorded");
    service
        .set_note(&id, exposed_wires(), "panel cover missing".to_string())
        .expect("note stored");

    let mut trimmed = catalog();
    trimmed.categories[SITE].items.truncate(1);
    let service = InspectionService::new(
        Arc::new(repository),
        Arc::new(trimmed),
        ScoringPolicy::default(),
        ten_unit_table(),
    );

    assert!(matches!(
        service.score(&id),
        Err(InspectionServiceError::Scoring(
            ScoringError::DanglingDefectReference { .. }
        ))
    ));
    assert!(matches!(
        service.record_occurrence(&id, exposed_wires(), 1),
        Err(InspectionServiceError::Scoring(
            ScoringError::DanglingDefectReference { .. }
        ))
    ));

    assert_eq!(
        service
            .record_occurrence(&id, exposed_wires(), -1)
            .expect("decrement bypasses the catalog"),
        0
    );
    let report = service.score(&id).expect("zero count no longer resolves");
    assert_eq!(report.final_score, Decimal::ONE_HUNDRED);

    service
        .set_note(&id, exposed_wires(), String::new())
        .expect("clearing a note bypasses the catalog");
    let stored = service.get(&id).expect("fetch");
    assert!(stored.ledger().get(&exposed_wires()).is_none());
}

#[test]
fn concurrent_edits_on_different_keys_are_all_kept() {
    let (service, _) = build_service();
    let inspection = service.start(request(100)).expect("inspection starts");
    let id = inspection.id().clone();

    std::thread::scope(|scope| {
        for unit in 1..=10 {
            let service = &service;
            let id = &id;
            scope.spawn(move || {
                for _ in 0..20 {
                    service
                        .record_occurrence(id, plumbing_leak(unit), 1)
                        .expect("recorded");
                }
            });
        }
    });

    let stored = service.get(&id).expect("fetch");
    for unit in 1..=10 {
        assert_eq!(stored.ledger().count(&plumbing_leak(unit)), 20);
    }
}
