mod common;

use common::{document, reviewer, row_count, seed_workload, user};
use reviewdesk_core::db::open_db_in_memory;
use reviewdesk_core::{
    Availability, CatalogService, DocumentStatus, ErrorKind, PanelService,
    ServiceError, UserId, UserRole,
};
use std::collections::HashSet;
use uuid::Uuid;

fn panel_ids(panel: &reviewdesk_core::PanelAssignment) -> Vec<UserId> {
    panel.reviewers.iter().map(|r| r.reviewer_id).collect()
}

#[test]
fn assign_panel_seats_three_distinct_reviewers_and_marks_document_assigned() {
    let mut conn = open_db_in_memory().unwrap();
    for name in ["rev1", "rev2", "rev3", "rev4"] {
        reviewer(&mut conn, name, &[]);
    }
    let doc = document(&mut conn, "Doc", None);

    let panel = PanelService::new(&mut conn).assign_panel(doc.id).unwrap();

    assert_eq!(panel.document_id, doc.id);
    assert_eq!(panel.reviewers.len(), 3);
    let distinct: HashSet<UserId> = panel_ids(&panel).into_iter().collect();
    assert_eq!(distinct.len(), 3);
    assert!(panel.reviewers.iter().all(|r| r.workload_before < 10));
    assert!(panel.reviewers.iter().all(|r| r.email.ends_with("@example.com")));

    let stored = CatalogService::new(&mut conn)
        .get_document(doc.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, DocumentStatus::Assigned);
    assert_eq!(row_count(&conn, "assignments"), 3);
}

#[test]
fn reviewer_at_workload_cap_is_excluded() {
    let mut conn = open_db_in_memory().unwrap();
    let names = ["a_rev", "b_rev", "c_rev", "d_rev", "e_rev"];
    let workloads = [0, 2, 5, 9, 10];
    let mut ids = Vec::new();
    for (name, workload) in names.iter().zip(workloads) {
        let created = reviewer(&mut conn, name, &[]);
        seed_workload(&conn, created.id, workload, "assigned");
        ids.push(created.id);
    }
    let doc = document(&mut conn, "Doc", None);

    let panel = PanelService::new(&mut conn).assign_panel(doc.id).unwrap();

    assert!(!panel_ids(&panel).contains(&ids[4]));
    assert_eq!(panel_ids(&panel), vec![ids[0], ids[1], ids[2]]);
    let before: Vec<u32> = panel.reviewers.iter().map(|r| r.workload_before).collect();
    assert_eq!(before, vec![0, 2, 5]);
}

#[test]
fn reviewing_assignments_count_toward_workload_but_completed_do_not() {
    let mut conn = open_db_in_memory().unwrap();
    let busy_reviewing = reviewer(&mut conn, "reviewing_rev", &[]);
    seed_workload(&conn, busy_reviewing.id, 10, "reviewing");
    let veteran = reviewer(&mut conn, "veteran_rev", &[]);
    seed_workload(&conn, veteran.id, 25, "completed");
    reviewer(&mut conn, "rev1", &[]);
    reviewer(&mut conn, "rev2", &[]);
    let doc = document(&mut conn, "Doc", None);

    let panel = PanelService::new(&mut conn).assign_panel(doc.id).unwrap();

    let ids = panel_ids(&panel);
    assert!(!ids.contains(&busy_reviewing.id));
    assert!(ids.contains(&veteran.id));
}

#[test]
fn exact_expertise_match_scores_full_subject_match() {
    let mut conn = open_db_in_memory().unwrap();
    let expert = reviewer(&mut conn, "expert", &["NLP", "ML"]);
    reviewer(&mut conn, "rev1", &["Databases"]);
    reviewer(&mut conn, "rev2", &[]);
    let doc = document(&mut conn, "Doc", Some("NLP"));

    let panel = PanelService::new(&mut conn).assign_panel(doc.id).unwrap();

    assert_eq!(panel.reviewers[0].reviewer_id, expert.id);
    assert_eq!(panel.reviewers[0].score.subject_match, 1.0);
    assert!(panel.reviewers[1..]
        .iter()
        .all(|r| r.score.subject_match == 0.5));
}

#[test]
fn substring_match_is_case_sensitive() {
    let mut conn = open_db_in_memory().unwrap();
    let substring = reviewer(&mut conn, "substring", &["NLP"]);
    let lowercase = reviewer(&mut conn, "lowercase", &["nlp"]);
    reviewer(&mut conn, "rev1", &[]);
    let doc = document(&mut conn, "Doc", Some("Applied NLP"));

    let panel = PanelService::new(&mut conn).assign_panel(doc.id).unwrap();

    let score_of = |id: UserId| {
        panel
            .reviewers
            .iter()
            .find(|r| r.reviewer_id == id)
            .map(|r| r.score.subject_match)
            .unwrap()
    };
    assert_eq!(score_of(substring.id), 0.8);
    assert_eq!(score_of(lowercase.id), 0.5);
    assert_eq!(panel.reviewers[0].reviewer_id, substring.id);
}

#[test]
fn equal_priority_is_broken_by_ascending_reviewer_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut ids = Vec::new();
    for name in ["rev1", "rev2", "rev3", "rev4", "rev5"] {
        let created = reviewer(&mut conn, name, &[]);
        seed_workload(&conn, created.id, 3, "assigned");
        ids.push(created.id);
    }
    ids.sort();
    let doc = document(&mut conn, "Doc", None);

    let panel = PanelService::new(&mut conn).assign_panel(doc.id).unwrap();

    assert_eq!(panel_ids(&panel), ids[..3].to_vec());
    let priorities: Vec<f64> = panel.reviewers.iter().map(|r| r.score.priority).collect();
    assert!(priorities.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn insufficient_reviewers_creates_no_assignments() {
    let mut conn = open_db_in_memory().unwrap();
    reviewer(&mut conn, "rev1", &[]);
    reviewer(&mut conn, "rev2", &[]);
    user(&mut conn, "busy_rev", UserRole::Reviewer, &[], Availability::Busy);
    user(&mut conn, "away_rev", UserRole::Reviewer, &[], Availability::Vacation);
    user(&mut conn, "writer", UserRole::Author, &[], Availability::Active);
    user(&mut conn, "boss", UserRole::Admin, &[], Availability::Active);
    let doc = document(&mut conn, "Doc", None);

    let err = PanelService::new(&mut conn).assign_panel(doc.id).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InsufficientReviewers {
            required: 3,
            eligible: 2
        }
    ));
    assert_eq!(err.kind(), ErrorKind::InsufficientResources);
    assert_eq!(row_count(&conn, "assignments"), 0);
    let stored = CatalogService::new(&mut conn)
        .get_document(doc.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, DocumentStatus::Pending);
}

#[test]
fn capped_reviewers_do_not_count_as_eligible() {
    let mut conn = open_db_in_memory().unwrap();
    reviewer(&mut conn, "rev1", &[]);
    reviewer(&mut conn, "rev2", &[]);
    let capped = reviewer(&mut conn, "capped", &[]);
    seed_workload(&conn, capped.id, 10, "assigned");
    let doc = document(&mut conn, "Doc", None);
    let before = row_count(&conn, "assignments");

    let err = PanelService::new(&mut conn).assign_panel(doc.id).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InsufficientReviewers { eligible: 2, .. }
    ));
    assert_eq!(row_count(&conn, "assignments"), before);
}

#[test]
fn unknown_document_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    for name in ["rev1", "rev2", "rev3"] {
        reviewer(&mut conn, name, &[]);
    }

    let err = PanelService::new(&mut conn)
        .assign_panel(Uuid::new_v4())
        .unwrap_err();

    assert!(matches!(err, ServiceError::DocumentNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn reassigning_a_document_is_a_conflict() {
    let mut conn = open_db_in_memory().unwrap();
    for name in ["rev1", "rev2", "rev3", "rev4", "rev5", "rev6"] {
        reviewer(&mut conn, name, &[]);
    }
    let doc = document(&mut conn, "Doc", None);
    let mut panels = PanelService::new(&mut conn);
    panels.assign_panel(doc.id).unwrap();

    let err = panels.assign_panel(doc.id).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::DocumentAlreadyAssigned {
            status: DocumentStatus::Assigned,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(row_count(&conn, "assignments"), 3);
}

#[test]
fn panel_never_seats_fewer_than_three() {
    let mut conn = open_db_in_memory().unwrap();
    for name in ["rev1", "rev2"] {
        reviewer(&mut conn, name, &[]);
    }
    let doc = document(&mut conn, "Doc", None);

    let err = PanelService::new(&mut conn).assign_panel(doc.id).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InsufficientReviewers {
            required: 3,
            eligible: 2
        }
    ));
    assert_eq!(row_count(&conn, "assignments"), 0);
}

#[test]
fn new_assignments_raise_workload_for_the_next_panel() {
    let mut conn = open_db_in_memory().unwrap();
    for name in ["rev1", "rev2", "rev3", "rev4"] {
        reviewer(&mut conn, name, &[]);
    }
    let first = document(&mut conn, "First", None);
    let second = document(&mut conn, "Second", None);
    let mut panels = PanelService::new(&mut conn);

    let first_panel = panels.assign_panel(first.id).unwrap();
    let second_panel = panels.assign_panel(second.id).unwrap();

    let rested = second_panel.reviewers[0].reviewer_id;
    assert!(!panel_ids(&first_panel).contains(&rested));
    assert_eq!(second_panel.reviewers[0].workload_before, 0);
    assert!(second_panel.reviewers[1..]
        .iter()
        .all(|r| r.workload_before == 1));
}
