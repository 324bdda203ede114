mod common;

use common::{assigned_document, document, reviewer, submission, user};
use reviewdesk_core::db::open_db_in_memory;
use reviewdesk_core::{
    Availability, DocumentStatus, ReviewService, ScoreBand, StatsService, UserRole,
};

#[test]
fn empty_store_reports_zeroes() {
    let conn = open_db_in_memory().unwrap();

    let stats = StatsService::new(&conn).statistics().unwrap();

    assert_eq!(stats.basic.total_documents, 0);
    assert_eq!(stats.basic.total_reviews, 0);
    assert_eq!(stats.progress.len(), 4);
    assert!(stats.progress.values().all(|count| *count == 0));
    assert!(stats.reviewer_workload.is_empty());
    assert_eq!(stats.score_distribution.total(), 0);
}

#[test]
fn statistics_aggregate_documents_workload_and_scores() {
    let mut conn = open_db_in_memory().unwrap();
    for name in ["rev1", "rev2", "rev3"] {
        reviewer(&mut conn, name, &[]);
    }
    user(&mut conn, "boss", UserRole::Admin, &[], Availability::Active);
    let (_, first_panel) = assigned_document(&mut conn, "First");
    let (_, second_panel) = assigned_document(&mut conn, "Second");
    document(&mut conn, "Waiting", None);

    let mut reviews = ReviewService::new(&mut conn);
    let first_scores = [
        submission(28, 20, 22, 18),
        submission(30, 25, 25, 20),
        submission(10, 10, 10, 10),
    ];
    for (seat, scores) in first_panel.reviewers.iter().zip(&first_scores) {
        reviews
            .submit_review(seat.assignment_id, seat.reviewer_id, scores)
            .unwrap();
    }
    let seat = &second_panel.reviewers[0];
    reviews
        .submit_review(seat.assignment_id, seat.reviewer_id, &submission(20, 20, 20, 15))
        .unwrap();

    let stats = StatsService::new(&conn).statistics().unwrap();

    assert_eq!(stats.basic.total_documents, 3);
    assert_eq!(stats.basic.completed_documents, 1);
    assert_eq!(stats.basic.total_reviewers, 3);
    assert_eq!(stats.basic.total_reviews, 4);
    assert_eq!(stats.progress[&DocumentStatus::Pending], 1);
    assert_eq!(stats.progress[&DocumentStatus::Assigned], 0);
    assert_eq!(stats.progress[&DocumentStatus::Reviewing], 1);
    assert_eq!(stats.progress[&DocumentStatus::Completed], 1);

    assert_eq!(stats.reviewer_workload.len(), 3);
    let open: u32 = stats
        .reviewer_workload
        .iter()
        .map(|r| r.current_assignments)
        .sum();
    let completed: u32 = stats
        .reviewer_workload
        .iter()
        .map(|r| r.completed_reviews)
        .sum();
    assert_eq!(open, 2);
    assert_eq!(completed, 4);
    assert!(stats.reviewer_workload.iter().all(|r| r.total_assignments == 2));

    let distribution = &stats.score_distribution;
    assert_eq!(distribution.count(ScoreBand::From90To100), 1);
    assert_eq!(distribution.count(ScoreBand::From80To89), 1);
    assert_eq!(distribution.count(ScoreBand::From70To79), 1);
    assert_eq!(distribution.count(ScoreBand::From60To69), 0);
    assert_eq!(distribution.count(ScoreBand::Below60), 1);
    assert_eq!(distribution.total(), stats.basic.total_reviews);
}

#[test]
fn statistics_serialize_with_histogram_labels() {
    let mut conn = open_db_in_memory().unwrap();
    for name in ["rev1", "rev2", "rev3"] {
        reviewer(&mut conn, name, &[]);
    }
    let (_, panel) = assigned_document(&mut conn, "Doc");
    let seat = &panel.reviewers[0];
    ReviewService::new(&mut conn)
        .submit_review(seat.assignment_id, seat.reviewer_id, &submission(28, 20, 22, 18))
        .unwrap();

    let stats = StatsService::new(&conn).statistics().unwrap();
    let json = serde_json::to_value(&stats).unwrap();

    assert_eq!(json["score_distribution"]["80-89"], 1);
    assert_eq!(json["score_distribution"]["90-100"], 0);
    assert_eq!(json["progress"]["reviewing"], 1);
    assert_eq!(json["basic"]["total_reviews"], 1);
}
