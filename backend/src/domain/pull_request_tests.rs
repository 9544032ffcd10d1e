//! Tests for the pull request aggregate.

use chrono::TimeZone;
use rstest::{fixture, rstest};

use super::*;

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn open_pr() -> PullRequest {
    PullRequest::open(
        PullRequestId::new("pr-1").expect("valid id"),
        PullRequestName::new("fix parser").expect("valid name"),
        uid("a"),
        vec![uid("b"), uid("c")],
        at(1),
    )
    .expect("valid pull request")
}

#[rstest]
fn open_starts_without_merge_timestamp(open_pr: PullRequest) {
    assert_eq!(open_pr.status(), PullRequestStatus::Open);
    assert_eq!(open_pr.merged_at(), None);
    assert_eq!(open_pr.revision(), 0);
}

#[rstest]
#[case(vec!["b", "c", "d"])]
#[case(vec!["b", "b"])]
#[case(vec!["a"])]
fn open_rejects_invalid_reviewer_sets(#[case] reviewers: Vec<&str>) {
    let result = PullRequest::open(
        PullRequestId::new("pr-1").expect("valid id"),
        PullRequestName::new("fix").expect("valid name"),
        uid("a"),
        reviewers.into_iter().map(uid).collect(),
        at(1),
    );
    assert!(result.is_err());
}

#[rstest]
fn merge_is_idempotent_and_keeps_first_timestamp(mut open_pr: PullRequest) {
    assert_eq!(open_pr.merge(at(2)), MergeOutcome::Merged);
    let after_first = open_pr.clone();

    assert_eq!(open_pr.merge(at(5)), MergeOutcome::AlreadyMerged);
    assert_eq!(open_pr, after_first);
    assert_eq!(open_pr.merged_at(), Some(at(2)));
}

#[rstest]
fn replace_reviewer_keeps_other_slot(mut open_pr: PullRequest) {
    let slot = open_pr
        .replace_reviewer(&uid("b"), uid("d"))
        .expect("replacement succeeds");

    assert_eq!(slot, 0);
    assert_eq!(open_pr.reviewers().as_slice(), &[uid("d"), uid("c")]);
}

#[rstest]
fn replace_reviewer_rejects_merged(mut open_pr: PullRequest) {
    open_pr.merge(at(2));
    let err = open_pr
        .replace_reviewer(&uid("b"), uid("d"))
        .expect_err("merged pull requests are frozen");
    assert_eq!(err, ReviewerChangeError::Merged);
    assert_eq!(open_pr.reviewers().as_slice(), &[uid("b"), uid("c")]);
}

#[rstest]
#[case("z", "d")]
#[case("b", "c")]
#[case("b", "a")]
fn replace_reviewer_rejects_bad_swaps(
    mut open_pr: PullRequest,
    #[case] old: &str,
    #[case] new: &str,
) {
    let before = open_pr.clone();
    assert!(open_pr.replace_reviewer(&uid(old), uid(new)).is_err());
    assert_eq!(open_pr, before);
}

#[rstest]
fn snapshot_requires_merge_timestamp_to_match_status() {
    let snapshot = PullRequestSnapshot {
        id: PullRequestId::new("pr-1").expect("valid id"),
        name: PullRequestName::new("fix").expect("valid name"),
        author_id: uid("a"),
        status: PullRequestStatus::Merged,
        reviewers: Vec::new(),
        created_at: at(1),
        merged_at: None,
        revision: 3,
    };
    assert_eq!(
        PullRequest::from_snapshot(snapshot),
        Err(PullRequestValidationError::MergedAtMismatch)
    );
}

#[rstest]
#[case("OPEN", PullRequestStatus::Open)]
#[case("MERGED", PullRequestStatus::Merged)]
fn status_parses_storage_strings(#[case] raw: &str, #[case] expected: PullRequestStatus) {
    assert_eq!(raw.parse::<PullRequestStatus>(), Ok(expected));
    assert_eq!(expected.as_str(), raw);
}

#[rstest]
fn status_rejects_unknown_strings() {
    assert!("CLOSED".parse::<PullRequestStatus>().is_err());
}
