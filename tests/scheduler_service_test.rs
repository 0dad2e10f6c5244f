use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use meet_scheduler::domain::model::User;
use meet_scheduler::domain::ports::Repository;
use meet_scheduler::domain::schemas::{MeetingForm, OptionForm};
use meet_scheduler::{
    InMemoryMeetingEventRepository, InMemoryUserRepository, MeetingSchedulerService,
    SchedulerError,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn user(name: &str) -> User {
    User::new(name, format!("{}@example.com", name), "hash".to_string())
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn option(s: &str, hour: u8) -> OptionForm {
    OptionForm { date: date(s), hour }
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn setup(names: &[&str]) -> (Arc<MeetingSchedulerService>, Arc<InMemoryMeetingEventRepository>) {
    let users = Arc::new(InMemoryUserRepository::with_items(
        names.iter().map(|n| user(n)).collect(),
    ));
    let meetings = Arc::new(InMemoryMeetingEventRepository::new());
    let service = Arc::new(MeetingSchedulerService::new(meetings.clone(), users));
    (service, meetings)
}

#[tokio::test]
async fn test_a_meeting_can_be_scheduled() -> Result<()> {
    let (service, meetings) = setup(&["user1"]);

    let meeting = service
        .schedule("A Meeting", "user1", &set(&["user1"]), &[option("2021-01-01", 10)])
        .await?;

    assert_eq!(meeting.name, "A Meeting");
    assert_eq!(meeting.attendees().len(), 1);
    assert!(meeting.is_organizer("user1"));
    assert!(meeting.is_voting_open());
    assert_eq!(meetings.find_all().await?, vec![meeting]);

    Ok(())
}

#[tokio::test]
async fn test_a_meeting_cannot_be_scheduled_with_invalid_attendees() -> Result<()> {
    let (service, meetings) = setup(&["user1"]);

    let err = service
        .schedule("A Meeting", "user1", &set(&["user2", "user3"]), &[option("2021-01-01", 10)])
        .await
        .unwrap_err();

    match err {
        SchedulerError::UserNotFound { usernames } => assert_eq!(usernames, vec!["user2", "user3"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(meetings.find_all().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_a_meeting_can_be_voted_for_scheduling() -> Result<()> {
    let (service, _) = setup(&["user1", "user2"]);
    let meeting = service
        .schedule(
            "A Meeting",
            "user1",
            &set(&["user2"]),
            &[option("2021-01-01", 10), option("2021-01-02", 10)],
        )
        .await?;

    service.vote(meeting.id, "user1", date("2021-01-01"), 10).await?;
    service.vote(meeting.id, "user2", date("2021-01-01"), 10).await?;

    let stored = service.meeting(meeting.id).await?;
    let votes: Vec<&str> = stored.options()[0]
        .votes
        .iter()
        .map(|u| u.username.as_str())
        .collect();
    assert_eq!(votes, vec!["user1", "user2"]);
    assert!(stored.options()[1].votes.is_empty());

    let voted = service.close_voting(meeting.id, "user1").await?;
    let expected: NaiveDateTime = "2021-01-01T10:00:00".parse()?;
    assert_eq!(voted, Some(expected));
    assert_eq!(service.meeting(meeting.id).await?.voted_date(), Some(expected));

    Ok(())
}

#[tokio::test]
async fn test_non_attendee_cannot_vote() -> Result<()> {
    let (service, _) = setup(&["user1", "outsider"]);
    let meeting = service
        .schedule("A Meeting", "user1", &BTreeSet::new(), &[option("2021-01-01", 10)])
        .await?;

    let err = service
        .vote(meeting.id, "outsider", date("2021-01-01"), 10)
        .await
        .unwrap_err();

    assert!(matches!(err, SchedulerError::ForbiddenOperation { .. }));
    assert_eq!(err.status_code(), 403);
    assert!(service.meeting(meeting.id).await?.options()[0].votes.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_vote_for_unknown_option_or_user() -> Result<()> {
    let (service, _) = setup(&["user1"]);
    let meeting = service
        .schedule("A Meeting", "user1", &BTreeSet::new(), &[option("2021-01-01", 10)])
        .await?;

    let err = service
        .vote(meeting.id, "user1", date("2021-01-01"), 11)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("is not an option for this event"));

    let err = service
        .vote(meeting.id, "ghost", date("2021-01-01"), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::UserNotFound { .. }));

    Ok(())
}

#[tokio::test]
async fn test_vote_for_out_of_range_hour_checks_attendee_first() -> Result<()> {
    let (service, _) = setup(&["user1", "outsider"]);
    let meeting = service
        .schedule("A Meeting", "user1", &BTreeSet::new(), &[option("2021-01-01", 10)])
        .await?;

    let err = service
        .vote(meeting.id, "outsider", date("2021-01-01"), 24)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert!(err.to_string().contains("not an attendee"));

    let err = service
        .vote(meeting.id, "user1", date("2021-01-01"), 24)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert!(err.to_string().contains("is not an option for this event"));

    Ok(())
}

#[tokio::test]
async fn test_toggle_voting() -> Result<()> {
    let (service, _) = setup(&["user1", "user2"]);
    let meeting = service
        .schedule("A Meeting", "user1", &set(&["user2"]), &[option("2021-01-01", 10)])
        .await?;

    let err = service
        .toggle_voting(meeting.id, "user2", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::ForbiddenOperation { .. }));

    assert!(!service.toggle_voting(meeting.id, "user1", None).await?);
    assert!(!service.meeting(meeting.id).await?.is_voting_open());

    let err = service
        .vote(meeting.id, "user2", date("2021-01-01"), 10)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Voting is closed."));

    assert!(service.toggle_voting(meeting.id, "user1", Some(true)).await?);
    assert!(service.toggle_voting(meeting.id, "user1", Some(true)).await?);
    service.vote(meeting.id, "user2", date("2021-01-01"), 10).await?;

    Ok(())
}

#[tokio::test]
async fn test_only_organizer_can_close_voting() -> Result<()> {
    let (service, _) = setup(&["user1", "user2"]);
    let meeting = service
        .schedule("A Meeting", "user1", &set(&["user2"]), &[option("2021-01-01", 10)])
        .await?;

    let err = service.close_voting(meeting.id, "user2").await.unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert!(service.meeting(meeting.id).await?.is_voting_open());

    Ok(())
}

#[tokio::test]
async fn test_schedule_form_validates_input() -> Result<()> {
    let (service, _) = setup(&["user1"]);
    let form = MeetingForm {
        name: "  ".to_string(),
        organizer: "user1".to_string(),
        attendees: BTreeSet::new(),
        options: vec![option("2021-01-01", 10)],
    };

    let err = service.schedule_form(&form).await.unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert!(service.meetings().await?.is_empty());

    Ok(())
}

/// 同時投票不會遺失任何一票
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_are_not_lost() -> Result<()> {
    let names: Vec<String> = (0..20).map(|i| format!("user{}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (service, _) = setup(&name_refs);

    let meeting = service
        .schedule(
            "Busy",
            "user0",
            &names.iter().cloned().collect::<BTreeSet<String>>(),
            &[option("2021-01-01", 10)],
        )
        .await?;

    let mut handles = Vec::new();
    for name in names.clone() {
        let service = service.clone();
        let id = meeting.id;
        handles.push(tokio::spawn(async move {
            service.vote(id, &name, "2021-01-01".parse().unwrap(), 10).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let stored = service.meeting(meeting.id).await?;
    assert_eq!(stored.options()[0].votes.len(), names.len());

    Ok(())
}
