use crate::domain::model::{MeetingEvent, MeetingEventOption, MeetingId, Slot, User};
use crate::domain::ports::{MeetingEventRepository, Repository, UserRepository};
use crate::domain::schemas::{MeetingForm, OptionForm};
use crate::utils::error::{DomainError, Result, SchedulerError};
use crate::utils::validation::Validate;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct MeetingSchedulerService {
    meetings: Arc<dyn MeetingEventRepository>,
    users: Arc<dyn UserRepository>,
    // 讀取-修改-儲存的流程需要序列化，避免同時投票時遺失更新
    write_lock: Mutex<()>,
}

impl MeetingSchedulerService {
    pub fn new(meetings: Arc<dyn MeetingEventRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            meetings,
            users,
            write_lock: Mutex::new(()),
        }
    }

    /// 排定會議。主辦人與所有參與者都必須是已註冊使用者，
    /// 找不到的 username 會一次全部列出，且不會寫入任何資料。
    pub async fn schedule(
        &self,
        name: &str,
        organizer: &str,
        attendees: &BTreeSet<String>,
        options: &[OptionForm],
    ) -> Result<MeetingEvent> {
        let mut requested: BTreeSet<&str> = attendees.iter().map(String::as_str).collect();
        requested.insert(organizer);

        let all_users = self.users.find_all().await?;
        let missing: Vec<String> = requested
            .iter()
            .filter(|username| !all_users.iter().any(|u| u.has_username(username)))
            .map(|username| username.to_string())
            .collect();

        if !missing.is_empty() {
            tracing::warn!("Cannot schedule '{}', unknown users: {:?}", name, missing);
            return Err(SchedulerError::UserNotFound { usernames: missing });
        }

        let find = |username: &str| -> Option<User> {
            all_users.iter().find(|u| u.has_username(username)).cloned()
        };
        let owner = find(organizer).ok_or_else(|| SchedulerError::UserNotFound {
            usernames: vec![organizer.to_string()],
        })?;
        let guests: Vec<User> = attendees.iter().filter_map(|a| find(a.as_str())).collect();

        let options = options
            .iter()
            .map(|o| Slot::new(o.date, o.hour).map(MeetingEventOption::new))
            .collect::<Result<Vec<_>>>()?;

        let meeting = MeetingEvent::new(name, owner, guests, options);
        self.meetings.save(meeting.clone()).await?;

        tracing::info!(
            "📅 Scheduled '{}' ({}) with {} attendees and {} options",
            meeting.name,
            meeting.id,
            meeting.attendees().len(),
            meeting.options().len()
        );

        Ok(meeting)
    }

    pub async fn schedule_form(&self, form: &MeetingForm) -> Result<MeetingEvent> {
        form.validate()?;
        self.schedule(&form.name, &form.organizer, &form.attendees, &form.options)
            .await
    }

    pub async fn meetings(&self) -> Result<Vec<MeetingEvent>> {
        self.meetings.find_all().await
    }

    pub async fn meeting(&self, meeting_id: MeetingId) -> Result<MeetingEvent> {
        tracing::debug!("Looking up meeting {}", meeting_id);
        self.meetings
            .find_by_id(meeting_id)
            .await?
            .ok_or_else(|| SchedulerError::MeetingNotFound {
                id: meeting_id.to_string(),
            })
    }

    async fn user(&self, username: &str) -> Result<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| SchedulerError::UserNotFound {
                usernames: vec![username.to_string()],
            })
    }

    pub async fn vote(
        &self,
        meeting_id: MeetingId,
        username: &str,
        date: NaiveDate,
        hour: u8,
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut meeting = self.meeting(meeting_id).await?;
        let user = self.user(username).await?;

        meeting.vote_at(&user, date, hour).map_err(|e| {
            tracing::warn!("Vote by '{}' on {} rejected: {}", username, meeting_id, e);
            SchedulerError::from(e)
        })?;

        self.meetings.save(meeting).await?;
        tracing::info!(
            "🗳️ '{}' voted for {} {:02}:00 on {}",
            username,
            date,
            hour,
            meeting_id
        );
        Ok(())
    }

    /// 切換投票狀態，回傳切換後是否開放投票
    pub async fn toggle_voting(
        &self,
        meeting_id: MeetingId,
        username: &str,
        voting: Option<bool>,
    ) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut meeting = self.meeting(meeting_id).await?;

        let open = meeting.toggle_voting(username, voting).map_err(|e| {
            tracing::warn!("Toggle by '{}' on {} rejected: {}", username, meeting_id, e);
            SchedulerError::from(e)
        })?;

        self.meetings.save(meeting).await?;
        tracing::info!("Voting on {} is now {}", meeting_id, if open { "open" } else { "closed" });
        Ok(open)
    }

    /// 由主辦人結束投票，回傳最後選定的時間
    pub async fn close_voting(
        &self,
        meeting_id: MeetingId,
        username: &str,
    ) -> Result<Option<NaiveDateTime>> {
        let _guard = self.write_lock.lock().await;

        let mut meeting = self.meeting(meeting_id).await?;

        if !meeting.is_organizer(username) {
            tracing::warn!("Close by '{}' on {} rejected", username, meeting_id);
            return Err(SchedulerError::from(DomainError::IllegalUser {
                message: "Only the owner of the event can close the voting.".to_string(),
            }));
        }

        let voted_date = meeting.close_voting();
        self.meetings.save(meeting).await?;

        match voted_date {
            Some(date) => tracing::info!("✅ Voting on {} closed, selected {}", meeting_id, date),
            None => tracing::info!("Voting on {} closed without options", meeting_id),
        }
        Ok(voted_date)
    }
}
