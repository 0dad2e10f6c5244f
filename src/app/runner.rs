use crate::config::{ActionConfig, ScenarioConfig};
use crate::core::registry::AppRegistry;
use crate::domain::model::MeetingId;
use crate::domain::ports::Repository;
use crate::domain::schemas::{MeetingEventOut, MeetingForm, RegisterForm, UserOut};
use crate::utils::error::{ErrorSeverity, Result, SchedulerError};
use serde::Serialize;
use std::collections::HashMap;

/// 單一步驟失敗的紀錄，不會中斷整個情境
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFailure {
    pub step: String,
    pub status_code: u16,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub users: Vec<UserOut>,
    pub meetings: Vec<MeetingEventOut>,
    pub failures: Vec<StepFailure>,
}

impl ScenarioReport {
    pub fn meeting(&self, name: &str) -> Option<&MeetingEventOut> {
        self.meetings.iter().find(|m| m.name == name)
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct ScenarioRunner {
    registry: AppRegistry,
}

impl ScenarioRunner {
    pub fn new(registry: AppRegistry) -> Self {
        Self { registry }
    }

    /// 依序執行：註冊使用者 → 排定會議 → 動作
    pub async fn run(&self, scenario: &ScenarioConfig) -> Result<ScenarioReport> {
        let mut failures = Vec::new();

        tracing::info!("Registering {} users...", scenario.users.len());
        let register = self.registry.register_service();
        for user in &scenario.users {
            let form = RegisterForm {
                username: user.username.clone(),
                email: user.email.clone(),
                password1: user.password.clone(),
                password2: user.password.clone(),
            };
            if let Err(e) = register.register_form(&form).await {
                record(&mut failures, format!("register {}", user.username), e)?;
            }
        }

        tracing::info!("Scheduling {} meetings...", scenario.meetings.len());
        let scheduler = self.registry.scheduler_service();
        let mut meeting_ids: HashMap<String, MeetingId> = HashMap::new();
        for meeting in &scenario.meetings {
            let form = MeetingForm {
                name: meeting.name.clone(),
                organizer: meeting.organizer.clone(),
                attendees: meeting.attendees.clone(),
                options: meeting.options.clone(),
            };
            match scheduler.schedule_form(&form).await {
                Ok(scheduled) => {
                    meeting_ids.insert(meeting.name.clone(), scheduled.id);
                }
                Err(e) => record(&mut failures, format!("schedule {}", meeting.name), e)?,
            }
        }

        tracing::info!("Running {} actions...", scenario.actions.len());
        for (index, action) in scenario.actions.iter().enumerate() {
            let step = format!("action #{} ({})", index + 1, describe(action));
            if let Err(e) = self.apply(&meeting_ids, action).await {
                record(&mut failures, step, e)?;
            }
        }

        let users = self
            .registry
            .user_repository()
            .find_all()
            .await?
            .iter()
            .map(UserOut::from)
            .collect();
        let meetings = scheduler
            .meetings()
            .await?
            .iter()
            .map(MeetingEventOut::from)
            .collect();

        if failures.is_empty() {
            tracing::info!("✅ Scenario completed without failures");
        } else {
            tracing::warn!("Scenario completed with {} failed steps", failures.len());
        }

        Ok(ScenarioReport {
            users,
            meetings,
            failures,
        })
    }

    async fn apply(
        &self,
        meeting_ids: &HashMap<String, MeetingId>,
        action: &ActionConfig,
    ) -> Result<()> {
        let meeting_id =
            meeting_ids
                .get(action.meeting())
                .copied()
                .ok_or_else(|| SchedulerError::MeetingNotFound {
                    id: action.meeting().to_string(),
                })?;
        let scheduler = self.registry.scheduler_service();

        match action {
            ActionConfig::Vote {
                username,
                date,
                hour,
                ..
            } => scheduler.vote(meeting_id, username, *date, *hour).await,
            ActionConfig::Toggle {
                username, voting, ..
            } => scheduler
                .toggle_voting(meeting_id, username, *voting)
                .await
                .map(|_| ()),
            ActionConfig::Close { username, .. } => scheduler
                .close_voting(meeting_id, username)
                .await
                .map(|_| ()),
        }
    }
}

fn describe(action: &ActionConfig) -> String {
    match action {
        ActionConfig::Vote {
            meeting,
            username,
            date,
            hour,
        } => format!("{} votes {} {:02}:00 on {}", username, date, hour, meeting),
        ActionConfig::Toggle {
            meeting, username, ..
        } => format!("{} toggles {}", username, meeting),
        ActionConfig::Close { meeting, username } => format!("{} closes {}", username, meeting),
    }
}

// 系統層級的錯誤照樣往上拋，其他的只記錄下來
fn record(failures: &mut Vec<StepFailure>, step: String, error: SchedulerError) -> Result<()> {
    if error.severity() == ErrorSeverity::Critical {
        return Err(error);
    }
    tracing::warn!("❌ {} failed: {}", step, error);
    failures.push(StepFailure {
        step,
        status_code: error.status_code(),
        message: error.to_string(),
    });
    Ok(())
}
