//! 進出系統邊界的資料格式。對外的使用者資料只包含 username 與 email。

use crate::domain::model::{MeetingEvent, MeetingEventOption, User};
use crate::utils::error::{Result, SchedulerError};
use crate::utils::validation::{
    validate_alphanumeric, validate_email, validate_min_length, validate_non_empty_string,
    validate_range, Validate, PASSWORD_MIN_LENGTH,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<()> {
        validate_alphanumeric("username", &self.username)?;
        validate_email("email", &self.email)?;
        validate_min_length("password1", &self.password1, PASSWORD_MIN_LENGTH)?;
        validate_min_length("password2", &self.password2, PASSWORD_MIN_LENGTH)?;
        if self.password1 != self.password2 {
            return Err(SchedulerError::validation("password2", "passwords do not match"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptionForm {
    pub date: NaiveDate,
    pub hour: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingForm {
    pub name: String,
    pub organizer: String,
    #[serde(default)]
    pub attendees: BTreeSet<String>,
    pub options: Vec<OptionForm>,
}

impl Validate for MeetingForm {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_alphanumeric("organizer", &self.organizer)?;
        for attendee in &self.attendees {
            validate_alphanumeric("attendees", attendee)?;
        }
        for option in &self.options {
            validate_range("options.hour", option.hour, 0, 23)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOut {
    pub username: String,
    pub email: String,
}

impl From<&User> for UserOut {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingOptionOut {
    pub date: NaiveDate,
    pub hour: u8,
    pub votes: Vec<UserOut>,
}

impl From<&MeetingEventOption> for MeetingOptionOut {
    fn from(option: &MeetingEventOption) -> Self {
        Self {
            date: option.slot.date(),
            hour: option.slot.hour(),
            votes: option.votes.iter().map(UserOut::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingEventOut {
    pub id: String,
    pub name: String,
    pub organizer: Option<UserOut>,
    pub attendees: Vec<UserOut>,
    pub options: Vec<MeetingOptionOut>,
    pub voted_date: Option<NaiveDateTime>,
    pub open_voting: bool,
}

impl From<&MeetingEvent> for MeetingEventOut {
    fn from(meeting: &MeetingEvent) -> Self {
        Self {
            id: meeting.id.to_string(),
            name: meeting.name.clone(),
            organizer: meeting.organizer().map(UserOut::from),
            attendees: meeting.attendees().iter().map(UserOut::from).collect(),
            options: meeting.options().iter().map(MeetingOptionOut::from).collect(),
            voted_date: meeting.voted_date(),
            open_voting: meeting.is_voting_open(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: T,
}

impl<T> Response<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
