use crate::utils::error::{DomainError, Result, SchedulerError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(UserId);
uuid_id!(MeetingId);
uuid_id!(OptionId);

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// bcrypt 雜湊，永遠不是明文
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: String) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            password,
        }
    }

    pub fn has_username(&self, username: &str) -> bool {
        self.username == username
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

/// 一個提議的時段：日期加上整點
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    date: NaiveDate,
    hour: u8,
}

impl Slot {
    pub const MAX_HOUR: u8 = 23;

    pub fn new(date: NaiveDate, hour: u8) -> Result<Self> {
        if hour > Self::MAX_HOUR {
            return Err(SchedulerError::validation(
                "hour",
                format!("Hour {} must be between 0 and {}", hour, Self::MAX_HOUR),
            ));
        }
        Ok(Self { date, hour })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        // hour <= 23 is guaranteed by the constructor
        let time = NaiveTime::from_hms_opt(u32::from(self.hour), 0, 0).unwrap_or_default();
        self.date.and_time(time)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:00", self.date, self.hour)
    }
}

#[derive(Debug, Clone)]
pub struct MeetingEventOption {
    pub id: OptionId,
    pub slot: Slot,
    pub votes: Vec<User>,
}

impl MeetingEventOption {
    pub fn new(slot: Slot) -> Self {
        Self {
            id: OptionId::new(),
            slot,
            votes: Vec::new(),
        }
    }

    pub fn same_slot(&self, slot: &Slot) -> bool {
        self.slot == *slot
    }

    pub fn is_at(&self, date: NaiveDate, hour: u8) -> bool {
        self.slot.date == date && self.slot.hour == hour
    }

    pub fn vote(&mut self, attendee: User) {
        self.votes.push(attendee);
    }
}

impl PartialEq for MeetingEventOption {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MeetingEventOption {}

#[derive(Debug, Clone)]
pub struct MeetingEvent {
    pub id: MeetingId,
    pub name: String,
    pub organizer: UserId,
    attendees: Vec<User>,
    options: Vec<MeetingEventOption>,
    voted_date: Option<NaiveDateTime>,
    open_voting: bool,
}

impl MeetingEvent {
    /// 建立會議。主辦人一定是第一位參與者；重複的參與者與時段只保留第一個。
    pub fn new(
        name: impl Into<String>,
        organizer: User,
        attendees: impl IntoIterator<Item = User>,
        options: impl IntoIterator<Item = MeetingEventOption>,
    ) -> Self {
        let mut meeting = Self {
            id: MeetingId::new(),
            name: name.into(),
            organizer: organizer.id,
            attendees: Vec::new(),
            options: Vec::new(),
            voted_date: None,
            open_voting: true,
        };

        meeting.add_attendee(organizer);
        for attendee in attendees {
            meeting.add_attendee(attendee);
        }
        for option in options {
            if !meeting.options.iter().any(|o| o.same_slot(&option.slot)) {
                meeting.options.push(option);
            }
        }

        meeting
    }

    pub fn attendees(&self) -> &[User] {
        &self.attendees
    }

    pub fn options(&self) -> &[MeetingEventOption] {
        &self.options
    }

    pub fn voted_date(&self) -> Option<NaiveDateTime> {
        self.voted_date
    }

    pub fn is_voting_open(&self) -> bool {
        self.open_voting
    }

    pub fn organizer(&self) -> Option<&User> {
        self.attendees.iter().find(|a| a.id == self.organizer)
    }

    pub fn is_attendee(&self, user: &User) -> bool {
        self.attendees.iter().any(|a| a.has_username(&user.username))
    }

    pub fn is_organizer(&self, username: &str) -> bool {
        self.organizer().is_some_and(|o| o.has_username(username))
    }

    /// 加入參與者，同名者忽略。回傳是否有新增。
    pub fn add_attendee(&mut self, attendee: User) -> bool {
        if self.is_attendee(&attendee) {
            return false;
        }
        self.attendees.push(attendee);
        true
    }

    pub fn vote(&mut self, voter: &User, slot: &Slot) -> std::result::Result<(), DomainError> {
        self.vote_at(voter, slot.date, slot.hour)
    }

    /// 以日期與整點投票。不在選項中的時間（包含超出範圍的小時）一律視為無效選項。
    pub fn vote_at(
        &mut self,
        voter: &User,
        date: NaiveDate,
        hour: u8,
    ) -> std::result::Result<(), DomainError> {
        if !self.is_attendee(voter) {
            return Err(DomainError::IllegalVote {
                reason: format!("{} is not an attendee of this event.", voter.username),
            });
        }

        if !self.open_voting {
            return Err(DomainError::IllegalVote {
                reason: "Voting is closed.".to_string(),
            });
        }

        let option = self
            .options
            .iter_mut()
            .find(|o| o.is_at(date, hour))
            .ok_or_else(|| DomainError::IllegalVote {
                reason: format!("{} {:02}:00 is not an option for this event.", date, hour),
            })?;

        option.vote(voter.clone());
        Ok(())
    }

    pub fn toggle_voting(
        &mut self,
        username: &str,
        voting: Option<bool>,
    ) -> std::result::Result<bool, DomainError> {
        if !self.is_organizer(username) {
            return Err(DomainError::IllegalUser {
                message: "Only the owner of the event can toggle the voting.".to_string(),
            });
        }

        self.open_voting = voting.unwrap_or(!self.open_voting);
        if self.open_voting {
            self.voted_date = None;
        }
        Ok(self.open_voting)
    }

    /// 結束投票並選出票數最多的時段。同票時取最早的日期，再取最早的小時。
    pub fn close_voting(&mut self) -> Option<NaiveDateTime> {
        self.open_voting = false;

        self.voted_date = self
            .options
            .iter()
            .max_by(|a, b| {
                a.votes
                    .len()
                    .cmp(&b.votes.len())
                    .then_with(|| b.slot.cmp(&a.slot))
            })
            .map(|o| o.slot.starts_at());

        self.voted_date
    }
}

impl PartialEq for MeetingEvent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MeetingEvent {}

impl fmt::Display for MeetingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.voted_date {
            Some(date) => write!(f, "Event({}, {})", self.name, date),
            None => write!(f, "Event({}, TBD)", self.name),
        }
    }
}
