pub mod register;
pub mod registry;
pub mod scheduler;

pub use crate::domain::model::{MeetingEvent, MeetingEventOption, Slot, User};
pub use crate::domain::ports::{
    ConfigProvider, Criteria, Entity, MeetingEventRepository, PasswordEncoder, Repository,
    UserRepository,
};
pub use crate::utils::error::Result;
