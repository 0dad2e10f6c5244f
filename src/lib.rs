pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{BcryptPasswordEncoder, InMemoryMeetingEventRepository, InMemoryUserRepository};
pub use app::{ScenarioReport, ScenarioRunner};
pub use config::ScenarioConfig;
pub use core::{register::RegisterService, registry::AppRegistry, scheduler::MeetingSchedulerService};
pub use utils::error::{DomainError, Result, SchedulerError};
