// Adapters layer: concrete implementations of the domain ports.

pub mod memory;
pub mod password;

pub use memory::{InMemoryMeetingEventRepository, InMemoryRepository, InMemoryUserRepository};
pub use password::BcryptPasswordEncoder;
