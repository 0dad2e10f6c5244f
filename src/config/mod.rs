#[cfg(feature = "cli")]
pub mod cli;
pub mod scenario;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use scenario::{ActionConfig, MeetingConfig, ScenarioConfig, SettingsConfig, UserConfig};

use crate::adapters::BcryptPasswordEncoder;
use crate::utils::validation::validate_range;
use crate::utils::error::Result;

pub const DEFAULT_BCRYPT_COST: u32 = 10;

pub fn validate_bcrypt_cost(field_name: &str, cost: u32) -> Result<()> {
    validate_range(
        field_name,
        cost,
        BcryptPasswordEncoder::MIN_COST,
        BcryptPasswordEncoder::MAX_COST,
    )
}
