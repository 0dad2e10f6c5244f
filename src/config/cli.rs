use crate::config::{validate_bcrypt_cost, DEFAULT_BCRYPT_COST};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "meet-scheduler")]
#[command(about = "Register users, schedule meetings and vote on dates from a scenario file")]
pub struct CliConfig {
    /// Path to the TOML scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    pub scenario: String,

    /// bcrypt cost factor; overrides `[settings]` in the scenario
    #[arg(long)]
    pub bcrypt_cost: Option<u32>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    fn scenario_path(&self) -> &str {
        &self.scenario
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("scenario", &self.scenario)?;
        if let Some(cost) = self.bcrypt_cost {
            validate_bcrypt_cost("bcrypt_cost", cost)?;
        }
        Ok(())
    }
}
