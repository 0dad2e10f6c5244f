pub mod runner;

pub use runner::{ScenarioReport, ScenarioRunner, StepFailure};
