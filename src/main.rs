use anyhow::Context;
use clap::Parser;
use meet_scheduler::domain::schemas::Response;
use meet_scheduler::utils::error::ErrorSeverity;
use meet_scheduler::utils::{logger, validation::Validate};
use meet_scheduler::{AppRegistry, CliConfig, ScenarioConfig, ScenarioRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting meet-scheduler");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    tracing::info!("📁 Loading scenario from: {}", config.scenario);
    let scenario = ScenarioConfig::from_file(&config.scenario)
        .with_context(|| format!("failed to load scenario '{}'", config.scenario))?;

    if let Err(e) = scenario.validate() {
        tracing::error!("❌ Scenario validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // 命令列的設定優先於情境檔
    if config.bcrypt_cost.is_none() {
        config.bcrypt_cost = scenario.bcrypt_cost();
    }

    let runner = ScenarioRunner::new(AppRegistry::new(&config));

    match runner.run(&scenario).await {
        Ok(report) => {
            let output = serde_json::to_string_pretty(&Response::new(&report))
                .context("failed to serialize scenario report")?;
            println!("{}", output);

            if !report.is_success() {
                tracing::warn!("{} steps failed", report.failures.len());
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Scenario failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
