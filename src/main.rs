use clap::Parser;
use redis_smoke::utils::{logger, validation::Validate};
use redis_smoke::{CliConfig, PlanConfig, RedisSink, SeedPipeline, SmokeEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting redis-smoke");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let plan = match &config.plan {
        Some(path) => {
            tracing::info!("📄 Loading seed plan from {}", path);
            match PlanConfig::from_file(path) {
                Ok(plan) => plan,
                Err(e) => {
                    tracing::error!("❌ Failed to load seed plan: {}", e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                    std::process::exit(1);
                }
            }
        }
        None => PlanConfig::default_plan(),
    };

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let report_path = config.report.clone();

    let sink = match RedisSink::connect(&config).await {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!("❌ Connection failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    };

    let pipeline = SeedPipeline::new(sink, config, plan);
    let engine = SmokeEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Smoke run completed successfully!");
            println!(
                "✅ Smoke run completed: {} commands across {} batches",
                report.total_commands,
                report.batch_count()
            );
            if report.verified_keys > 0 {
                println!("🔎 Verified {} keys", report.verified_keys);
            }

            if let Some(path) = report_path {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&path, json)?;
                println!("📁 Report saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Smoke run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                redis_smoke::utils::error::ErrorSeverity::Low => 0,
                redis_smoke::utils::error::ErrorSeverity::Medium => 2,
                redis_smoke::utils::error::ErrorSeverity::High => 1,
                redis_smoke::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
