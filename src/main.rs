use anyhow::Context;
use clap::Parser;
use farm_ghg::domain::events::observe_until_closed;
use farm_ghg::utils::error::ErrorSeverity;
use farm_ghg::utils::{logger, validation::Validate};
use farm_ghg::{CliArgs, DefaultDataTables, FarmEngine, LocalStorage, TomlSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting farm-ghg CLI");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    // 驗證參數
    if let Err(e) = args.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let settings = match &args.settings {
        Some(path) => {
            let settings = TomlSettings::from_file(path)
                .with_context(|| format!("failed to load settings from {}", path))?;
            settings
                .validate()
                .with_context(|| format!("invalid settings in {}", path))?;
            settings
        }
        None => TomlSettings::default(),
    };

    let tables = DefaultDataTables::shared().context("failed to load default data tables")?;

    let mut engine = FarmEngine::new(LocalStorage::new(""), tables)
        .with_config(&args)
        .with_settings(settings)
        .dry_run(args.dry_run);

    if engine.monitor().is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 結果通知的觀察者
    let receiver = engine.results_service().events().subscribe();
    let observer = tokio::spawn(observe_until_closed(receiver, |event| {
        tracing::debug!(
            "📬 Observer received results for '{}'",
            event.farm_emission_results.farm_name
        );
    }));

    let outcome = engine.run_configured();
    drop(engine);
    let notified = observer.await.unwrap_or_default();

    match outcome {
        Ok(summary) => {
            tracing::info!(
                "✅ Processed {} farm(s), {} notification(s), total profit ${:.2}",
                summary.farms_processed,
                notified,
                summary.total_profit
            );
            println!("✅ Processed {} farm(s)", summary.farms_processed);
            for path in &summary.written {
                println!("📁 {}", path.display());
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
