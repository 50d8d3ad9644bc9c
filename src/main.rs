use clap::Parser;
use royalty_settle::adapters::render::render_summary;
use royalty_settle::utils::error::MISMATCH_EXIT_CODE;
use royalty_settle::utils::{logger, validation::Validate};
use royalty_settle::{CliConfig, EtlEngine, LocalStorage, SettlementPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting royalty-settle CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let fail_on_mismatch = config.fail_on_mismatch;

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = SettlementPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            println!("{}", render_summary(&summary.report));
            println!();
            println!("✅ Settled {} artists", summary.artist_count);
            println!("📁 Output saved to: {}", summary.output_path);

            if fail_on_mismatch && !summary.report.is_clean() {
                tracing::error!(
                    "❌ Verification found {} mismatches",
                    summary.report.summary().total_errors
                );
                std::process::exit(MISMATCH_EXIT_CODE);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Settlement failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
