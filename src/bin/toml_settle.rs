use clap::Parser;
use royalty_settle::adapters::render::{render_comparison, render_summary};
use royalty_settle::config::toml_config::TomlConfig;
use royalty_settle::core::reconcile::compare_artists;
use royalty_settle::core::{ConfigProvider, Pipeline};
use royalty_settle::utils::error::MISMATCH_EXIT_CODE;
use royalty_settle::utils::{logger, validation::Validate};
use royalty_settle::{EtlEngine, LocalStorage, SettlementPipeline};

#[derive(Parser)]
#[command(name = "toml-settle")]
#[command(about = "Royalty settlement with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "settle-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the settlement period (YYYYMM) from config
    #[arg(long)]
    period: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    /// Dry run - load both sources and compare artists without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if args.json_logs || config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based settlement");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(period) = args.period.clone() {
        tracing::info!("🔧 Period overridden to: {}", period);
        config.settlement.period = period;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let fail_on_mismatch = config.fail_on_mismatch();

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SettlementPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&pipeline).await;
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            println!("{}", render_summary(&summary.report));
            println!();
            println!("✅ Settled {} artists", summary.artist_count);
            println!("📁 Output saved to: {}", summary.output_path);

            if fail_on_mismatch && !summary.report.is_clean() {
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Period: {}", config.period());
    println!("  Issue date: {}", config.issue_date());
    println!("  Cost source: {}", config.cost_file());
    println!("  Revenue source: {}", config.revenue_file());
    println!("  Output: {}/{}", config.output_path(), config.archive_name());
    println!("  Fail on mismatch: {}", config.fail_on_mismatch());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(pipeline: &SettlementPipeline<LocalStorage, TomlConfig>) {
    println!("🔍 Dry Run Analysis:");
    println!();

    let tables = match pipeline.extract().await {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    };

    let comparison = compare_artists(
        tables.cost_terms.keys().map(String::as_str),
        tables.revenue_lines.keys().map(String::as_str),
    );
    println!("{}", render_comparison(&comparison, &tables.skipped));

    println!();
    println!(
        "📊 {} artists would be settled into {}",
        tables.artists().len(),
        pipeline.config().archive_name()
    );
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
