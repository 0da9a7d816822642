use clap::Parser;
use playtime_etl::app::run_reports;
use playtime_etl::core::ConfigProvider;
use playtime_etl::utils::logger::{self, LogFormat};
use playtime_etl::utils::validation::Validate;
use playtime_etl::TomlConfig;

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Playtime and catalog reports driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "report.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Override the platform filter from config
    #[arg(long)]
    platform: Option<String>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, args.verbose);

    tracing::info!("🚀 Starting TOML-based report tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(platform) = &args.platform {
        config.source.platform = Some(platform.clone());
        tracing::info!("🔧 Platform overridden to: {}", platform);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    match run_reports(config).await {
        Ok(locations) => {
            tracing::info!("✅ All reports completed successfully!");
            for location in locations {
                println!("📁 Output saved to: {}", location);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

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
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    println!("  Compress: {}", config.compress());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Datasets:");
    match config.hltb_file() {
        Some(path) => println!("  Playtime (JSONL): {}", path),
        None => println!("  Playtime (JSONL): not configured"),
    }
    match config.rawg_file() {
        Some(path) => println!("  Catalog (CSV): {}", path),
        None => println!("  Catalog (CSV): not configured"),
    }
    if let Some(platform) = config.platform() {
        println!("  Platform filter: {}", platform);
    }

    // 類型對照表
    println!();
    let table = config.genre_table();
    let source = if config.genres.is_some() { "custom" } else { "built-in" };
    println!("🗂️ Genre table ({}, {} genres):", source, table.len());
    println!("  {}", table.canonical_names().collect::<Vec<_>>().join(", "));

    println!();
    println!("📊 Presentation:");
    println!("  Genre order: {:?}", config.sort_order());
    println!("  Max tags: {}", config.max_tags());

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
