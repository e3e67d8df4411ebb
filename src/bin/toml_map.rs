use clap::Parser;
use travel_map::core::{ConfigProvider, Pipeline};
use travel_map::utils::{logger, validation::Validate};
use travel_map::{EtlEngine, LocalStorage, MapPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-map")]
#[command(about = "Render a travel cost map from a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "travel-map.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Load and transform only, report the join without writing any file
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置，日誌格式由配置決定，所以在初始化日誌之前
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    if config.json_logging() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based travel map");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = MapPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        if let Err(e) = perform_dry_run(&pipeline).await {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Map saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Map generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("-")
    );
    tracing::info!("  Data: {}", config.data_path());
    tracing::info!(
        "  Boundaries: {} (name property: {})",
        config.boundaries_path(),
        config.name_property()
    );
    tracing::info!(
        "  Reference: {}, Trip length: {} days",
        config.reference_country(),
        config.trip_length_days()
    );
    tracing::info!("  Output: {}", config.output_path());
    let formats: Vec<String> = config.output_formats().iter().map(|f| f.to_string()).collect();
    tracing::info!("  Formats: {}", formats.join(", "));

    if args.dry_run {
        tracing::info!("  🔍 DRY RUN MODE ENABLED");
    }
}

async fn perform_dry_run(pipeline: &MapPipeline<LocalStorage, TomlConfig>) -> travel_map::Result<()> {
    let dataset = pipeline.extract().await?;
    tracing::info!("🔍 Dry Run Analysis:");
    tracing::info!(
        "  📥 {} country records, {} boundaries",
        dataset.records.len(),
        dataset.boundaries.len()
    );

    let result = pipeline.transform(dataset).await?;

    tracing::info!("🔗 Join:");
    tracing::info!("  Matched: {}", result.joined.len());
    tracing::info!(
        "  Records without boundary ({}): {}",
        result.report.missing_boundaries.len(),
        result.report.missing_boundaries.join(", ")
    );
    tracing::info!(
        "  Boundaries without record: {}",
        result.report.missing_records.len()
    );

    tracing::info!("🗺️ Layers:");
    for layer in &result.map.layers {
        tracing::info!(
            "  {}: {} .. {} over {} countries",
            layer.metric, layer.min, layer.max, layer.features
        );
    }

    tracing::info!(
        "✅ Dry run complete. {} bytes would be written to {}",
        result.map.html.len(),
        pipeline.config().output_path()
    );

    Ok(())
}
