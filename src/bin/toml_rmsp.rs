use clap::Parser;
use rmsp_etl::core::{ConfigProvider, Pipeline};
use rmsp_etl::utils::error::RmspError;
use rmsp_etl::utils::{logger, validation::Validate};
use rmsp_etl::{AnalysisMode, LocalStorage, ReportEngine, RpPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-rmsp")]
#[command(about = "RP report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "rmsp-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the analysis mode from config
    #[arg(long)]
    mode: Option<AnalysisMode>,

    /// Override the input CSV from config
    #[arg(long)]
    input: Option<String>,

    /// Dry run - compute and print the table without writing any file
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

    logger::init_logger(args.verbose || config.verbose(), config.json_logs());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(mode) = args.mode {
        config.analysis.mode = Some(mode);
        tracing::info!("🔧 Mode overridden to: {}", mode);
    }
    if let Some(input) = args.input {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.source.input = Some(input);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = RpPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        match dry_run(&pipeline).await {
            Ok(text) => println!("{}", text),
            Err(e) => exit_with(e),
        }
        return Ok(());
    }

    let engine = ReportEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Report generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

/// Runs extract and transform only, returning the printable report.
async fn dry_run<P: Pipeline>(pipeline: &P) -> Result<String, RmspError> {
    let raw = pipeline.extract().await?;
    let result = pipeline.transform(raw).await?;
    Ok(result.text_output)
}

fn exit_with(e: RmspError) {
    tracing::error!(
        "❌ Report generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = e.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Report: {}", config.report.title);
    if let Some(description) = &config.report.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("📥 Input: {}", config.input_path());
    tracing::info!("🔬 Mode: {}", config.mode());
    if let Ok(layers) = config.layers() {
        tracing::info!("📏 Layers: {}", layers.labels().join(", "));
    }
    tracing::info!("👣 Max sampling points: {}", config.max_points());
    tracing::info!(
        "📤 Outputs: {} ({})",
        config.output_formats().join(", "),
        if config.compress() { "zip" } else { "plain files" }
    );
}
