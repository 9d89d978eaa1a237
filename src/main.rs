use clap::Parser;
use xml_transit::utils::logger;
use xml_transit::{CliConfig, Diagnostics, EtlEngine, LocalStorage, TransitPipeline};

fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    logger::init_cli_logger(cli.verbose, config.log_level.as_deref(), config.json_logs);

    tracing::info!("Starting transit: {} -> {}", config.input_path, config.output_path);
    tracing::debug!("Resolved config: {:?}", config);

    if config.monitor {
        tracing::info!("System monitoring enabled");
    }

    let monitor_enabled = config.monitor;
    let pipeline = TransitPipeline::new(LocalStorage::default(), config);
    let mut engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    let mut diagnostics = Diagnostics::new();

    match engine.run(&mut diagnostics) {
        Ok(output_path) => {
            let warnings = diagnostics.warnings().count();
            if warnings > 0 {
                tracing::warn!("Completed with {} warnings", warnings);
            }
            println!("✅ Report written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Transit failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}
