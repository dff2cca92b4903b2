use anyhow::Context;
use clap::Parser;
use inventory_exporter::adapters::build_listers;
use inventory_exporter::utils::logger::{self, LogFormat};
use inventory_exporter::utils::validation::Validate;
use inventory_exporter::{CliArgs, ExportContext, ExportError, Exporter, ExporterConfig};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    logger::init_logger(LogFormat::from_flag(args.log_json), args.verbose);

    tracing::info!(
        "🚀 {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let exit_code = match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<ExportError>() {
                Some(export_error) => {
                    tracing::error!(
                        "❌ Export failed: {:#} (Severity: {:?})",
                        e,
                        export_error.severity()
                    );
                    eprintln!("❌ {:#}", e);
                    eprintln!("💡 Suggestion: {}", export_error.recovery_suggestion());
                }
                None => {
                    tracing::error!("❌ Export failed: {:#}", e);
                    eprintln!("❌ {:#}", e);
                }
            }
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(args: &CliArgs) -> anyhow::Result<i32> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            ExporterConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path.display()))?
        }
        None => ExporterConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;

    let registry = config.registry()?;
    if args.list {
        print!("{}", registry.describe());
        return Ok(0);
    }

    let listers = build_listers(&config, &registry)?;
    let exporter = Exporter::new(ExportContext::new(registry, listers, &config));
    let report = exporter.run(&args.selectors).await?;

    println!("{}", report.render_summary());

    if report.has_failures() {
        tracing::warn!(
            "⚠️ {} selector(s) failed",
            report.failures().count()
        );
        if args.fail_on_error {
            return Ok(2);
        }
    } else {
        tracing::info!("✅ Export completed successfully!");
    }

    Ok(0)
}
