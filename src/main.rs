mod cli;

use cli::Args;
use spdx_sbom::application::dto::DocGenerateOptions;
use spdx_sbom::application::factories::{PortsFactory, PresenterType};
use spdx_sbom::application::use_cases::DocBuilder;
use spdx_sbom::config::{discover_config, load_config_from_path};
use spdx_sbom::shared::error::ExitCode;
use spdx_sbom::shared::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse_args();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => std::process::ExitCode::from(ExitCode::Success.as_i32() as u8),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            std::process::ExitCode::from(ExitCode::ApplicationError.as_i32() as u8)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Some(load_config_from_path(path)?),
        None => discover_config(&std::env::current_dir()?)?,
    };
    let base = match config {
        Some(config) => config.into_options()?,
        None => DocGenerateOptions::default(),
    };

    let quiet = args.quiet;
    let options = args.merge_into(base);
    options.validate()?;
    tracing::debug!(?options, "resolved options");

    let ports =
        PortsFactory::create(&options.sbom, options.layer_signatures.as_deref(), quiet).await?;
    let builder = DocBuilder::new(ports);

    let document = builder.generate(&options).await?;
    builder.write(
        &document,
        PresenterType::from(options.output_file.clone()),
        options.format,
    )?;

    Ok(())
}
