use cli::Cli;
use convert::ConvertOptions;
use error::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod apply;
mod cli;
mod config;
mod convert;
mod error;
mod init;
mod plan;
mod utils;

pub const CONFIG_TEMPLATE_TS: &str = include_str!("../template/ts2js.config.ts");

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli: Cli = clap::Parser::parse();
    init_tracing(cli.command.verbose());

    match cli.command {
        cli::Commands::Init { output, force } => {
            init::generate_config_file(&output, force).await?;
        }
        cli::Commands::Convert {
            config,
            root,
            dry_run,
            json,
            jobs,
            ..
        } => {
            convert::run_convert(ConvertOptions {
                config: &config,
                root: &root,
                dry_run,
                json,
                jobs: usize::from(jobs),
            })
            .await?;
            if !dry_run && !json {
                println!("✅ Conversion complete!");
            }
        }
        cli::Commands::Plan {
            config, root, json, ..
        } => {
            convert::run_convert(ConvertOptions {
                config: &config,
                root: &root,
                dry_run: true,
                json,
                jobs: 1,
            })
            .await?;
        }
    }

    Ok(())
}
