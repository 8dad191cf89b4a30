use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use cmd::command::generate::generate;
use cmd::command::load::load;
use cmd::command::marts::build;
use cmd::command::run::run;
use cmd::command::FormatArg;
use cmd::command::Overrides;
use cmd::config;
use cmd::error::Error;
use cmd::error::Result;
use common::config::Config;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Args, Clone, Debug)]
struct Load {
    /// Raw table file format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Subcommand, Clone, Debug)]
enum Commands {
    /// Generate the synthetic raw dataset
    Generate(Overrides),
    /// Load raw tables into the warehouse
    Load(Load),
    /// Build mart tables and print the A/B results
    Marts,
    /// Generate, load and build marts in sequence
    Run(Overrides),
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(path) = &args.config {
        if !path.exists() {
            return Err(Error::BadRequest(format!(
                "config file {:?} doesn't exist",
                path
            )));
        }
    }

    let mut cfg: Config = config::load(args.config.as_deref())?.try_into()?;
    match &args.command {
        Commands::Generate(overrides) | Commands::Run(overrides) => overrides.apply(&mut cfg),
        Commands::Load(load) => {
            if let Some(format) = load.format {
                cfg.data.format = format.into();
            }
        }
        Commands::Marts => {}
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cfg.log.level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("shopmart v{}", env!("CARGO_PKG_VERSION"));
    match &args.command {
        Commands::Generate(_) => generate(&cfg)?,
        Commands::Load(_) => load(&cfg).await?,
        Commands::Marts => build(&cfg).await?,
        Commands::Run(_) => run(&cfg).await?,
    }

    Ok(())
}
