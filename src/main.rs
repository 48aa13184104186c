use anyhow::Result;
use clap::{Parser, Subcommand};
use ufdash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Indicators backend URL, overrides the configuration file
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for ufdash::AppCommand {
    fn from(cmd: Commands) -> ufdash::AppCommand {
        match cmd {
            Commands::Show => ufdash::AppCommand::Show,
            Commands::Generate => ufdash::AppCommand::Generate,
            Commands::UpdateRate => ufdash::AppCommand::UpdateRate,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the latest indicators and their history
    Show,
    /// Generate today's UF value and display the refreshed indicators
    Generate,
    /// Reload the observed dollar rate
    UpdateRate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Show) {
        Commands::Setup => ufdash::cli::setup::setup(),
        cmd => {
            ufdash::run_command(
                cmd.into(),
                cli.config_path.as_deref(),
                cli.base_url.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
