use crate::demo::{
    run_batch_report, run_calculation, run_demo, run_tier_listing, BatchArgs, CalcArgs, TierArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use realty_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Realty Desk",
    about = "Compute brokerage commissions from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Commission calculations, tier lookups, and batch reports
    Commission {
        #[command(subcommand)]
        command: CommissionCommand,
    },
    /// Walk through the reference scenarios and a sample batch report
    Demo,
}

#[derive(Subcommand, Debug)]
enum CommissionCommand {
    /// Compute the commission for a single deal
    Calc(CalcArgs),
    /// List the tier table, optionally with progress toward the next tier
    Tiers(TierArgs),
    /// Summarize a CSV export of closed deals
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Commission { command } => match command {
            CommissionCommand::Calc(args) => run_calculation(args),
            CommissionCommand::Tiers(args) => run_tier_listing(args),
            CommissionCommand::Batch(args) => run_batch_report(args),
        },
        Command::Demo => run_demo(),
    }
}
