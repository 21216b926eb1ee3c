use crate::commands::{
    run_digital_valuation, run_report_validation, run_signage_batch, run_signage_valuation,
    BatchArgs, InputFileArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use propval::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Property Valuation Toolkit",
    about = "Validate report data, value advertising assets and proxy the Domain listings API",
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
    /// Check an assessment bundle before report generation
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Value an advertising asset from a JSON or CSV input file
    Value {
        #[command(subcommand)]
        command: ValueCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Run the required-field gate and section completeness checks
    Validate(InputFileArgs),
}

#[derive(Subcommand, Debug)]
enum ValueCommand {
    /// Capitalise the net rent of an advertising sign
    Signage(InputFileArgs),
    /// Value a digital display screen on a revenue multiple
    Digital(InputFileArgs),
    /// Value every signage site in a CSV export
    SignageBatch(BatchArgs),
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
        Command::Report {
            command: ReportCommand::Validate(args),
        } => run_report_validation(args),
        Command::Value { command } => match command {
            ValueCommand::Signage(args) => run_signage_valuation(args),
            ValueCommand::Digital(args) => run_digital_valuation(args),
            ValueCommand::SignageBatch(args) => run_signage_batch(args),
        },
    }
}
