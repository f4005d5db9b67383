use crate::demo::{run_ask, run_demo, run_employee, run_report, AskArgs, EmployeeArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use continuum::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Continuum",
    about = "Serve and query the Continuum attendance dashboard from the command line",
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
    /// Print the filtered attendance summary
    Report(ReportArgs),
    /// Show hours, projects, coworkers and totals for one employee
    Employee(EmployeeArgs),
    /// Ask the assistant a question about an employee
    Ask(AskArgs),
    /// Walk through the dashboard offline using the configured exports
    Demo,
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
        Command::Report(args) => run_report(args),
        Command::Employee(args) => run_employee(args),
        Command::Ask(args) => run_ask(args).await,
        Command::Demo => run_demo(),
    }
}
