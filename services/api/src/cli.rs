use crate::demo::{run_demo, run_questionnaire, DemoArgs, QuestionnaireArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use prakruti::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Prakruti Assessment",
    about = "Serve and demonstrate the dosha self-assessment engine",
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
    /// Print the active questionnaire as JSON
    Questionnaire(QuestionnaireArgs),
    /// Walk a scripted answer list through an assessment and print the result
    Demo(DemoArgs),
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
        Command::Questionnaire(args) => run_questionnaire(args),
        Command::Demo(args) => run_demo(args),
    }
}
