use crate::batch::{run_audit, run_rescore, run_score, AuditArgs, RescoreArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sus_survey::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SUS Survey",
    about = "Score System Usability Scale questionnaires and serve the survey API",
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
    /// Score a single response set given as JSON
    Score(ScoreArgs),
    /// Check stored scores in a CSV export against a fresh computation
    Audit(AuditArgs),
    /// Recompute every stored score in a CSV export
    Rescore(RescoreArgs),
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
        Command::Score(args) => run_score(args),
        Command::Audit(args) => run_audit(args),
        Command::Rescore(args) => run_rescore(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["sus-survey-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rescore_accepts_dry_run() {
        let cli = Cli::try_parse_from([
            "sus-survey-api",
            "rescore",
            "--input",
            "responses.csv",
            "--dry-run",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Rescore(args)) => {
                assert!(args.dry_run);
                assert!(args.output.is_none());
            }
            other => panic!("expected rescore command, got {other:?}"),
        }
    }
}
