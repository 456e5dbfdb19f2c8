use crate::commands::{run_assess, run_batch, AssessArgs, BatchArgs};
use crate::server;
use cervical_risk::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cervical-risk",
    about = "Score cervical cancer risk questionnaires and generate PDF reports",
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
    /// Assess a single submission from a JSON file
    Assess(AssessArgs),
    /// Assess every row of a CSV export
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
        Command::Assess(args) => run_assess(args),
        Command::Batch(args) => run_batch(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["cervical-risk"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_assess_arguments() {
        let cli = Cli::try_parse_from([
            "cervical-risk",
            "assess",
            "--answers",
            "submission.json",
            "--report",
            "out.pdf",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Assess(args)) => {
                assert_eq!(args.answers.to_str(), Some("submission.json"));
                assert_eq!(
                    args.report.as_deref().and_then(|p| p.to_str()),
                    Some("out.pdf")
                );
                assert!(args.model.is_none());
            }
            other => panic!("expected assess command, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_csv() {
        assert!(Cli::try_parse_from(["cervical-risk", "batch"]).is_err());
        let cli = Cli::try_parse_from(["cervical-risk", "batch", "--csv", "rows.csv", "--json"])
            .expect("parses");
        assert!(matches!(cli.command, Some(Command::Batch(ref args)) if args.json));
    }
}
