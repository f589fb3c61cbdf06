use crate::commands::{run_kpis, run_rank, run_weights, KpiArgs, RankArgs, WeightsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ops_scoring::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Ops Scoring",
    about = "Serve and inspect recovery scoring weights and disruption KPIs",
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
    /// Print weight totals and health for each category
    Weights(WeightsArgs),
    /// Rank candidates from a JSON file against a category's weights
    Rank(RankArgs),
    /// Summarise a CSV of disruption records over a time window
    Kpis(KpiArgs),
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
        Command::Weights(args) => run_weights(args),
        Command::Rank(args) => run_rank(args),
        Command::Kpis(args) => run_kpis(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["ops-scoring-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_kpi_window() {
        let cli = Cli::try_parse_from([
            "ops-scoring-api",
            "kpis",
            "--csv",
            "disruptions.csv",
            "--from",
            "2025-01-01T00:00:00Z",
            "--to",
            "2025-01-02",
            "--top-field",
            "affectedPassengers",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Kpis(args)) => {
                assert!(args.from < args.to);
                assert_eq!(args.top_field.as_deref(), Some("affectedPassengers"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unparseable_timestamps() {
        let result = Cli::try_parse_from([
            "ops-scoring-api",
            "kpis",
            "--csv",
            "disruptions.csv",
            "--from",
            "yesterday",
            "--to",
            "2025-01-02",
        ]);
        assert!(result.is_err());
    }
}
