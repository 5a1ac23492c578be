use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use gsc_top_pages::auth::{authorize, ServiceAccountKey, WEBMASTERS_READONLY_SCOPE};
use gsc_top_pages::config::{Config, ConfigOverrides};
use gsc_top_pages::output::csv::ranked_to_csv;
use gsc_top_pages::output::json::render_json;
use gsc_top_pages::output::table::render_report;
use gsc_top_pages::pipeline::{run_report, ReportRequest};
use gsc_top_pages::report::{DateRange, WeeklyReport};
use gsc_top_pages::search_console::client::build_http_client;
use gsc_top_pages::search_console::SearchConsoleClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Search Console data usually lags by a couple of days.
const DATA_LAG_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "gsc-top-pages",
    about = "Week-over-week top page movers from Google Search Console"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Service account JSON key file
    #[arg(long)]
    credentials: Option<String>,
    /// Search Console property, e.g. https://www.example.com/ or sc-domain:example.com
    #[arg(short, long)]
    site: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Report {
        #[command(flatten)]
        dates: DateArgs,
        /// Also print the merged table of every page
        #[arg(long)]
        show_combined: bool,
    },
    /// Check the service account key and token exchange
    Auth,
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, clap::Args, Clone, Default)]
struct DateArgs {
    #[arg(long = "previous-start")]
    previous_start: Option<NaiveDate>,
    #[arg(long = "previous-end")]
    previous_end: Option<NaiveDate>,
    #[arg(long = "current-start")]
    current_start: Option<NaiveDate>,
    #[arg(long = "current-end")]
    current_end: Option<NaiveDate>,
    /// Last day of the current week when explicit ranges are omitted
    #[arg(
        long,
        conflicts_with_all = ["previous_start", "previous_end", "current_start", "current_end"]
    )]
    end: Option<NaiveDate>,
}

impl DateArgs {
    fn resolve(&self, today: NaiveDate) -> Result<(DateRange, DateRange)> {
        match (
            self.previous_start,
            self.previous_end,
            self.current_start,
            self.current_end,
        ) {
            (Some(ps), Some(pe), Some(cs), Some(ce)) => {
                Ok((DateRange::new(ps, pe), DateRange::new(cs, ce)))
            }
            (None, None, None, None) => {
                let end = match self.end {
                    Some(end) => end,
                    None => today
                        .checked_sub_signed(Duration::days(DATA_LAG_DAYS))
                        .ok_or_else(|| anyhow!("no reporting week ends before {today}"))?,
                };
                let current = DateRange::week_ending(end)
                    .ok_or_else(|| anyhow!("--end {end} leaves no room for a current week"))?;
                let previous = current
                    .preceding_week()
                    .ok_or_else(|| anyhow!("--end {end} leaves no room for a previous week"))?;
                Ok((previous, current))
            }
            _ => Err(anyhow!(
                "--previous-start, --previous-end, --current-start and --current-end must be given together"
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        site_url: cli.site.clone(),
        credentials_path: cli.credentials.clone(),
    });

    match &cli.command {
        Commands::Config { init, show } => {
            handle_config_command(*init, *show, &config, &config_path)
        }
        Commands::Auth => {
            let key = ServiceAccountKey::load(&config.resolved_credentials_path())?;
            let http = build_http_client(&config.api)?;
            let token = authorize(&http, &key, WEBMASTERS_READONLY_SCOPE).await?;
            println!(
                "Authentication successful: {} (token valid until {})",
                key.client_email,
                token.expires_at.to_rfc3339()
            );
            Ok(())
        }
        Commands::Report {
            dates,
            show_combined,
        } => {
            let (baseline, current) = dates.resolve(Local::now().date_naive())?;
            let request = ReportRequest {
                site: config.site.url.clone(),
                baseline,
                current,
                dimension: config.report.dimension.clone(),
            };
            // Range problems are reported before credentials are touched.
            request.validate()?;

            let key = ServiceAccountKey::load(&config.resolved_credentials_path())?;
            let http = build_http_client(&config.api)?;
            let token = authorize(&http, &key, WEBMASTERS_READONLY_SCOPE).await?;
            let client = SearchConsoleClient::new(http, config.api.base_url.clone(), token);

            info!("fetching data...");
            match run_report(&client, &request).await {
                Ok(report) => print_report(&report, cli.output, *show_combined),
                Err(err) if err.is_warning() => {
                    warn!("{err}");
                    Ok(())
                }
                Err(err) => Err(err.into()),
            }
        }
    }
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &PathBuf,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_report(report: &WeeklyReport, format: OutputFormat, show_combined: bool) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_report(report, show_combined)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => print!("{}", ranked_to_csv(report)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::Parser;

    use super::{Cli, DateArgs};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).expect("invalid test date")
    }

    #[test]
    fn defaults_to_two_weeks_before_data_lag() {
        let (previous, current) = DateArgs::default()
            .resolve(date(10, 20))
            .expect("default ranges");
        assert_eq!(current.end, date(10, 17));
        assert_eq!(current.start, date(10, 11));
        assert_eq!(previous.end, date(10, 10));
        assert_eq!(previous.start, date(10, 4));
    }

    #[test]
    fn explicit_ranges_win() {
        let args = DateArgs {
            previous_start: Some(date(1, 1)),
            previous_end: Some(date(1, 7)),
            current_start: Some(date(1, 8)),
            current_end: Some(date(1, 14)),
            end: None,
        };
        let (previous, current) = args.resolve(date(6, 1)).expect("explicit ranges");
        assert_eq!(previous.start, date(1, 1));
        assert_eq!(current.end, date(1, 14));
    }

    #[test]
    fn partial_ranges_are_rejected() {
        let args = DateArgs {
            previous_start: Some(date(1, 1)),
            ..DateArgs::default()
        };
        assert!(args.resolve(date(6, 1)).is_err());
    }

    #[test]
    fn end_near_calendar_start_is_an_error() {
        let args = DateArgs {
            end: Some(NaiveDate::MIN),
            ..DateArgs::default()
        };
        assert!(args.resolve(date(6, 1)).is_err());
        assert!(DateArgs::default().resolve(NaiveDate::MIN).is_err());
    }

    #[test]
    fn end_conflicts_with_explicit_ranges() {
        let parsed = Cli::try_parse_from([
            "gsc-top-pages",
            "report",
            "--end",
            "2024-01-21",
            "--previous-start",
            "2024-01-01",
            "--previous-end",
            "2024-01-07",
            "--current-start",
            "2024-01-08",
            "--current-end",
            "2024-01-14",
        ]);
        let err = parsed.expect_err("--end cannot be combined with explicit ranges");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        assert!(Cli::try_parse_from(["gsc-top-pages", "report", "--end", "2024-01-21"]).is_ok());
    }
}
