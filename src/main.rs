use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

mod aggregate;
mod error;
mod filter;
mod insight;
mod models;
mod report;
mod retention;
mod store;
mod view;

use error::AnalyticsError;
use models::{FilterSelection, GroupChoice, UserRecord};
use view::ViewModel;

#[derive(Parser)]
#[command(name = "user-behavior-analytics")]
#[command(about = "User behavior analytics over signup and retention records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Input CSV with signup_date, last_active_date, ab_group, session_count
    #[arg(long, default_value = "user_data.csv")]
    csv: PathBuf,
    /// Cohort group to keep, or "All" for no constraint
    #[arg(long, default_value = "All")]
    group: String,
    /// Inclusive signup range start; defaults to the earliest signup in the data
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Inclusive signup range end; defaults to the latest signup in the data
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Minimum session count, inclusive
    #[arg(long, default_value_t = 1)]
    min_sessions: u32,
    /// Keep retained users only
    #[arg(long)]
    only_retained: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in sample dataset to a CSV file
    Seed {
        #[arg(long, default_value = "user_data.csv")]
        out: PathBuf,
    },
    /// Print summary metrics, chart data and a preview for the filtered set
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Emit the full view model as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn build_selection(
    records: &[UserRecord],
    args: &FilterArgs,
) -> Result<FilterSelection, AnalyticsError> {
    let (start, end) = match (args.from, args.to) {
        (Some(from), Some(to)) => (from, to),
        (from, to) => {
            let (min, max) =
                store::signup_bounds(records).ok_or(AnalyticsError::EmptyDataset)?;
            (from.unwrap_or(min), to.unwrap_or(max))
        }
    };

    Ok(FilterSelection {
        group: GroupChoice::parse(&args.group),
        date_range: (start, end),
        min_sessions: args.min_sessions,
        only_retained: args.only_retained,
    })
}

fn run_cycle(args: &FilterArgs) -> anyhow::Result<(FilterSelection, ViewModel)> {
    let records = store::load_csv(&args.csv)?;
    let selection = build_selection(&records, args)?;
    let view = view::render_cycle(&records, &selection)?;
    Ok((selection, view))
}

fn print_summary(selection: &FilterSelection, view: &ViewModel) {
    let (start, end) = selection.date_range;
    println!("Signups {start} to {end}");

    if view.malformed_records > 0 {
        eprintln!(
            "Warning: {} record(s) have last_active_date before signup_date.",
            view.malformed_records
        );
    }

    println!("Total users: {}", view.summary.total_users);
    println!("Avg. sessions: {}", report::format_mean(view.summary.avg_sessions));
    println!("Retention rate: {}", report::format_rate(view.summary.retention_rate));

    println!();
    println!("Weekly signups:");
    if view.weekly_trend.is_empty() {
        println!("- none in the filtered range");
    } else {
        for entry in view.weekly_trend.iter() {
            println!("- week of {}: {}", entry.week_start, entry.signups);
        }
    }

    if let Some(comparison) = &view.retention_comparison {
        println!();
        println!("Retention by A/B group:");
        for group in comparison.by_group.iter() {
            println!("- {}: {:.2}%", group.ab_group, group.retention_rate);
        }
        println!("{}", comparison.insight);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { out } => {
            let written = store::write_sample_csv(&out)?;
            println!("Wrote {written} sample records to {}.", out.display());
        }
        Commands::Summary { filters, json } => {
            let (selection, view) = run_cycle(&filters)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_summary(&selection, &view);
            }
        }
        Commands::Report { filters, out } => {
            let (selection, view) = run_cycle(&filters)?;
            let report = report::build_report(&selection, &view);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
