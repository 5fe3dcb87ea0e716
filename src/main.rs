//! carestat - Monthly care-hours and attendance-allowance reports from JSONL data

use carestat::{
    cli::{Cli, Command, CrossSectionKind, ReportKind},
    output::get_formatter,
    reports::{ReportGenerator, ReportOptions},
};
use carestat_core::{Result, TenantId, clock::Clock};
use carestat_provider_json::JsonlSource;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Quiet by default; --verbose falls back to RUST_LOG, then carestat=info.
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("carestat=info"))
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let clock = Clock::from_cli(cli.timezone.as_deref(), cli.utc)?.with_as_of(cli.as_of);
    info!("Using timezone: {}", clock.display_name());

    let show_progress =
        !cli.json && !cli.no_progress && is_terminal::is_terminal(std::io::stderr());
    let source = JsonlSource::discover(cli.data.clone())?.with_progress(show_progress);
    info!("Reading data from {}", source.root().display());

    let options = ReportOptions::new()
        .with_tenant(cli.tenant.clone().map(TenantId::new))
        .with_lookback_years(cli.lookback_years);
    let generator = ReportGenerator::new(source, clock).with_options(options);
    let formatter = get_formatter(cli.json);

    let output = match cli.command {
        Command::Report {
            kind,
            since_year,
            breakdown,
        } => {
            let variant = breakdown.variant();
            let (title, report) = match kind {
                ReportKind::Requests => (
                    "Service request hours",
                    generator.generate_requests_report(since_year, variant).await?,
                ),
                ReportKind::Packages => (
                    "Care package hours",
                    generator.generate_packages_report(since_year, variant).await?,
                ),
                ReportKind::Information => (
                    "Information request hours",
                    generator
                        .generate_information_report(since_year, variant)
                        .await?,
                ),
            };
            formatter.format_report(title, &report)
        }
        Command::CrossSection { kind, breakdown } => {
            let variant = breakdown.variant();
            let (title, section) = match kind {
                CrossSectionKind::Requests => (
                    "Active service requests",
                    generator
                        .generate_active_requests_cross_section(variant)
                        .await?,
                ),
                CrossSectionKind::Packages => (
                    "Active care packages",
                    generator
                        .generate_active_packages_cross_section(variant)
                        .await?,
                ),
            };
            formatter.format_cross_section(title, &section)
        }
        Command::Attendance {
            since_year,
            coordinator,
        } => {
            if coordinator {
                let report = generator
                    .generate_coordinator_attendance_allowance_report(since_year)
                    .await?;
                formatter.format_attendance_report("Attendance allowance (coordinators)", &report)
            } else {
                let report = generator
                    .generate_attendance_allowance_report(since_year)
                    .await?;
                formatter.format_attendance_report("Attendance allowance", &report)
            }
        }
        Command::AttendanceCrossSection => {
            let section = generator
                .generate_attendance_allowance_cross_section()
                .await?;
            formatter.format_attendance_cross_section(&section)
        }
    };

    println!("{output}");
    Ok(())
}
