//! showtest: end-to-end UI test harness for the showcase app.
//!
//! Launches the app as a subprocess, finds its native window, drives
//! validated synthetic input against telemetry-reported element bounds, and
//! verifies behavior through the telemetry state the app publishes.

mod capture;
mod cases;
mod cli;
mod config;
mod error;
mod matrix;
mod resume;
mod runner;
mod session;
mod suite;
mod window;

use clap::Parser;
use showtest_telemetry::TelemetryReader;

use crate::{
    cli::{Cli, Commands},
    config::WindowSize,
    error::{Error, Result, print_hints},
    runner::Harness,
};

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        print_hints(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Component { name, size } => run_component(&name, size.as_deref()),
        Commands::All { size } => run_all(size.as_deref()),
        Commands::Nav => run_nav(),
        Commands::Matrix {
            sizes,
            start_from,
            only,
            resume,
            resume_all_sizes,
            resume_file,
        } => matrix::run(matrix::MatrixOptions {
            sizes: config::parse_sizes(&sizes)?,
            start_from,
            only,
            resume,
            resume_all_sizes,
            resume_path: resume_file.unwrap_or_else(config::default_resume_path),
        }),
        Commands::ListElements => list_elements(),
    }
}

/// Parse an optional `--size` argument into a single window size.
fn parse_single_size(spec: Option<&str>) -> Result<Option<WindowSize>> {
    match spec {
        None => Ok(None),
        Some(s) => {
            let mut sizes = config::parse_sizes(s)?;
            Ok(Some(sizes.remove(0)))
        }
    }
}

fn heading(title: &str) {
    println!("\n==> {}", title);
}

fn print_visuals(harness: &Harness) {
    let visuals = harness.runner.visuals();
    if visuals.is_empty() {
        return;
    }
    let passed = visuals.iter().filter(|v| v.matches).count();
    let new = visuals.iter().filter(|v| !v.had_baseline).count();
    println!(
        "\nvisual checks: {}/{} passed ({} new baselines)",
        passed,
        visuals.len(),
        new
    );
    for check in visuals.iter().filter(|v| !v.matches) {
        println!("  {}", check.message);
    }
}

fn run_component(name: &str, size: Option<&str>) -> Result<()> {
    let case = cases::case_by_slug(name).ok_or_else(|| Error::UnknownCase(name.to_string()))?;
    let size = parse_single_size(size)?;
    let mut harness = Harness::launch(size.as_ref())?;

    heading(&format!("{} ({})", case.name, case.info));
    let outcome = (case.run)(&mut harness.runner);
    print_visuals(&harness);
    harness.session.shutdown();
    outcome?;
    println!("{}: OK", case.name);
    Ok(())
}

fn run_all(size: Option<&str>) -> Result<()> {
    let size = parse_single_size(size)?;
    let mut harness = Harness::launch(size.as_ref())?;

    // Fail-fast: the first failing case aborts the rest of the suite.
    for case in cases::CASES {
        heading(&format!("{} ({})", case.name, case.info));
        if let Err(e) = (case.run)(&mut harness.runner) {
            print_visuals(&harness);
            harness.session.shutdown();
            return Err(e);
        }
        println!("{}: OK", case.name);
    }
    print_visuals(&harness);
    harness.session.shutdown();
    println!("\nall component tests passed");
    Ok(())
}

fn run_nav() -> Result<()> {
    let mut harness = Harness::launch(None)?;
    let results = harness.runner.navigation_sweep();
    harness.session.shutdown();

    println!("\n{}", "=".repeat(60));
    println!("NAVIGATION RESULTS");
    println!("{}", "=".repeat(60));
    let passed = results.iter().filter(|(_, ok)| *ok).count();
    for (section, ok) in &results {
        println!("  {} {}", if *ok { "[PASS]" } else { "[FAIL]" }, section);
    }
    println!(
        "\nTotal: {}/{} sections navigated successfully",
        passed,
        results.len()
    );
    if passed == 0 && !results.is_empty() {
        return Err(Error::VerificationMismatch {
            key: "selected_section".to_string(),
            expected: "any section".to_string(),
            actual: None,
        });
    }
    Ok(())
}

fn list_elements() -> Result<()> {
    let reader = TelemetryReader::new(config::TELEMETRY_FILE);
    let Some(snapshot) = reader.read() else {
        println!("no telemetry available; run a test first");
        return Ok(());
    };
    let mut elements = snapshot.elements;
    elements.sort_by(|a, b| a.id.cmp(&b.id));
    println!("available elements ({} total):", elements.len());
    for e in elements {
        println!(
            "  - {}: ({:.0}, {:.0}) {:.0}x{:.0}",
            e.id, e.x, e.y, e.width, e.height
        );
    }
    Ok(())
}
