mod reports;
mod runner;
mod scenario;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use runner::{ScenarioResult, ScenarioRunner};
use scenario::{Scenario, catalog_scenarios, find_catalog_scenario, list_scenarios};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "dropmenu-tester", version)]
#[command(about = "Replays scripted interaction scenarios against the dropmenu state machine")]
struct Args {
    /// Built-in scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// JSON file with additional scenarios (one object or an array)
    #[arg(long)]
    scenario_file: Option<PathBuf>,

    /// List all built-in scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print every step as it runs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = collect_scenarios(&args)?;
    let runner = ScenarioRunner::new(args.verbose);

    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        if args.verbose {
            println!("▶ {}", scenario.name.bold());
        }
        let result = runner.run(scenario);
        log::debug!(
            "{} finished in {:?} (passed: {})",
            result.scenario_name,
            result.duration,
            result.passed
        );
        results.push(result);
    }

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🧭 Dropmenu Scenario Tester".bright_cyan().bold());
    println!("{}", "===========================".cyan());
}

fn collect_scenarios(args: &Args) -> Result<Vec<Scenario>> {
    let mut scenarios = expand_scenarios(&args.scenarios);
    if let Some(path) = &args.scenario_file {
        let loaded = scenario::load_scenario_file(path)?;
        log::info!("loaded {} scenarios from {}", loaded.len(), path.display());
        scenarios.extend(loaded);
    }
    Ok(scenarios)
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<Scenario> {
    let names = split_csv(scenarios_arg);
    if names.iter().any(|name| name == "all") {
        return catalog_scenarios();
    }
    names
        .iter()
        .filter_map(|name| {
            let found = find_catalog_scenario(name);
            if found.is_none() {
                eprintln!("⚠️  Unknown scenario: {}", name.yellow());
            }
            found
        })
        .collect()
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, results)?,
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Dropmenu Scenario Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
