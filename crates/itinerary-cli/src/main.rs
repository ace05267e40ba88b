// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use chrono::{DateTime, Utc};
use itinerary_model::prelude::{Instance, ScheduleConfig, SolutionDocument};
use itinerary_solver::prelude::{SolveOptions, SolveOutcome, Solved, Solver};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXIT_OK: u8 = 0;
const EXIT_CONFIG: u8 = 1;
const EXIT_INFEASIBLE: u8 = 2;
const EXIT_TIMEOUT: u8 = 3;
const EXIT_INTERNAL: u8 = 4;

const USAGE: &str = "\
Usage: itinerary CONFIG.json [options]

Options:
  -t, --max-time SECONDS   solver time budget (default 60)
  -k, --solutions N        number of distinct schedules to produce (default 1)
  -o, --output FILE        write results as JSON
      --csv FILE           write the first schedule as a slot/candidate grid
      --validate-only      check the configuration and exit
  -q, --quiet              suppress progress output
  -h, --help               show this help";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    config_path: PathBuf,
    max_time: Duration,
    solutions: usize,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    validate_only: bool,
    quiet: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<CliArgs>, String> {
    let mut config_path: Option<PathBuf> = None;
    let mut max_time = Duration::from_secs(60);
    let mut solutions = 1usize;
    let mut output = None;
    let mut csv = None;
    let mut validate_only = false;
    let mut quiet = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-t" | "--max-time" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("'{arg}' expects a value"))?;
                let seconds: u64 = value
                    .parse()
                    .map_err(|_| format!("invalid time budget '{value}'"))?;
                max_time = Duration::from_secs(seconds);
            }
            "-k" | "--solutions" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("'{arg}' expects a value"))?;
                solutions = value
                    .parse()
                    .map_err(|_| format!("invalid solution count '{value}'"))?;
                if solutions < 1 {
                    return Err("solution count must be at least 1".to_string());
                }
            }
            "-o" | "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("'{arg}' expects a value"))?;
                output = Some(PathBuf::from(value));
            }
            "--csv" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("'{arg}' expects a value"))?;
                csv = Some(PathBuf::from(value));
            }
            "--validate-only" => validate_only = true,
            "-q" | "--quiet" => quiet = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{other}'"));
            }
            _ => {
                if config_path.is_some() {
                    return Err(format!("unexpected argument '{arg}'"));
                }
                config_path = Some(PathBuf::from(arg));
            }
        }
    }

    let config_path = config_path.ok_or_else(|| "missing configuration file".to_string())?;
    Ok(Some(CliArgs {
        config_path,
        max_time,
        solutions,
        output,
        csv,
        validate_only,
        quiet,
    }))
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct RunRecord<'a> {
    generated_at: DateTime<Utc>,
    config_file: String,
    num_solutions: usize,
    solutions: Vec<&'a SolutionDocument>,
}

fn print_solution(instance: &Instance, solved: &Solved, index: usize, total: usize) {
    println!("{}", "=".repeat(50));
    if total > 1 {
        println!("SOLUTION {} of {}", index + 1, total);
    } else {
        println!("SOLUTION FOUND");
    }
    println!("{}", "=".repeat(50));
    println!("Status: {}", solved.summary.status);
    println!("Order breaks: {}", solved.summary.order_breaks);
    println!(
        "All gaps between consecutive sessions are <= {} minutes",
        solved.summary.max_gap_enforced
    );
    println!("Day ends at: {}", solved.summary.day_end_time);
    println!();

    for candidate in instance.iter_candidates() {
        println!("=== Candidate {} ===", candidate.value() + 1);
        let mut idle_minutes = 0i64;
        let mut previous_end: Option<i64> = None;
        for session in solved.schedule.sessions(candidate) {
            let gap_note = match previous_end {
                Some(end) => {
                    let gap = (session.start().value() - end) * instance.slot_minutes().value();
                    idle_minutes += gap;
                    if gap > 0 {
                        format!(" (gap: {gap} min)")
                    } else {
                        " (back-to-back)".to_string()
                    }
                }
                None => String::new(),
            };
            println!(
                "  {:<13} {} - {}{}",
                instance.panel(session.panel()).name(),
                instance.slot_label(session.start()),
                instance.slot_label(session.end()),
                gap_note
            );
            previous_end = Some(session.end().value());
        }
        println!("  Total idle time: {idle_minutes} minutes");
        println!();
    }
}

fn run(args: CliArgs) -> u8 {
    let raw = match std::fs::read_to_string(&args.config_path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", args.config_path.display());
            return EXIT_CONFIG;
        }
    };
    let config: ScheduleConfig = match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: invalid configuration: {e}");
            return EXIT_CONFIG;
        }
    };
    let instance = match Instance::from_config(&config) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_CONFIG;
        }
    };

    tracing::info!(
        candidates = instance.candidate_count(),
        panels = instance.panel_count(),
        "configuration loaded"
    );

    if args.validate_only {
        println!("Configuration is valid.");
        println!("  - {} candidates", instance.candidate_count());
        println!("  - {} panels", instance.panel_count());
        println!("  - Max gap: {} minutes", instance.max_gap_minutes());
        return EXIT_OK;
    }

    let options = SolveOptions {
        max_time: args.max_time,
        ..SolveOptions::default()
    };

    let results: Vec<SolveOutcome> = if args.solutions == 1 {
        match Solver::solve(&instance, &options) {
            Ok(SolveOutcome::Infeasible) => {
                eprintln!("No feasible solution found: the problem is over-constrained.");
                return EXIT_INFEASIBLE;
            }
            Ok(SolveOutcome::NoSolutionWithinLimit) => {
                eprintln!(
                    "Time limit of {}s reached without a solution.",
                    args.max_time.as_secs()
                );
                return EXIT_TIMEOUT;
            }
            Ok(outcome) => vec![outcome],
            Err(e) => {
                eprintln!("internal error: {e}");
                return EXIT_INTERNAL;
            }
        }
    } else {
        match Solver::solve_multi(&instance, &options, args.solutions) {
            Ok(outcomes) if outcomes.is_empty() => {
                eprintln!("No feasible solution found within the time budget.");
                return EXIT_INFEASIBLE;
            }
            Ok(outcomes) => outcomes,
            Err(e) => {
                eprintln!("internal error: {e}");
                return EXIT_INTERNAL;
            }
        }
    };

    let solved: Vec<&Solved> = results.iter().filter_map(|o| o.solved()).collect();

    if !args.quiet {
        for (i, s) in solved.iter().enumerate() {
            print_solution(&instance, s, i, solved.len());
        }
    }

    if let Some(path) = &args.csv {
        let grid = solved[0].schedule.to_csv_grid(&instance, "DATE");
        if let Err(e) = std::fs::write(path, grid) {
            eprintln!("error: cannot write '{}': {e}", path.display());
            return EXIT_INTERNAL;
        }
        if !args.quiet {
            println!("CSV grid saved to {}", path.display());
        }
    }

    if let Some(path) = &args.output {
        let documents: Vec<SolutionDocument> = solved
            .iter()
            .map(|s| s.schedule.render(&instance, s.summary.clone()))
            .collect();
        let record = RunRecord {
            generated_at: Utc::now(),
            config_file: args.config_path.display().to_string(),
            num_solutions: documents.len(),
            solutions: documents.iter().collect(),
        };
        let json = match serde_json::to_string_pretty(&record) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("error: cannot serialize results: {e}");
                return EXIT_INTERNAL;
            }
        };
        if let Err(e) = std::fs::write(path, json) {
            eprintln!("error: cannot write '{}': {e}", path.display());
            return EXIT_INTERNAL;
        }
        if !args.quiet {
            println!("Results saved to {}", path.display());
        }
    }

    EXIT_OK
}

fn main() -> ExitCode {
    let parsed = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::from(EXIT_OK);
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{USAGE}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    if !parsed.quiet {
        enable_tracing();
    }
    ExitCode::from(run(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<CliArgs>, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse(&["config.json"]).unwrap().unwrap();
        assert_eq!(args.config_path, PathBuf::from("config.json"));
        assert_eq!(args.max_time, Duration::from_secs(60));
        assert_eq!(args.solutions, 1);
        assert!(!args.validate_only);
        assert!(!args.quiet);
        assert!(args.output.is_none());
        assert!(args.csv.is_none());
    }

    #[test]
    fn test_parse_all_options() {
        let args = parse(&[
            "day.json",
            "--max-time",
            "120",
            "-k",
            "3",
            "-o",
            "out.json",
            "--csv",
            "grid.csv",
            "--quiet",
        ])
        .unwrap()
        .unwrap();
        assert_eq!(args.max_time, Duration::from_secs(120));
        assert_eq!(args.solutions, 3);
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.csv, Some(PathBuf::from("grid.csv")));
        assert!(args.quiet);
    }

    #[test]
    fn test_parse_rejects_unknown_option() {
        assert!(parse(&["config.json", "--frobnicate"]).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_value() {
        assert!(parse(&["config.json", "--max-time"]).is_err());
        assert!(parse(&["config.json", "-k", "0"]).is_err());
    }

    #[test]
    fn test_parse_requires_config() {
        assert!(parse(&["--quiet"]).is_err());
    }

    #[test]
    fn test_help_short_circuits() {
        assert_eq!(parse(&["-h"]).unwrap(), None);
    }
}
