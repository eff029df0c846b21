//! cohort-runner: headless generator for synthetic longitudinal cohorts.
//!
//! Usage:
//!   cohort-runner --seed 12345 --subjects 1000 --csv visits.csv
//!   cohort-runner --config cohort.json --db cohort.db --points-json points.json

use anyhow::Result;
use cohort_core::{
    config::GeneratorConfig,
    dataset::{Dataset, DatasetSummary},
    export,
    generator,
    store::CohortStore,
    trend::{self, TrendFit},
};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

#[derive(serde::Serialize)]
struct RunReport<'a> {
    run_id: &'a str,
    config: &'a GeneratorConfig,
    summary: DatasetSummary,
    trends: Vec<TrendFit>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match arg_value(&args, "--config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.n_subjects = parse_arg(&args, "--subjects", config.n_subjects);
    let json_report = args.iter().any(|a| a == "--json");

    let created_at = chrono::Utc::now();
    let run_id = format!("run-{}-{}", config.seed, created_at.timestamp());

    if !json_report {
        println!("cohort-runner");
        println!("  seed:      {}", config.seed);
        println!("  subjects:  {}", config.n_subjects);
        println!("  run_id:    {run_id}");
        println!();
    }

    let dataset = generator::generate(&config)?;

    if let Some(path) = arg_value(&args, "--csv") {
        write_to(path, |out| export::write_visits_csv(&dataset, out))?;
        log::info!("wrote visits table to {path}");
    }
    if let Some(path) = arg_value(&args, "--profiles-csv") {
        write_to(path, |out| export::write_profiles_csv(&dataset, out))?;
        log::info!("wrote profiles table to {path}");
    }
    if let Some(path) = arg_value(&args, "--points-json") {
        write_to(path, |out| export::write_points_json(&dataset, out))?;
        log::info!("wrote measured points to {path}");
    }
    if let Some(db) = arg_value(&args, "--db") {
        let store = CohortStore::open(db)?;
        store.migrate()?;
        store.insert_run(
            &run_id,
            &config,
            env!("CARGO_PKG_VERSION"),
            &created_at.to_rfc3339(),
        )?;
        store.save_dataset(&run_id, &dataset)?;
        log::info!("saved run {run_id} to {db}");
    }

    let trends = trend::fit_by_gender(&dataset.measured_points());
    if json_report {
        let report = RunReport {
            run_id: &run_id,
            config: &config,
            summary: dataset.summary(),
            trends,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&dataset, &config, &trends);
    }
    Ok(())
}

fn print_summary(dataset: &Dataset, config: &GeneratorConfig, trends: &[TrendFit]) {
    let s = dataset.summary();
    println!("=== RUN SUMMARY ===");
    println!("  subjects:        {}", s.subjects);
    println!("  male subjects:   {}", s.males);
    println!("  scheduled:       {}", s.visits);
    println!("  attended:        {}", s.attended);
    println!("  no-shows:        {}", s.no_shows);
    println!("  attendance rate: {:.1}%", s.attendance_rate * 100.0);

    println!();
    println!("=== TREND BY GENDER ===");
    if trends.is_empty() {
        println!("  (Not enough measured visits to fit a line)");
    }
    for t in trends {
        let g = t.gender.indicator() as f64;
        let true_intercept = config.baseline + g * config.male_baseline_offset;
        let true_slope = config.slope + g * config.male_slope_offset;
        println!(
            "  {:<6} | n: {:>6} | intercept: {:>9.3} (model {:.3}) | slope: {:>8.4} (model {:.4}) | r²: {:.3}",
            t.gender.as_str(),
            t.n,
            t.intercept,
            true_intercept,
            t.slope,
            true_slope,
            t.r_squared
        );
    }
}

fn write_to<F>(path: &str, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> cohort_core::error::GenResult<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()?;
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    match arg_value(args, flag) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring malformed {flag} value '{raw}', using the default");
            default
        }),
        None => default,
    }
}
