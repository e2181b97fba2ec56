use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use waitingroom::{run_load_comparison, ArrivalSchedule, ConsultLookup, ScenarioResult};

/// Compare clinic staffing levels against recorded and doubled patient load.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// CSV of patient arrivals (patient_id, arrival_time).
    #[arg(long, default_value = "data/patients.csv")]
    patients: PathBuf,

    /// CSV of service events (patient_id, service_type, service_start_time,
    /// service_end_time).
    #[arg(long, default_value = "data/services.csv")]
    services: PathBuf,

    /// Doctors on duty in the baseline scenarios.
    #[arg(long, default_value = "2")]
    doctors: NonZeroUsize,

    /// Write the full results, queue samples included, to this JSON file.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let schedule = ArrivalSchedule::from_csv(&args.patients)?;
    let consults = ConsultLookup::from_csv(&args.services)?;

    let results = run_load_comparison(&schedule, &consults, args.doctors)?;
    for result in &results {
        print_report(result);
    }

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(path, json)?;
        println!();
        println!("Full results written to {}", path.display());
    }

    Ok(())
}

fn print_report(result: &ScenarioResult) {
    println!();
    println!("--- {} ({} doctors) ---", result.label, result.doctors);
    println!("Patients arrived:     {}", result.patients_arrived);
    println!("Patients served:      {}", result.patients_served);
    println!("Average wait:         {:.2} min", result.avg_wait);
    println!("Shortest wait:        {:.2} min", result.min_wait);
    println!("Longest wait:         {:.2} min", result.max_wait);
    println!("Average consultation: {:.2} min", result.avg_consult);
    println!("Average time on site: {:.2} min", result.avg_total);
    println!("Doctor utilization:   {:.1}%", result.utilization * 100.0);
}
