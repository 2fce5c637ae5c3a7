//! Entry point for the pier-data tool.
//! Handles CLI parsing and logging setup, runs the requested fetch and reports the record.

use clap::Parser;
use pier_data::datenum::datenum_to_datetime;
use pier_data::netcdf_io::write_record_to_netcdf;
use pier_data::record::{PierRecord, SeriesStats};
use pier_data::retriever::PierDataRetriever;
use pier_data::source::NetcdfSource;

mod cli;

use cli::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let retriever = PierDataRetriever::new(NetcdfSource::new(), args.config());

    let record = match args.year_range() {
        Some((year_start, year_end)) => {
            retriever.fetch_year_range(year_start, year_end, args.date_start, args.date_end)?
        }
        None => retriever.fetch_single_year(args.date_start, args.date_end)?,
    };

    if let Some(output_path) = &args.output_netcdf {
        write_record_to_netcdf(&record, output_path)?;
        println!("✅ Saved record to {}", output_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record.to_json())?);
    } else {
        print_summary(&record);
    }

    Ok(())
}

fn print_summary(record: &PierRecord) {
    let summary = record.summary();

    println!("\n Pier Record");
    println!("=============");
    println!("   {}", record.readme);
    println!("   Observations: {}", summary.count);

    if let (Some(first), Some(last)) = (summary.first_dnum, summary.last_dnum) {
        println!("   First: {:.5} ({})", first, format_dnum(first));
        println!("   Last:  {:.5} ({})", last, format_dnum(last));
    }

    print_stats("Temperature", summary.temperature);
    print_stats("Pressure", summary.pressure);
}

fn print_stats(label: &str, stats: Option<SeriesStats>) {
    match stats {
        Some(s) => println!(
            "   {}: min {:.3}, mean {:.3}, max {:.3}, std {:.3} ({} valid)",
            label, s.min, s.mean, s.max, s.std_dev, s.valid
        ),
        None => println!("   {}: no valid values", label),
    }
}

fn format_dnum(dnum: f64) -> String {
    datenum_to_datetime(dnum)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "out of range".to_string())
}
