use anyhow::Result;
use basil_api::{station_types_or_fallback, statuses_or_fallback};
use clap::Args;

use crate::session::{OutputFormat, Session, print_json};

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn execute_statuses(args: LookupArgs, session: &mut Session) -> Result<()> {
    print_list(&statuses_or_fallback(&session.client), args.format)
}

pub fn execute_stations(args: LookupArgs, session: &mut Session) -> Result<()> {
    let stations = station_types_or_fallback(&session.client);
    if stations.is_empty() && matches!(args.format, OutputFormat::Human) {
        println!("No station types defined; enter the station as free text.");
        return Ok(());
    }
    print_list(&stations, args.format)
}

fn print_list(items: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Human => {
            for item in items {
                println!("{item}");
            }
        }
    }
    Ok(())
}
