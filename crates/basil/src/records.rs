use anyhow::Result;
use basil_api::PlantBackend;
use clap::Args;

use crate::session::{OutputFormat, Session, print_json};

const COLUMNS: [(&str, &str); 4] = [
    ("station", "Station"),
    ("currentGps", "GPS"),
    ("temperature", "Temperature"),
    ("humidity", "Humidity"),
];

#[derive(Args, Debug)]
#[command(about = "List plant records")]
pub struct RecordsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn execute(args: RecordsArgs, session: &mut Session) -> Result<()> {
    let records = session.client.list_plants()?;

    match args.format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Human => {
            if records.is_empty() {
                println!("No basil records found.");
                return Ok(());
            }
            let mut table = comfy_table::Table::new();
            table
                .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
                .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
            let mut header = vec!["ID"];
            header.extend(COLUMNS.iter().map(|(_, label)| *label));
            table.set_header(header);

            for record in &records {
                let mut row = vec![record.id.clone()];
                row.extend(
                    COLUMNS
                        .iter()
                        .map(|(key, _)| record.field(key).unwrap_or_else(|| "-".to_string())),
                );
                table.add_row(row);
            }
            println!("{table}");
        }
    }
    Ok(())
}
