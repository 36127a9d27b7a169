use anyhow::Result;
use basil_core::Organization;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::session::{OutputFormat, Session, access_label, print_json};

#[derive(Args, Debug)]
#[command(about = "List organizations and their access level")]
pub struct OrgsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct OrgsOutput<'a> {
    selected: &'a str,
    fallback: bool,
    organizations: &'a [Organization],
}

pub fn execute(args: OrgsArgs, session: &mut Session) -> Result<()> {
    let directory = session.cache.directory(&session.client).clone();
    let selected = session.cache.selection();

    match args.format {
        OutputFormat::Json => print_json(&OrgsOutput {
            selected,
            fallback: directory.is_fallback(),
            organizations: directory.organizations(),
        })?,
        OutputFormat::Human => {
            if directory.is_fallback() {
                eprintln!(
                    "{}",
                    "Organization directory unavailable, showing built-in list".yellow()
                );
            }
            let mut table = comfy_table::Table::new();
            table
                .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
                .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
                .set_header(vec!["", "ID", "Name", "Type", "Access"]);
            for org in directory.organizations() {
                let marker = if org.id == selected { "*" } else { "" };
                table.add_row(vec![
                    marker.to_string(),
                    org.id.clone(),
                    org.display_name().to_string(),
                    org.kind.clone().unwrap_or_else(|| "-".to_string()),
                    access_label(org.full_access).to_string(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
