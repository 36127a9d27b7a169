use anyhow::{Context, Result};
use basil_api::{ApiError, PlantForm, station_types_or_fallback};
use basil_core::DraftField;
use clap::Args;
use colored::Colorize;
use inquire::{Confirm, Select, Text};
use serde::Serialize;

use crate::session::{OutputFormat, Session, is_interactive, print_json};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Station or origin of the plant
    #[arg(long, alias = "origin")]
    pub station: Option<String>,

    /// Current location
    #[arg(long)]
    pub location: Option<String>,

    /// GPS coordinates, e.g. 44.0486,8.2139
    #[arg(long)]
    pub gps: Option<String>,

    /// Temperature reading, e.g. 24.5°C
    #[arg(long)]
    pub temperature: Option<String>,

    /// Humidity reading, e.g. 65%
    #[arg(long)]
    pub humidity: Option<String>,

    /// Initial status (defaults to the first status the backend lists)
    #[arg(long)]
    pub status: Option<String>,

    /// Never prompt; fail if required fields are missing
    #[arg(long)]
    pub no_input: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

impl CreateArgs {
    fn values(&self) -> [(DraftField, &Option<String>); 6] {
        [
            (DraftField::Station, &self.station),
            (DraftField::Location, &self.location),
            (DraftField::CurrentGps, &self.gps),
            (DraftField::Temperature, &self.temperature),
            (DraftField::Humidity, &self.humidity),
            (DraftField::Status, &self.status),
        ]
    }
}

#[derive(Serialize)]
struct CreateOutput<'a> {
    code: &'a str,
    owner: &'a basil_core::Owner,
    created: Option<serde_json::Value>,
}

pub fn execute(args: CreateArgs, session: &mut Session) -> Result<()> {
    let strategy = session.payload();
    let interactive = !args.no_input && is_interactive();
    let mut form = session.open_form();
    let code = form.code().to_string();
    let owner = form.owner().clone();

    if matches!(args.format, OutputFormat::Human) {
        println!("{}", "Create Plant Tracking".bold());
        println!("Register a new plant with auto-generated QR code: {}", code.cyan());
        println!("Owner: {}", owner.name);
    }

    for (field, value) in args.values() {
        if let Some(value) = value {
            form.set(field, value.clone());
        }
    }
    if interactive {
        let stations = station_types_or_fallback(&session.client);
        prompt_missing(&mut form, &stations, args.status.is_none())?;
    }

    loop {
        match form.submit(&session.client, strategy) {
            Ok(created) => {
                match args.format {
                    OutputFormat::Json => print_json(&CreateOutput {
                        code: &code,
                        owner: &owner,
                        created,
                    })?,
                    OutputFormat::Human => println!(
                        "{} QR Code {} has been successfully registered to {}.",
                        "Plant Created".green().bold(),
                        code,
                        owner.name
                    ),
                }
                return Ok(());
            }
            Err(ApiError::SubmissionFailed(reason)) if interactive => {
                eprintln!(
                    "{} Failed to create plant. Please try again.",
                    "Error:".red().bold()
                );
                eprintln!("  {}", reason.dimmed());
                let retry = Confirm::new("Retry with the same values?")
                    .with_default(true)
                    .prompt()
                    .unwrap_or(false);
                if !retry {
                    return Err(ApiError::SubmissionFailed(reason).into());
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt_missing(form: &mut PlantForm, stations: &[String], ask_status: bool) -> Result<()> {
    for field in DraftField::ALL {
        if field == DraftField::Status || !form.draft().get(field).is_empty() {
            continue;
        }
        let value = if field == DraftField::Station && !stations.is_empty() {
            Select::new("Station:", stations.to_vec()).prompt()
        } else {
            let mut text = Text::new(prompt_label(field)).with_placeholder(placeholder(field));
            if field.is_required() {
                text = text.with_validator(inquire::required!("This field is required"));
            }
            text.prompt()
        }
        .context("Plant creation cancelled")?;
        form.set(field, value);
    }

    if ask_status && !form.status_options().is_empty() {
        let options = form.status_options().to_vec();
        let status = Select::new("Status:", options)
            .prompt()
            .context("Plant creation cancelled")?;
        form.set(DraftField::Status, status);
    }
    Ok(())
}

fn prompt_label(field: DraftField) -> &'static str {
    match field {
        DraftField::Station => "Origin:",
        DraftField::Location => "Location:",
        DraftField::CurrentGps => "GPS Coordinates:",
        DraftField::Temperature => "Temperature:",
        DraftField::Humidity => "Humidity:",
        DraftField::Status => "Status:",
    }
}

fn placeholder(field: DraftField) -> &'static str {
    match field {
        DraftField::Station => "Plant origin",
        DraftField::Location => "Current location",
        DraftField::CurrentGps => "Example: 37.7749,-122.4194",
        DraftField::Temperature => "Example: 24.5°C",
        DraftField::Humidity => "Example: 65%",
        DraftField::Status => "",
    }
}
