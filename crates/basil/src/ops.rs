use anyhow::{Context, Result, bail};
use basil_core::{CREATE_PLANT_TRACKING, catalog};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::create::{self, CreateArgs};
use crate::session::{OutputFormat, Session, access_label, print_json};

#[derive(Args, Debug)]
#[command(about = "Show the operations available to the current organization")]
pub struct OpsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
#[command(about = "Run an operation by title")]
pub struct RunArgs {
    /// Operation title, e.g. "Create Plant Tracking"
    pub operation: String,

    #[command(flatten)]
    pub create: CreateArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpsOutput<'a> {
    organization: &'a str,
    full_access: bool,
    operations: Vec<catalog::OperationCard>,
}

pub fn execute(args: OpsArgs, session: &mut Session) -> Result<()> {
    let (name, full_access) = session.acting_org();
    let cards = catalog::cards(full_access);

    match args.format {
        OutputFormat::Json => print_json(&OpsOutput {
            organization: session.cache.selection(),
            full_access,
            operations: cards,
        })?,
        OutputFormat::Human => {
            println!("{} ({})", name.bold(), access_label(full_access));
            for card in cards {
                let op = card.operation;
                if card.enabled {
                    println!("  {} {}", "✓".green(), op.title.bold());
                    println!("    {}", op.description);
                } else {
                    println!(
                        "  {} {} {}",
                        "✗".dimmed(),
                        op.title.dimmed(),
                        "(requires full access)".dimmed()
                    );
                    println!("    {}", op.description.dimmed());
                }
            }
        }
    }
    Ok(())
}

pub fn execute_run(args: RunArgs, session: &mut Session) -> Result<()> {
    let op = catalog::find(&args.operation)
        .with_context(|| format!("Unknown operation '{}'", args.operation))?;
    let (name, full_access) = session.acting_org();

    if !op.is_enabled(full_access) {
        bail!(
            "'{}' requires full access, {} has limited access",
            op.title,
            name
        );
    }

    if op.title == CREATE_PLANT_TRACKING {
        return create::execute(args.create, session);
    }

    println!(
        "{} {} operation was triggered.",
        "Operation Triggered:".green().bold(),
        op.title
    );
    Ok(())
}
