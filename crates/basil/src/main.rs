use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod code;
mod create;
mod lookups;
mod ops;
mod orgs;
mod records;
mod session;

use session::{Session, SessionArgs};

#[derive(Parser)]
#[command(name = "basil")]
#[command(about = "Plant supply-chain tracking from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(flatten)]
    session: SessionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List organizations and their access level
    #[command(alias = "o")]
    Orgs(orgs::OrgsArgs),

    /// Show the operations available to the current organization
    Ops(ops::OpsArgs),

    /// Run an operation by title
    Run(ops::RunArgs),

    /// Register a new plant with a fresh QR code
    #[command(alias = "c")]
    Create(create::CreateArgs),

    /// List plant records
    #[command(alias = "r")]
    Records(records::RecordsArgs),

    /// List plant status options
    Statuses(lookups::LookupArgs),

    /// List station types
    Stations(lookups::LookupArgs),

    /// Issue unique QR codes without registering plants
    Code(code::CodeArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug; RUST_LOG wins over both
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let mut session = Session::new(&cli.session)?;

    match cli.command {
        Commands::Orgs(args) => orgs::execute(args, &mut session),
        Commands::Ops(args) => ops::execute(args, &mut session),
        Commands::Run(args) => ops::execute_run(args, &mut session),
        Commands::Create(args) => create::execute(args, &mut session),
        Commands::Records(args) => records::execute(args, &mut session),
        Commands::Statuses(args) => lookups::execute_statuses(args, &mut session),
        Commands::Stations(args) => lookups::execute_stations(args, &mut session),
        Commands::Code(args) => code::execute(args, &mut session),
    }
}
