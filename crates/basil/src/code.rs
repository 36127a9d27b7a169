use anyhow::{Result, bail};
use basil_core::CODE_SPACE;
use clap::Args;

use crate::session::Session;

#[derive(Args, Debug)]
#[command(about = "Issue unique QR codes without registering plants")]
pub struct CodeArgs {
    /// Number of codes to issue
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

pub fn execute(args: CodeArgs, session: &mut Session) -> Result<()> {
    if args.count > CODE_SPACE {
        bail!("Only {CODE_SPACE} distinct codes exist, cannot issue {}", args.count);
    }
    for _ in 0..args.count {
        println!("{}", session.codes.generate());
    }
    Ok(())
}
