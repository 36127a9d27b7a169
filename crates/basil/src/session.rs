use anyhow::{Context, Result};
use basil_api::{ApiClient, Config, DirectoryCache, Overrides, PlantForm};
use basil_core::{CodeGenerator, PayloadStrategy};
use clap::Args;
use serde::Serialize;
use std::io::IsTerminal;

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Backend base URL (overrides BASIL_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Organization to act as (defaults to the default organization)
    #[arg(long, global = true, value_name = "ID")]
    pub org: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Create request body shape: minimal or full
    #[arg(long, global = true, value_name = "SHAPE")]
    pub payload: Option<PayloadStrategy>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// State shared by one invocation: the backend client, the directory
/// snapshot with the acting organization, and the issued QR codes.
pub struct Session {
    pub client: ApiClient,
    pub cache: DirectoryCache,
    pub codes: CodeGenerator,
}

impl Session {
    pub fn new(args: &SessionArgs) -> Result<Self> {
        let overrides = Overrides {
            api_url: args.api_url.clone(),
            timeout_secs: args.timeout,
            payload: args.payload,
        };
        let config = Config::load(&overrides).context("Failed to load configuration")?;
        log::debug!("Using backend at {}", config.api_url);

        let cache = DirectoryCache::new(config.default_org.clone(), args.org.clone());
        let client = ApiClient::new(config)?;
        Ok(Self {
            client,
            cache,
            codes: CodeGenerator::new(),
        })
    }

    pub fn payload(&self) -> PayloadStrategy {
        self.client.config().payload
    }

    pub fn open_form(&mut self) -> PlantForm {
        PlantForm::open(&mut self.codes, &mut self.cache, &self.client)
    }

    /// Display name and access level of the acting organization.
    pub fn acting_org(&mut self) -> (String, bool) {
        let full_access = self.cache.has_full_access(&self.client);
        let selection = self.cache.selection().to_string();
        (self.cache.resolve_name(&self.client, &selection), full_access)
    }
}

/// True when both stdin and stdout are terminals, so prompts can be shown.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn access_label(full_access: bool) -> &'static str {
    if full_access {
        "Full Access"
    } else {
        "Limited Access"
    }
}
