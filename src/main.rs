use anyhow::{Result, bail};
use clap::Parser;
use fhirfly::commands::{self, CodeSystem};
use fhirfly::config::{
    ENV_API_KEY, ENV_BASE_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_MAX_RETRIES,
    ENV_RETRY_DELAY_MS, ENV_TIMEOUT_MS,
};
use fhirfly::types::{
    BatchLookupOptions, FdaLabelSearchParams, FdaProductType, Icd10SearchParams, Icd10System,
    LookupOptions, ResponseShape, SearchOptions,
};
use fhirfly::{ClientConfig, Fhirfly};
use std::time::Duration;

/// fhirfly - FHIRfly reference-data client
///
/// Look up and search drug, provider, lab, diagnosis and vaccine codes.
///
/// Credentials come from --api-key (or FHIRFLY_API_KEY), or from
/// --client-id/--client-secret for OAuth client credentials.
///
/// Examples:
///   fhirfly lookup ndc 0069-0151-01
///   fhirfly lookup icd10-cm E11.9 I10
///   fhirfly search icd10 --q diabetes --billable true
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key (also via FHIRFLY_API_KEY)
    #[arg(long, env = ENV_API_KEY, hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// OAuth client id (also via FHIRFLY_CLIENT_ID)
    #[arg(long, env = ENV_CLIENT_ID, global = true, requires = "client_secret")]
    client_id: Option<String>,

    /// OAuth client secret (also via FHIRFLY_CLIENT_SECRET)
    #[arg(long, env = ENV_CLIENT_SECRET, hide_env_values = true, global = true)]
    client_secret: Option<String>,

    /// API base URL (defaults to https://api.fhirfly.io)
    #[arg(long, env = ENV_BASE_URL, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, env = ENV_TIMEOUT_MS, value_name = "MS", global = true)]
    timeout_ms: Option<u64>,

    /// Retries after the first attempt
    #[arg(long, env = ENV_MAX_RETRIES, value_name = "N", global = true)]
    max_retries: Option<u32>,

    /// Base delay of the exponential backoff in milliseconds
    #[arg(long, env = ENV_RETRY_DELAY_MS, value_name = "MS", global = true)]
    retry_delay_ms: Option<u64>,

    /// Response detail: compact, standard or full
    #[arg(long, value_name = "SHAPE", global = true)]
    shape: Option<ResponseShape>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Look up one or more codes
    Lookup(LookupArgs),

    /// Search a code system
    #[command(subcommand)]
    Search(SearchCommands),
}

#[derive(clap::Args, Debug)]
struct LookupArgs {
    /// Code system to query
    #[arg(value_enum)]
    system: CodeSystem,

    /// Codes to look up; more than one uses the batch endpoint
    #[arg(value_name = "CODE", required = true)]
    codes: Vec<String>,

    /// Codes per batch request (1-500)
    #[arg(long, value_name = "N")]
    batch_size: Option<usize>,

    /// Ask for the pre-formatted display string
    #[arg(long)]
    display: bool,
}

#[derive(clap::Subcommand, Debug)]
enum SearchCommands {
    /// Search ICD-10-CM and ICD-10-PCS codes
    Icd10(Icd10SearchArgs),

    /// Search FDA drug labels
    #[command(name = "fda-labels")]
    FdaLabels(FdaLabelSearchArgs),
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    /// Results per page
    #[arg(long)]
    limit: Option<u32>,

    /// Page number, starting at 1
    #[arg(long)]
    page: Option<u32>,
}

#[derive(clap::Args, Debug)]
struct Icd10SearchArgs {
    /// Free-text query
    #[arg(long)]
    q: Option<String>,

    /// CM or PCS
    #[arg(long)]
    code_system: Option<Icd10System>,

    #[arg(long)]
    chapter: Option<String>,

    /// Only billable (true) or non-billable (false) codes
    #[arg(long)]
    billable: Option<bool>,

    #[command(flatten)]
    page: PageArgs,
}

#[derive(clap::Args, Debug)]
struct FdaLabelSearchArgs {
    /// Free-text query
    #[arg(long)]
    q: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    /// Active substance, e.g. ibuprofen
    #[arg(long)]
    substance: Option<String>,

    #[arg(long)]
    manufacturer: Option<String>,

    /// otc or rx
    #[arg(long)]
    product_type: Option<FdaProductType>,

    #[arg(long)]
    route: Option<String>,

    #[command(flatten)]
    page: PageArgs,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match (&self.api_key, &self.client_id, &self.client_secret) {
            (Some(key), _, _) => ClientConfig::new(key.as_str()),
            (None, Some(id), Some(secret)) => ClientConfig::oauth(id.as_str(), secret.as_str()),
            _ => bail!(
                "API key is required. Pass --api-key or set {}, or use --client-id and --client-secret.",
                ENV_API_KEY
            ),
        };
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.as_str());
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        if let Some(n) = self.max_retries {
            config = config.with_max_retries(n);
        }
        if let Some(ms) = self.retry_delay_ms {
            config = config.with_retry_delay(Duration::from_millis(ms));
        }
        Ok(config)
    }

    fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            shape: self.shape,
            include: Vec::new(),
        }
    }
}

impl PageArgs {
    fn search_options(&self, shape: Option<ResponseShape>) -> SearchOptions {
        SearchOptions {
            limit: self.limit,
            page: self.page,
            shape,
            include: Vec::new(),
        }
    }
}

impl From<Icd10SearchArgs> for Icd10SearchParams {
    fn from(args: Icd10SearchArgs) -> Self {
        Self {
            q: args.q,
            code_system: args.code_system,
            chapter: args.chapter,
            billable: args.billable,
        }
    }
}

impl From<FdaLabelSearchArgs> for FdaLabelSearchParams {
    fn from(args: FdaLabelSearchArgs) -> Self {
        Self {
            q: args.q,
            name: args.name,
            brand: args.brand,
            substance: args.substance,
            manufacturer: args.manufacturer,
            product_type: args.product_type,
            route: args.route,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = Fhirfly::new(cli.client_config()?)?;
    let lookup_options = cli.lookup_options();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Lookup(args) => {
            let mut lookup = lookup_options;
            if args.display {
                lookup = lookup.with_include(fhirfly::types::IncludeOption::Display);
            }
            let options = BatchLookupOptions {
                lookup,
                batch_size: args.batch_size,
            };
            commands::lookup(&client, args.system, &args.codes, &options, &mut stdout).await?
        }
        Commands::Search(SearchCommands::Icd10(args)) => {
            let options = args.page.search_options(cli.shape);
            commands::search_icd10(&client, &args.into(), &options, &mut stdout).await?
        }
        Commands::Search(SearchCommands::FdaLabels(args)) => {
            let options = args.page.search_options(cli.shape);
            commands::search_fda_labels(&client, &args.into(), &options, &mut stdout).await?
        }
    }
    Ok(())
}
