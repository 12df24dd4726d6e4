use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use edgesign::api;
use edgesign::assets::{AssetLoader, ConfigSource, InitOutcome};
use edgesign::models::{AppConfig, Resource};
use edgesign::server;
use edgesign::services::{generate_secret, Clock, SystemClock, UrlSigner, Verifier};

#[derive(Parser)]
#[command(name = "edgesign")]
#[command(about = "Edgesign - time-limited HMAC signed URLs verifiable at the edge")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Sign a resource path or numeric identifier
    Sign {
        /// Resource path, absolute URL, or numeric identifier
        resource: String,

        /// Extra query parameter appended unsigned (repeatable)
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Sign as if the clock read this Unix timestamp
        #[arg(long)]
        at: Option<i64>,
    },
    /// Check a signed request target such as "/previews/a.mp3?verify=..."
    Verify {
        /// Request target (path and query)
        uri: String,

        /// Verify as if the clock read this Unix timestamp
        #[arg(long)]
        now: Option<i64>,
    },
    /// Print a random signing secret
    Keygen,
    /// Write the default config.yaml for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Edgesign API",
        description = "Time-limited HMAC signed URLs verifiable at the edge",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_sign, api::handle_verify, api::handle_auth),
    components(schemas(api::SignResponse, api::VerifyResponse)),
    tags(
        (name = "Signing", description = "Signed URL issuance"),
        (name = "Verification", description = "Gateway-side token checks")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Sign {
            resource,
            params,
            at,
        }) => run_sign_command(&resource, &params, at),
        Some(Commands::Verify { uri, now }) => run_verify_command(&uri, now),
        Some(Commands::Keygen) => {
            println!("{}", generate_secret());
            Ok(())
        }
        Some(Commands::Init { force }) => run_init_command(force),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edgesign=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn asset_loader() -> AssetLoader {
    AssetLoader::new(std::env::var("CONFIG_FILE").ok().map(PathBuf::from))
}

/// Load config.yaml and apply the EDGESIGN_SECRET override
fn load_config(loader: &AssetLoader) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load_from_assets(loader)?
        .with_secret_override(std::env::var("EDGESIGN_SECRET").ok());
    Ok(config)
}

fn run_sign_command(resource: &str, params: &[String], at: Option<i64>) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = load_config(&asset_loader())?;
    let mut signer = UrlSigner::new(config.signer_config()?);
    if let Some(resolver) = config.resolver() {
        signer = signer.with_resolver(resolver);
    }

    let params = params
        .iter()
        .map(|p| {
            p.split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Invalid parameter {p:?}, expected KEY=VALUE"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let resource = Resource::parse(resource);
    let now = at.unwrap_or_else(|| SystemClock.now());
    let signed = signer.sign_at(&resource, params, now)?;

    println!("{}", signed.url);
    Ok(())
}

fn run_verify_command(uri: &str, now: Option<i64>) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = load_config(&asset_loader())?;
    let signer_config = config.signer_config()?;
    let verifier = Verifier::from_config(&signer_config, config.max_skew_seconds);
    let now = now.unwrap_or_else(|| SystemClock.now());

    match verifier.verify_request_uri(uri, signer_config.param_name(), now) {
        Ok(verified) => {
            match verified.timestamp {
                Some(ts) => println!("valid (signed at {ts})"),
                None => println!("valid"),
            }
            Ok(())
        }
        Err(e) => {
            println!("invalid: {e}");
            std::process::exit(1);
        }
    }
}

fn run_init_command(force: bool) -> anyhow::Result<()> {
    match asset_loader().init(force)? {
        InitOutcome::Written(path) => println!("Wrote {}", path.display()),
        InitOutcome::Skipped(path) => println!(
            "Skipped existing {} (use --force to overwrite)",
            path.display()
        ),
    }
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let secret_set = std::env::var("EDGESIGN_SECRET").is_ok_and(|s| !s.is_empty());
    let loader = asset_loader();

    println!("Edgesign v{VERSION} - signed URLs verifiable at the edge\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR       = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE     = {}",
        std::env::var("CONFIG_FILE").as_deref().unwrap_or("(not set)")
    );
    println!(
        "  EDGESIGN_SECRET = {}",
        if secret_set { "(set)" } else { "(not set)" }
    );

    println!("\nConfiguration:");
    match loader.config_source() {
        ConfigSource::File(path) => println!("  Source:    {}", path.display()),
        ConfigSource::Embedded => println!("  Source:    embedded"),
    }
    match load_config(&loader) {
        Ok(config) => {
            println!("  Base URL:  {}", config.base_url);
            println!(
                "  Prefix:    {}",
                config.resource_base.as_deref().unwrap_or("(none)")
            );
            println!("  Parameter: {}", config.param_name);
            println!(
                "  Timestamp: {}",
                if config.use_timestamp {
                    format!("on ({}s window)", config.max_skew_seconds)
                } else {
                    "off".to_string()
                }
            );
            println!("  Resources: {}", config.resources.len());
        }
        Err(e) => println!("  Error:     {e}"),
    }

    println!("\nCommands:");
    println!("  edgesign serve    Start the HTTP server");
    println!("  edgesign sign     Sign a resource");
    println!("  edgesign verify   Check a signed request target");
    println!("  edgesign keygen   Generate a signing secret");
    println!("  edgesign init     Write the default config.yaml");
    println!("\nRun 'edgesign --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edgesign=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let loader = asset_loader();

    tracing::info!(config = ?loader.config_source(), "Config source");

    let config = load_config(&loader)?;
    let state = server::create_app_state(&config)?;

    if !state.signer.has_resolver() {
        tracing::info!("No resources configured, numeric resources are signed as paths");
    }

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Edgesign server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
