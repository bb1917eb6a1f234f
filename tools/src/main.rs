use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::Codec;
use schema::Registry;
use session::{
    AuthBackend, ClientScenario, NoAuth, RunReport, Runner, ScenarioRole, ServerScenario,
    UnixAuth,
};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xrdsim_tools::{
    collect_message_entries, decode_messages, format_decode_pretty, format_registry,
    load_run_config, DecodeAs, FuzzClient, FuzzServer, FuzzTarget, LoginClient, LoginServer,
    RunOverrides, ScenarioKind,
};

#[derive(Parser)]
#[command(
    name = "xrdsim",
    version,
    about = "XRootD protocol simulator, fuzzer and decoder"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect to a server and run a client scenario.
    Client {
        #[arg(long, value_enum, default_value_t = ScenarioKind::Login)]
        scenario: ScenarioKind,
        /// Request the fuzz scenario mutates.
        #[arg(long, value_enum, default_value_t = FuzzTarget::Handshake)]
        target: FuzzTarget,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Number of concurrent connections.
        #[arg(long)]
        clients: Option<usize>,
        /// Login name.
        #[arg(long)]
        user: Option<String>,
        /// Group sent with unix credentials.
        #[arg(long, default_value = "imposter")]
        group: String,
        #[command(flatten)]
        fuzz: FuzzArgs,
        /// JSON run settings; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Accept clients and run a server scenario.
    Server {
        #[arg(long, value_enum, default_value_t = ScenarioKind::Login)]
        scenario: ScenarioKind,
        /// Address to bind.
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Number of connections to accept before exiting.
        #[arg(long)]
        clients: Option<usize>,
        /// Require unix authentication at login.
        #[arg(long)]
        verify_auth: bool,
        #[command(flatten)]
        fuzz: FuzzArgs,
        /// JSON run settings; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Decode captured message bytes.
    Decode {
        /// File, or directory of files, holding raw messages.
        path: PathBuf,
        /// Decode the bytes as requests or responses.
        #[arg(long = "as", value_enum, default_value_t = DecodeAs::Request)]
        kind: DecodeAs,
        /// Originating request bytes, needed to decode responses.
        #[arg(long)]
        request: Option<PathBuf>,
        /// Glob filter when decoding a directory.
        #[arg(long)]
        glob: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// List every registered message layout.
    Schemas,
}

#[derive(clap::Args)]
struct FuzzArgs {
    /// Variants generated per fuzzed message.
    #[arg(long)]
    iterations: Option<usize>,
    /// RNG seed for a reproducible variant sequence.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Client {
            scenario,
            target,
            host,
            port,
            clients,
            user,
            group,
            fuzz,
            config,
        } => {
            let overrides = RunOverrides {
                host,
                port,
                clients,
                username: user,
                verify_auth: false,
                iterations: fuzz.iterations,
                seed: fuzz.seed,
            };
            let config = load_run_config(config.as_deref(), ScenarioRole::Active, &overrides)?;
            let auth: Arc<dyn AuthBackend> =
                Arc::new(UnixAuth::new(config.session.username.clone(), group));
            let scenario: Arc<dyn ClientScenario> = match scenario {
                ScenarioKind::Login => Arc::new(LoginClient),
                ScenarioKind::Fuzz => Arc::new(FuzzClient { target }),
            };
            let address = config.scenario.address();
            tracing::info!(%address, clients = config.scenario.clients, "starting client run");
            let runner = Runner::new(Registry::shared(), config.session, auth);
            let report = runner
                .run_active(&address, config.scenario.clients, scenario)
                .await;
            finish(report)?;
        }
        Command::Server {
            scenario,
            ip,
            port,
            clients,
            verify_auth,
            fuzz,
            config,
        } => {
            let overrides = RunOverrides {
                host: ip,
                port,
                clients,
                username: None,
                verify_auth,
                iterations: fuzz.iterations,
                seed: fuzz.seed,
            };
            let config = load_run_config(config.as_deref(), ScenarioRole::Passive, &overrides)?;
            let auth: Arc<dyn AuthBackend> = if config.session.verify_auth {
                Arc::new(UnixAuth::new("xrdsim", "xrdsim"))
            } else {
                Arc::new(NoAuth)
            };
            let scenario: Arc<dyn ServerScenario> = match scenario {
                ScenarioKind::Login => Arc::new(LoginServer),
                ScenarioKind::Fuzz => Arc::new(FuzzServer),
            };
            let address = config.scenario.address();
            let listener = TcpListener::bind(&address)
                .await
                .with_context(|| format!("bind {address}"))?;
            tracing::info!(%address, clients = config.scenario.clients, "listening");
            let runner = Runner::new(Registry::shared(), config.session, auth);
            let report = runner
                .run_passive(listener, config.scenario.clients, scenario)
                .await?;
            finish(report)?;
        }
        Command::Decode {
            path,
            kind,
            request,
            glob,
            format,
        } => {
            let request = request
                .as_deref()
                .map(read_bytes)
                .transpose()
                .context("load originating request")?;
            let codec = Codec::new(Registry::shared());
            if path.is_dir() {
                for entry in collect_message_entries(&path, glob.as_deref())? {
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    let bytes = read_bytes(&entry.path)?;
                    print_decoded(&codec, &bytes, kind, request.as_deref(), format)?;
                }
            } else {
                let bytes = read_bytes(&path)?;
                print_decoded(&codec, &bytes, kind, request.as_deref(), format)?;
            }
        }
        Command::Schemas => {
            print!("{}", format_registry(Registry::shared()));
        }
    }
    Ok(())
}

fn finish(report: RunReport) -> Result<()> {
    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "run finished"
    );
    if report.failed > 0 {
        bail!("{} of {} connections failed", report.failed, report.failed + report.succeeded);
    }
    Ok(())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read message {}", path.display()))
}

fn print_decoded(
    codec: &Codec<'_>,
    bytes: &[u8],
    kind: DecodeAs,
    request: Option<&[u8]>,
    format: OutputFormat,
) -> Result<()> {
    let output = decode_messages(codec, bytes, kind, request)?;
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output).context("serialize json")?;
            println!("{json}");
        }
        OutputFormat::Pretty => {
            print!("{}", format_decode_pretty(&output));
        }
    }
    Ok(())
}
