mod terminal;

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use outloud_core::model::Viewer;
use services::config::{parse_api_url, parse_user_id};
use services::{Backend, ClientConfig, ConfigError, HttpBackend, InMemoryBackend};
use tracing::{info, warn};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        ArgsError::Config(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    backend: Arc<dyn Backend>,
    viewer: Option<Viewer>,
}

impl UiApp for DesktopApp {
    fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    fn viewer(&self) -> Option<Viewer> {
        self.viewer.clone()
    }
}

struct Args {
    config: ClientConfig,
    demo: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--api <url>] [--flavor <name>] [--user-id <id>] [--init-data <query>] [--demo]");
    eprintln!("  cargo run -p app -- browse [same flags]   # terminal viewer");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://localhost:8080");
    eprintln!("  --flavor standard   (standard | nested | webapp)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  OUTLOUD_API_URL, OUTLOUD_API_FLAVOR, OUTLOUD_USER_ID, OUTLOUD_INIT_DATA");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Browse,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "browse" => Some(Self::Browse),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = ClientConfig::from_env()?;
        let mut demo = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    config.api_url = parse_api_url(&value)?;
                }
                "--flavor" => {
                    let value = require_value(args, "--flavor")?;
                    config.flavor = value.parse()?;
                }
                "--user-id" => {
                    let value = require_value(args, "--user-id")?;
                    config.user_id = Some(parse_user_id(&value)?);
                }
                "--init-data" => {
                    let value = require_value(args, "--init-data")?;
                    config.init_data = Some(value).filter(|raw| !raw.trim().is_empty());
                }
                "--demo" => demo = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { config, demo })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the desktop viewer.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let viewer = match parsed.config.viewer() {
        Ok(viewer) => Some(viewer),
        Err(err) => {
            warn!(error = %err, "viewer identity unavailable; paid blocks will be refused");
            None
        }
    };
    let backend: Arc<dyn Backend> = if parsed.demo {
        info!("using the built-in demo catalog");
        Arc::new(InMemoryBackend::demo())
    } else {
        info!(api = %parsed.config.api_url, flavor = %parsed.config.flavor, "using http backend");
        Arc::new(HttpBackend::from_config(&parsed.config))
    };

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { backend, viewer });
            let context = build_app_context(&app);

            // Keep the window a normal one; some dev setups default to always-on-top.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Outloud")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Browse => {
            terminal::browse(backend, viewer).await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        // Binary glue: print once and exit.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
