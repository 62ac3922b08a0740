use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use personalizer_core::config::{BackendKind, PersonalizerConfig};
use personalizer_infrastructure::ConfigService;
use tracing_subscriber::EnvFilter;

mod commands;
mod runtime;

#[derive(Parser)]
#[command(name = "personalizer")]
#[command(about = "Personalizer CLI - inspect and drive the persona/theme state", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State file, overriding the configured storage path
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Storage backend, overriding the configured one
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current state as JSON
    State,
    /// Persona commands
    Persona {
        #[command(subcommand)]
        action: PersonaAction,
    },
    /// Theme commands
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Replace the stored state with defaults
    Reset,
    /// Run the install/update lifecycle hook
    Install {
        /// Keep existing state (browser or extension update)
        #[arg(long)]
        update: bool,
    },
    /// Check that the background answers
    Ping,
    /// Send a raw runtime message, e.g. '{"type":"GET_STATE"}'
    #[command(name = "send")]
    Message { message: String },
    /// Run a keyboard shortcut command
    Shortcut { name: String },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum PersonaAction {
    /// List personas in cycling order
    List,
    /// Make a persona active
    Set { id: String },
    /// Activate the next persona
    Next,
    /// Activate the previous persona
    Prev,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// List themes
    List,
    /// Print the CSS variables of a theme (the active one by default)
    Vars { id: Option<String> },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write the effective configuration to the config file
    Init,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    /// JSON state file
    File,
    /// In-process only, lost on exit
    Memory,
    /// No storage; reads yield defaults
    None,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => BackendKind::File,
            BackendArg::Memory => BackendKind::Memory,
            BackendArg::None => BackendKind::None,
        }
    }
}

fn init_tracing(config: &PersonalizerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(),
    };
    let mut config = config_service.get_config();
    if let Some(backend) = cli.backend {
        config.storage.backend = backend.into();
    }
    if let Some(path) = &cli.state_file {
        config.storage.path = Some(path.clone());
    }

    init_tracing(&config);

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(&config_service),
            ConfigAction::Init => commands::config::init(&config_service, &config),
        };
    }

    let runtime = runtime::Runtime::start(&config.storage)?;

    match cli.command {
        Commands::State => commands::state::show(&runtime).await?,
        Commands::Persona { action } => match action {
            PersonaAction::List => commands::persona::list(&runtime).await?,
            PersonaAction::Set { id } => commands::persona::set(&runtime, &id).await?,
            PersonaAction::Next => commands::persona::next(&runtime).await?,
            PersonaAction::Prev => commands::persona::previous(&runtime).await?,
        },
        Commands::Theme { action } => match action {
            ThemeAction::List => commands::theme::list(&runtime).await?,
            ThemeAction::Vars { id } => commands::theme::vars(&runtime, id.as_deref()).await?,
        },
        Commands::Reset => commands::state::reset(&runtime).await?,
        Commands::Install { update } => commands::state::install(&runtime, update).await?,
        Commands::Ping => commands::message::ping(&runtime).await?,
        Commands::Message { message } => commands::message::send(&runtime, &message).await?,
        Commands::Shortcut { name } => commands::message::shortcut(&runtime, &name).await?,
        Commands::Config { .. } => {}
    }

    runtime.shutdown().await;
    Ok(())
}
