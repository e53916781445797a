use clap::{ArgGroup, CommandFactory, Parser};
use pritunl_ctl::platform::get_platform_layout;
use pritunl_ctl::render::Palette;
use pritunl_ctl::session::credentials::{KeyringStore, TerminalPrompt};
use pritunl_ctl::session::{Credentials, StatusError};
use pritunl_ctl::{Action, App, AppError, Config, DaemonClient, OutputOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "pritunl-ctl")]
#[command(about = "Pritunl command line client")]
#[command(disable_version_flag = true)]
#[command(group(
    ArgGroup::new("action").args(["list", "active", "connect", "disconnect", "version"])
))]
struct Cli {
    /// List connections
    #[arg(short = 'l')]
    list: bool,

    /// List active profiles
    #[arg(short = 'a')]
    active: bool,

    /// Connect to profile ID or Name
    #[arg(short = 'c', value_name = "PROFILE")]
    connect: Option<String>,

    /// Disconnect profile ID or Name, or "all"
    #[arg(short = 'd', value_name = "PROFILE", num_args = 0..=1, default_missing_value = "all")]
    disconnect: Option<String>,

    /// Show version
    #[arg(short = 'v')]
    version: bool,

    /// Print the connection listing as JSON
    #[arg(long)]
    json: bool,

    /// Separator between names printed by -a
    #[arg(long, value_name = "SEP")]
    separator: Option<String>,

    /// Config file (default: <config dir>/pritunl-ctl/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn action(&self) -> Option<Action> {
        if self.list {
            Some(Action::List)
        } else if self.active {
            Some(Action::Active)
        } else if let Some(target) = &self.connect {
            Some(Action::Connect(target.clone()))
        } else {
            self.disconnect.clone().map(Action::Disconnect)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    // Logs go to stderr so listings on stdout stay clean
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {e}");
    }

    if cli.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let Some(action) = cli.action() else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    match run(&cli, action).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Status(StatusError::EmptyRegistry)) => {
            println!("{}", StatusError::EmptyRegistry);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, action: Action) -> Result<(), AppError> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?;
    debug!("Using config {}", config_path.display());

    let layout = get_platform_layout()?;
    let profiles_dir = match config.profiles.dir.clone() {
        Some(dir) => dir,
        None => layout.profiles_dir()?,
    };
    let auth_key_path = config
        .daemon
        .auth_key_path
        .clone()
        .unwrap_or_else(|| layout.auth_key_path());
    debug!("Profiles at {}", profiles_dir.display());

    let service = DaemonClient::new(&config.daemon.url, &auth_key_path, profiles_dir)?;

    let output = OutputOptions {
        order: config.profiles.order,
        json: cli.json,
        separator: cli.separator.clone().unwrap_or_default(),
        palette: Palette::detect(),
    };

    let one_time_code = config
        .credentials
        .one_time_code
        .unwrap_or_else(|| layout.one_time_code_default());

    let mut app = App::new(&service, output);
    if one_time_code {
        app = app.with_credentials(Credentials {
            store: &KeyringStore,
            prompt: &TerminalPrompt,
            service: &config.credentials.keychain_service,
        });
    }

    let mut stdout = std::io::stdout().lock();
    app.run(action, &mut stdout).await
}
