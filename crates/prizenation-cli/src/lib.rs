#![forbid(unsafe_code)]

mod admin_commands;
mod command_output_adapters;
mod commands;
mod helpers;
mod logging;

use clap::{error::ErrorKind, ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Generator, Shell};
use prizenation_client::{ApiClient, ClientError, Session, SessionStore};
use prizenation_core::{ClientConfig, ConfigLayer, ExitCode, MachineError};
use prizenation_model::{PaymentMethod, WalletType};
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

pub const CRATE_NAME: &str = "prizenation-cli";

const PRIZENATION_HELP_TEMPLATE: &str = "{before-help}{name} {version}\n{about-with-newline}\nUsage: {usage}\n\nOptions:\n{options}\n\nCommands:\n{subcommands}\n{after-help}";

#[derive(Parser)]
#[command(name = "prizenation")]
#[command(version)]
#[command(about = "Prize Nation storefront and admin console")]
#[command(help_template = PRIZENATION_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  PRIZENATION_API_URL      Backend origin (default http://localhost:8001)\n  PRIZENATION_TIMEOUT_SECS Request timeout in seconds\n  PRIZENATION_LOG_LEVEL    Log filter when RUST_LOG is unset (default warn)\n  PRIZENATION_LOG_JSON     Emit logs as JSON lines\n  PRIZENATION_CONFIG_DIR   Directory holding config.toml and session.json"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,
    /// Overrides the configured backend origin.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a shell completion script.
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show resolved config paths and effective settings.
    Config,
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    Competitions {
        #[command(subcommand)]
        command: CompetitionsCommand,
    },
    Cart {
        #[command(subcommand)]
        command: CartCommand,
    },
    Checkout {
        #[command(subcommand)]
        command: CheckoutCommand,
    },
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
    Admin {
        #[command(subcommand)]
        command: Box<AdminCommand>,
    },
}

#[derive(Subcommand)]
enum AuthCommand {
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Re-read the signed-in user from the backend.
    Me,
    Logout,
}

#[derive(Subcommand)]
enum CompetitionsCommand {
    List {
        /// Category tab; `all` lists everything.
        #[arg(long)]
        tag: Option<String>,
    },
    Show {
        id: String,
    },
    Countdown {
        id: String,
        /// Print this many one-second updates instead of a single value.
        #[arg(long)]
        watch: Option<u32>,
    },
    Bundles {
        id: String,
    },
    /// Rotate through the hero slides.
    Featured {
        #[arg(long)]
        watch: Option<u32>,
        /// Jump to a slide; out-of-range indexes wrap.
        #[arg(long, conflicts_with_all = ["next", "previous"])]
        slide: Option<usize>,
        #[arg(long, conflicts_with = "previous")]
        next: bool,
        #[arg(long)]
        previous: bool,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    Show,
    Add {
        id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    Update {
        id: String,
        /// Zero removes the line.
        #[arg(long)]
        quantity: u32,
    },
    Clear,
    Coupon {
        code: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaymentMethodArg {
    SiteCredit,
    Cash,
    Card,
}

impl From<PaymentMethodArg> for PaymentMethod {
    fn from(value: PaymentMethodArg) -> Self {
        match value {
            PaymentMethodArg::SiteCredit => Self::SiteCredit,
            PaymentMethodArg::Cash => Self::Cash,
            PaymentMethodArg::Card => Self::Card,
        }
    }
}

#[derive(Subcommand)]
enum CheckoutCommand {
    Validate,
    Complete {
        #[arg(long, value_enum, default_value = "site-credit")]
        method: PaymentMethodArg,
    },
}

#[derive(Subcommand)]
enum OrdersCommand {
    List,
    Show { id: String },
}

#[derive(Subcommand)]
enum ThemeCommand {
    Get,
    Set {
        /// JSON object of theme keys.
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WalletTypeArg {
    SiteCredit,
    Cash,
}

impl From<WalletTypeArg> for WalletType {
    fn from(value: WalletTypeArg) -> Self {
        match value {
            WalletTypeArg::SiteCredit => Self::SiteCredit,
            WalletTypeArg::Cash => Self::Cash,
        }
    }
}

/// Competition form fields. Unset flags keep the form's current value.
#[derive(Args, Default)]
struct FormArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    sale_price: Option<String>,
    #[arg(long)]
    max_tickets: Option<String>,
    #[arg(long)]
    max_tickets_per_user: Option<String>,
    /// Displayed sold percentage override.
    #[arg(long)]
    sold: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    video: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,
    #[arg(long)]
    hot: Option<bool>,
    #[arg(long)]
    instant: Option<bool>,
    #[arg(long)]
    prize_value: Option<String>,
    #[arg(long)]
    end_datetime: Option<String>,
    #[arg(long)]
    instant_win_image: Option<String>,
    #[arg(long, value_enum)]
    instant_win_type: Option<WalletTypeArg>,
    /// Comma separated winning ticket numbers.
    #[arg(long)]
    instant_win_tickets: Option<String>,
    /// `quantity:percent` pairs, e.g. `10:0,25:5`.
    #[arg(long)]
    bulk_bundles: Option<String>,
    /// Upload a file and use it as the featured image or video.
    #[arg(long)]
    media_file: Option<PathBuf>,
    /// Upload a file and use it as the instant win image.
    #[arg(long)]
    instant_win_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum AdminCommand {
    Stats,
    Create {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Fetch a competition, overlay the given fields and save it.
    Update {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    Delete {
        id: String,
    },
    Entries {
        id: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    FindWinner {
        id: String,
        #[arg(long)]
        ticket: String,
    },
    MarkWinner {
        id: String,
        #[arg(long)]
        ticket: String,
    },
    Orders {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        status: String,
    },
    Upload {
        path: PathBuf,
    },
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError::usage("invalid command line arguments")
                    .with_detail("error", &err.to_string()));
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    if let Commands::Completion { shell } = command {
        print_completion(shell);
        return Ok(());
    }

    let flags = ConfigLayer::default().with_api_url(cli.api_url);
    let config = ClientConfig::load(flags).map_err(|e| CliError {
        exit_code: ExitCode::Usage,
        machine: MachineError::new("config_error", &e.to_string()),
    })?;
    logging::init(
        LogFlags {
            quiet: cli.quiet,
            verbose: cli.verbose,
            trace: cli.trace,
        },
        config.log_json,
    );

    if let Commands::Config = command {
        return helpers::emit_config(&config, output_mode).map_err(CliError::internal);
    }

    let mut ctx = Context::open(config, output_mode)?;
    match command {
        Commands::Completion { .. } | Commands::Config => Ok(()),
        Commands::Auth { command } => commands::run_auth(&mut ctx, command),
        Commands::Competitions { command } => commands::run_competitions(&ctx, command),
        Commands::Cart { command } => commands::run_cart(&ctx, command),
        Commands::Checkout { command } => commands::run_checkout(&mut ctx, command),
        Commands::Orders { command } => commands::run_orders(&ctx, command),
        Commands::Theme { command } => commands::run_theme(&ctx, command),
        Commands::Admin { command } => admin_commands::run_admin(&ctx, *command),
    }
}

#[derive(Clone, Copy)]
struct LogFlags {
    quiet: bool,
    verbose: u8,
    trace: bool,
}

#[derive(Clone, Copy)]
struct OutputMode {
    json: bool,
}

/// Everything a command needs: the API client with the stored session attached.
struct Context {
    api: ApiClient,
    session: Session,
    output: OutputMode,
}

impl Context {
    fn open(config: ClientConfig, output: OutputMode) -> Result<Self, CliError> {
        let mut api =
            ApiClient::new(config).map_err(|e| CliError::client(&e, "Failed to start client"))?;
        let session = Session::open(SessionStore::default_location())
            .map_err(|e| CliError::client(&e, "Failed to read session"))?;
        session.attach(&mut api);
        Ok(Self {
            api,
            session,
            output,
        })
    }
}

fn print_completion<G: Generator>(generator: G) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(generator, &mut command, name, &mut std::io::stdout());
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    fn dependency(message: &str) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", message),
        }
    }

    fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.machine = self.machine.with_detail(key, value);
        self
    }

    /// Maps a client failure onto an exit code, keeping the server's
    /// message when it sent one and `fallback` otherwise.
    fn client(err: &ClientError, fallback: &str) -> Self {
        let server_forbidden = matches!(err, ClientError::Api(api) if api.is_forbidden());
        let exit_code = match err {
            ClientError::Validation(_) | ClientError::Unauthenticated | ClientError::Forbidden(_) => {
                ExitCode::Validation
            }
            _ if server_forbidden => ExitCode::Validation,
            ClientError::Io { .. } => ExitCode::Internal,
            _ => ExitCode::DependencyFailure,
        };
        // A backend 403 reads the same as the local admin gate.
        let code = if server_forbidden { "forbidden" } else { err.code() };
        let mut machine = MachineError::new(code, &err.user_message(fallback));
        match err {
            ClientError::Validation(errors) => {
                for (field, message) in errors.iter() {
                    machine = machine.with_detail(field, message);
                }
            }
            ClientError::Api(api) => {
                if let Some(status) = api.status {
                    machine = machine.with_detail("status", &status.to_string());
                }
            }
            ClientError::Transport(_) | ClientError::Decode { .. } | ClientError::Io { .. } => {
                machine = machine.with_detail("cause", &err.to_string());
            }
            _ => {}
        }
        Self { exit_code, machine }
    }

    /// Local input rejected before any request.
    fn invalid(field: &'static str, message: String) -> Self {
        Self::client(&ClientError::invalid(field, message), "Invalid input")
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn validation_errors_exit_three_with_field_details() {
        let err = CliError::invalid("ticket", "Please enter a ticket number".to_string());
        assert_eq!(err.exit_code, ExitCode::Validation);
        assert_eq!(err.machine.code, "validation_error");
        assert_eq!(
            err.machine.details.get("ticket").map(String::as_str),
            Some("Please enter a ticket number")
        );
    }

    #[test]
    fn api_failures_keep_server_detail() {
        let api = prizenation_api::ApiError::from_response_body(400, br#"{"detail":"Sold out"}"#);
        let err = CliError::client(&ClientError::Api(api), "Failed to add to cart");
        assert_eq!(err.exit_code, ExitCode::DependencyFailure);
        assert_eq!(err.machine.message, "Sold out");
        assert_eq!(err.machine.details.get("status").map(String::as_str), Some("400"));
    }

    #[test]
    fn backend_forbidden_matches_local_admin_gate() {
        let api = prizenation_api::ApiError::from_response_body(
            403,
            br#"{"detail":"Admin access required"}"#,
        );
        let err = CliError::client(&ClientError::Api(api), "Failed to load data");
        assert_eq!(err.exit_code, ExitCode::Validation);
        assert_eq!(err.machine.code, "forbidden");
        assert_eq!(err.machine.message, "Admin access required");
        assert_eq!(err.machine.details.get("status").map(String::as_str), Some("403"));
    }

    #[test]
    fn transport_failures_fall_back_to_action_message() {
        let err = CliError::client(
            &ClientError::Transport("connection refused".to_string()),
            "Checkout failed",
        );
        assert_eq!(err.machine.message, "Checkout failed");
        assert_eq!(err.machine.code, "transport_error");
    }
}
