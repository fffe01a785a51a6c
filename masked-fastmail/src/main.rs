mod commands;
mod output;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use masked_email::{
    normalize_email_input, prepare_domain_input, ClientError, Config, DomainError, FastmailClient,
    MaskedEmailState,
};
use output::{format_output, print_error, print_warning, ErrorResponse, ExitCode, OutputFormat, Response};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "masked_fastmail", version)]
#[command(about = "Look up or create Fastmail masked email addresses", long_about = None)]
#[command(group(ArgGroup::new("action").multiple(false)))]
struct Cli {
    /// Domain to look up, or the alias email for state and description changes
    identifier: String,

    /// Description for a newly created alias
    #[arg(conflicts_with = "action")]
    description: Option<String>,

    /// Enable the alias with this email
    #[arg(short, long, group = "action")]
    enable: bool,

    /// Disable the alias with this email
    #[arg(short, long, group = "action")]
    disable: bool,

    /// Delete the alias with this email
    #[arg(long, group = "action")]
    delete: bool,

    /// List aliases for the domain without creating one
    #[arg(short, long, group = "action")]
    list: bool,

    /// Set the description of the alias with this email
    #[arg(long, value_name = "TEXT", group = "action")]
    set_description: Option<String>,

    /// Log raw requests and responses to stderr
    #[arg(long)]
    debug: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    format: OutputFormat,
}

#[derive(Debug, PartialEq)]
enum Action {
    Lookup { description: Option<String> },
    List,
    SetState(MaskedEmailState),
    SetDescription(String),
}

impl Cli {
    fn action(&self) -> Action {
        if self.enable {
            Action::SetState(MaskedEmailState::Enabled)
        } else if self.disable {
            Action::SetState(MaskedEmailState::Disabled)
        } else if self.delete {
            Action::SetState(MaskedEmailState::Deleted)
        } else if self.list {
            Action::List
        } else if let Some(text) = &self.set_description {
            Action::SetDescription(text.clone())
        } else {
            Action::Lookup {
                description: self.description.clone(),
            }
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "warn,jmap_client=debug,masked_email=debug,masked_fastmail=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn connect() -> Result<FastmailClient> {
    let config = Config::load()?;
    config.validate()?;
    Ok(FastmailClient::connect(&config).await?)
}

async fn run(cli: &Cli) -> Result<String> {
    let format = cli.format;
    match cli.action() {
        Action::Lookup { description } => {
            let input = prepare_domain_input(&cli.identifier)?;
            let client = connect().await?;
            let outcome =
                commands::lookup_or_create(&client, &input, description.as_deref()).await?;
            if outcome.description_ignored && !format.is_json() {
                print_warning("alias already exists, description was not applied");
            }
            Ok(format_output(&outcome, format))
        }
        Action::List => {
            let input = prepare_domain_input(&cli.identifier)?;
            let client = connect().await?;
            let outcome = commands::list_aliases(&client, &input).await?;
            Ok(format_output(&outcome, format))
        }
        Action::SetState(state) => {
            let email = normalize_email_input(&cli.identifier)?;
            let client = connect().await?;
            let change = commands::set_state(&client, &email, state).await?;
            Ok(format_output(&change, format))
        }
        Action::SetDescription(text) => {
            let email = normalize_email_input(&cli.identifier)?;
            let client = connect().await?;
            let change = commands::set_description(&client, &email, &text).await?;
            Ok(format_output(&change, format))
        }
    }
}

fn error_response(err: &anyhow::Error) -> ErrorResponse {
    if let Some(domain_err) = err.downcast_ref::<DomainError>() {
        return ErrorResponse::validation_failed(domain_err.to_string());
    }
    match err.downcast_ref::<ClientError>() {
        Some(client_err) if client_err.is_not_found() => {
            ErrorResponse::not_found(client_err.to_string())
        }
        Some(client_err) if client_err.is_transient() => {
            ErrorResponse::transport(client_err.to_string())
        }
        Some(ClientError::AlreadyInState { .. }) => ErrorResponse::validation_failed(err.to_string()),
        Some(ClientError::Jmap(jmap_err)) => {
            let details = jmap_err
                .method_error()
                .and_then(|method_err| method_err.raw.clone());
            ErrorResponse::api_error(jmap_err.to_string(), details)
        }
        Some(client_err) => ErrorResponse::api_error(client_err.to_string(), None),
        // Configuration problems
        None => ErrorResponse::validation_failed(format!("{:#}", err)),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli).await {
        Ok(text) => {
            println!("{}", text);
            std::process::exit(ExitCode::Success.code());
        }
        Err(err) => {
            let response = error_response(&err);
            let code = response.exit_code();
            if cli.format.is_json() {
                println!("{}", Response::error(response).to_json_string());
            } else {
                print_error(&format!("{:#}", err));
            }
            std::process::exit(code.code());
        }
    }
}
