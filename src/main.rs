//! Command-line front end for the pump inventory client.
//!
//! Each invocation builds an [`AppContext`], runs one command against the
//! stores and prints the rendered result:
//!
//! ```text
//! pump-inventory login --email nurse@chu.example
//! pump-inventory list pumps --search maintenance
//! pump-inventory set-status 12 in-use
//! pump-inventory dashboard
//! ```
//!
//! Exit status is 0 on success and 1 when the command failed. Failures are
//! reported on stderr.

use clap::{Parser, Subcommand, ValueEnum};
use pump_inventory::domain::{ItemId, NewPump, NewPumpModel, PumpPatch, PumpStatus, Resource, Searchable};
use pump_inventory::observability::init_tracing;
use pump_inventory::store::ResourceStore;
use pump_inventory::ui::{compute_list_view, render_dashboard, render_list, RenderOptions, Tabular};
use pump_inventory::{initialize, ActionHook, AppContext, Config};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pump-inventory", version, about = "Browse and edit the infusion pump inventory")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML config file.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// When to use ANSI colors.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorArg,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session.
    Login {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the session and every cached collection.
    Logout,

    /// Show one collection.
    List {
        #[arg(value_enum)]
        resource: ResourceArg,

        /// Only show records containing this text.
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show aggregate pump counts.
    Dashboard,

    /// Register a new pump.
    CreatePump {
        #[arg(long)]
        serial: String,

        #[arg(long = "inventory-code")]
        inventory_code: String,

        #[arg(long = "model-id")]
        model_id: ItemId,

        #[arg(long = "institution-id")]
        institution_id: Option<ItemId>,

        #[arg(long = "service-id")]
        service_id: Option<ItemId>,

        #[arg(long, value_parser = parse_status, default_value = "available")]
        status: PumpStatus,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Register a new pump model.
    CreateModel {
        #[arg(long)]
        code: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        manufacturer: String,
    },

    /// Change the status of a pump.
    SetStatus {
        id: ItemId,

        #[arg(value_parser = parse_status)]
        status: PumpStatus,
    },

    /// Delete one record.
    Delete {
        #[arg(value_enum)]
        resource: ResourceArg,

        id: ItemId,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceArg {
    Pumps,
    Models,
    Institutions,
    Services,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

fn parse_status(value: &str) -> Result<PumpStatus, String> {
    PumpStatus::parse(value)
        .ok_or_else(|| format!("unknown status {value:?} (available, in-use, maintenance, decommissioned)"))
}

fn load_config(path: Option<&PathBuf>) -> pump_inventory::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    Ok(config.with_env_overrides())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let context = match initialize(&config) {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, "initialization failed");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = RenderOptions {
        color: match cli.color {
            ColorArg::Always => true,
            ColorArg::Never => false,
            ColorArg::Auto => io::stdout().is_terminal(),
        },
    };

    if run(&context, cli.command, options).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(context: &AppContext, command: Command, options: RenderOptions) -> bool {
    match command {
        Command::Login { email, password } => login(context, &email, password).await,
        Command::Logout => {
            context.sign_out();
            println!("Signed out");
            true
        }
        Command::List { resource, search } => list(context, resource, search, options).await,
        Command::Dashboard => {
            if !context.dashboard.refresh().await {
                return false;
            }
            let state = context.dashboard.snapshot();
            match (state.data, state.error) {
                (_, Some(error)) => {
                    eprintln!("error: {error}");
                    false
                }
                (data, None) => {
                    print!("{}", render_dashboard(&data.unwrap_or_default(), options));
                    true
                }
            }
        }
        Command::CreatePump {
            serial,
            inventory_code,
            model_id,
            institution_id,
            service_id,
            status,
            notes,
        } => {
            let input = NewPump {
                serial_number: serial,
                inventory_code,
                model_id,
                institution_id,
                service_id,
                status,
                notes,
            };
            let hook = context.pump_actions();
            let id = hook.create(&input).await;
            report(&hook, id.map(|id| format!("id {id}")))
        }
        Command::CreateModel {
            code,
            name,
            manufacturer,
        } => {
            let input = NewPumpModel {
                code,
                name,
                manufacturer,
            };
            let hook = context.model_actions();
            let id = hook.create(&input).await;
            report(&hook, id.map(|id| format!("id {id}")))
        }
        Command::SetStatus { id, status } => {
            let hook = context.pump_actions();
            let pump = hook.update(id, &PumpPatch::status(status)).await;
            report(&hook, pump.map(|p| format!("{} is now {}", p.serial_number, p.status)))
        }
        Command::Delete { resource, id } => delete(context, resource, id).await,
    }
}

async fn login(context: &AppContext, email: &str, password: Option<String>) -> bool {
    let password = match password {
        Some(password) => password,
        None => match read_password() {
            Ok(password) => password,
            Err(e) => {
                eprintln!("error: could not read password: {e}");
                return false;
            }
        },
    };

    match context.auth.login(email, &password).await {
        Ok(user) => {
            let name = if user.name.is_empty() { &user.email } else { &user.name };
            println!("Signed in as {name}");
            true
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}

fn read_password() -> io::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn list(context: &AppContext, resource: ResourceArg, search: Option<String>, options: RenderOptions) -> bool {
    let term = search.unwrap_or_default();
    match resource {
        ResourceArg::Pumps => {
            context.pumps.set_search_term(term);
            context.pumps.fetch_all().await;
            print_collection(context, "Pumps", &context.pumps, options)
        }
        ResourceArg::Models => {
            context.models.set_search_term(term);
            context.models.fetch_all().await;
            print_collection(context, "Pump models", &context.models, options)
        }
        ResourceArg::Institutions | ResourceArg::Services => {
            context.catalogs.institutions.set_search_term(term.clone());
            context.catalogs.services.set_search_term(term);
            // Errors are recorded on both stores and rendered below.
            let _ = context.catalogs.load_all().await;
            if matches!(resource, ResourceArg::Institutions) {
                print_collection(context, "Institutions", &context.catalogs.institutions, options)
            } else {
                print_collection(context, "Services", &context.catalogs.services, options)
            }
        }
    }
}

/// Prints one list screen. Returns `false` when the screen shows an error.
fn print_collection<T>(context: &AppContext, title: &str, store: &ResourceStore<T>, options: RenderOptions) -> bool
where
    T: Resource + Searchable + Tabular,
{
    let state = store.snapshot();
    let view = store.filtered();
    let list = compute_list_view(store.name(), context.auth.is_pending(), &state, &view);
    tracing::debug!(store = %store.name(), view = list.kind(), "rendering list");

    print!("{}", render_list(title, &list, options));
    state.error.is_none()
}

async fn delete(context: &AppContext, resource: ResourceArg, id: ItemId) -> bool {
    match resource {
        ResourceArg::Pumps => {
            let hook = context.pump_actions();
            let deleted = hook.delete(id).await;
            report(&hook, deleted.then(|| format!("id {id}")))
        }
        ResourceArg::Models => {
            let hook = context.model_actions();
            let deleted = hook.delete(id).await;
            report(&hook, deleted.then(|| format!("id {id}")))
        }
        ResourceArg::Institutions => outcome(context.catalogs.institutions.delete(id).await, "Institution deleted"),
        ResourceArg::Services => outcome(context.catalogs.services.delete(id).await, "Service deleted"),
    }
}

/// Prints an action hook's feedback. `detail` is appended to the success message.
fn report<T: Resource>(hook: &ActionHook<T>, detail: Option<String>) -> bool {
    let state = hook.state();
    if let Some(error) = state.error_action {
        eprintln!("error: {error}");
        return false;
    }
    match (state.success, detail) {
        (Some(message), Some(detail)) => println!("{message} ({detail})"),
        (Some(message), None) => println!("{message}"),
        (None, _) => {}
    }
    true
}

fn outcome(result: pump_inventory::Result<()>, message: &str) -> bool {
    match result {
        Ok(()) => {
            println!("{message}");
            true
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}
