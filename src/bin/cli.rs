use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use clap::{Args, Parser, Subcommand};
use employee_access_admin::{
    cli::{
        access::{grant_access, revoke_access, show_catalog},
        employee::{
            add_employee, delete_employee, edit_employee, list_employees, set_employee_status,
            show_employee, EmployeeChanges,
        },
        export::export,
    },
    init_api_client,
    model::employee::AccountStatus,
    schema::employee::EmployeeForm,
    settings::get_config,
};
use tracing::Level;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Employee directory and profile commands
    Employees(EmployeesArgs),
    /// Application access commands
    Access(AccessArgs),
    /// Write an employee's profile and accesses to a text file
    Export {
        id: i64,
        /// Output directory, defaults to EXPORT_DIR
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct EmployeesArgs {
    #[command(subcommand)]
    command: EmployeesCommands,
}

#[derive(Debug, Subcommand)]
enum EmployeesCommands {
    /// List one page of employees
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<AccountStatus>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show an employee with their accesses
    Show { id: i64 },
    /// Add a new employee
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        job_title: String,
        /// Application to grant right after creation, repeatable
        #[arg(long = "grant")]
        grants: Vec<String>,
    },
    /// Edit an employee's profile
    Edit {
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        job_title: Option<String>,
        #[arg(long)]
        status: Option<AccountStatus>,
    },
    /// Mark an employee Active or Inactive
    Status { id: i64, status: AccountStatus },
    /// Delete an employee
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct AccessArgs {
    #[command(subcommand)]
    command: AccessCommands,
}

#[derive(Debug, Subcommand)]
enum AccessCommands {
    /// List applications available to an employee
    Catalog {
        id: i64,
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Grant one or more applications
    Grant {
        id: i64,
        #[arg(required = true)]
        applications: Vec<String>,
    },
    /// Revoke a granted access
    Revoke { id: i64, access_id: i64 },
}

fn prompt_yes(message: &str) -> bool {
    print!("{} [y/N] ", message);
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    answer.trim().eq_ignore_ascii_case("y")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = get_config()?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url.trim_end_matches('/').to_string();
    }

    // Logging to File
    let log_level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(log_level)
        .init();
    tracing::info!("using {} as environment variable", config.source());
    tracing::info!("run with config: {:?}", config);

    let api = init_api_client(&config)?;
    let mut out = io::stdout();
    match cli.command {
        Commands::Employees(args) => match args.command {
            EmployeesCommands::List {
                search,
                status,
                page,
            } => {
                list_employees(
                    &api,
                    config.page_size,
                    search.as_deref(),
                    status,
                    page,
                    &mut out,
                )
                .await?
            }
            EmployeesCommands::Show { id } => show_employee(&api, id, &mut out).await?,
            EmployeesCommands::Add {
                first_name,
                last_name,
                email,
                job_title,
                grants,
            } => {
                let form = EmployeeForm::new(&first_name, &last_name, &email, &job_title);
                add_employee(&api, config.page_size, &form, &grants, &mut out).await?;
            }
            EmployeesCommands::Edit {
                id,
                first_name,
                last_name,
                email,
                job_title,
                status,
            } => {
                let changes = EmployeeChanges {
                    first_name,
                    last_name,
                    email,
                    job_title,
                    account_status: status,
                };
                edit_employee(&api, id, &changes, &mut out).await?
            }
            EmployeesCommands::Status { id, status } => {
                set_employee_status(&api, id, status, &mut out).await?
            }
            EmployeesCommands::Delete { id, yes } => {
                delete_employee(
                    &api,
                    config.page_size,
                    id,
                    |x| yes || prompt_yes(&x.message()),
                    &mut out,
                )
                .await?;
            }
        },
        Commands::Access(args) => match args.command {
            AccessCommands::Catalog { id, filter } => {
                show_catalog(&api, id, filter.as_deref(), &mut out).await?
            }
            AccessCommands::Grant { id, applications } => {
                grant_access(&api, id, &applications, &mut out).await?;
            }
            AccessCommands::Revoke { id, access_id } => {
                revoke_access(&api, id, access_id, &mut out).await?
            }
        },
        Commands::Export { id, out: dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.export_dir));
            export(&api, id, &dir, &mut out).await?
        }
    }
    Ok(())
}
