//! Command-line front door for the contact directory.
//!
//! # Responsibility
//! - Turn one command into one invocation and print the response.
//! - Load configuration from the environment, with flag overrides.
//!
//! Exit code is 0 for 2xx responses and 1 otherwise.

use clap::{Args, Parser, Subcommand};
use contactbook_core::config::{ENV_DATABASE_URL, ENV_PAGE_SIZE};
use contactbook_core::{
    core_version, init_logging, ContactDirectory, InvocationRequest, InvocationResponse, Method,
    ServiceConfig,
};
use log::info;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "contactbook", about = "Contact book service front door")]
struct Cli {
    /// Storage target; overrides `DATABASE_URL`.
    #[arg(long, value_name = "URL", global = true)]
    database_url: Option<String>,
    /// Default page size; overrides `CONTACTS_PAGE_SIZE`.
    #[arg(long, value_name = "N", global = true)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a contact.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List one page of contacts, newest first.
    List {
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        limit: Option<String>,
    },
    /// Delete a contact by id.
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Send a raw invocation.
    Invoke(InvokeArgs),
    /// Print the core version.
    Version,
}

#[derive(Args, Debug)]
struct InvokeArgs {
    #[arg(long, default_value = "GET")]
    method: String,
    #[arg(long, default_value = "/contacts")]
    path: String,
    /// Query parameter as `key=value`; repeatable.
    #[arg(long = "query", value_name = "KEY=VALUE")]
    query: Vec<String>,
    #[arg(long)]
    body: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Command::Version = cli.command {
        println!("contactbook_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("contactbook: {message}");
            return ExitCode::from(2);
        }
    };
    if let Err(message) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("contactbook: {message}");
        return ExitCode::from(2);
    }

    let directory = match ContactDirectory::from_config(&config) {
        Ok(directory) => directory,
        Err(err) => {
            eprintln!("contactbook: {err}");
            return ExitCode::from(2);
        }
    };

    let request = match build_request(cli.command) {
        Ok(request) => request,
        Err(message) => {
            eprintln!("contactbook: {message}");
            directory.shutdown();
            return ExitCode::from(2);
        }
    };
    let response = directory.handle(&request);
    directory.shutdown();
    info!("event=cli_exit module=cli status_code={}", response.status);

    print_response(&response);
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn load_config(cli: &Cli) -> Result<ServiceConfig, String> {
    ServiceConfig::from_lookup(|key| match key {
        ENV_DATABASE_URL if cli.database_url.is_some() => cli.database_url.clone(),
        ENV_PAGE_SIZE if cli.page_size.is_some() => cli.page_size.map(|size| size.to_string()),
        _ => std::env::var(key).ok(),
    })
    .map_err(|err| err.to_string())
}

fn build_request(command: Command) -> Result<InvocationRequest, String> {
    let request = match command {
        Command::Add { name, email, phone } => {
            let body = serde_json::json!({ "name": name, "email": email, "phone": phone });
            InvocationRequest::post(body.to_string())
        }
        Command::List { page, limit } => {
            let mut request = InvocationRequest::get();
            if let Some(page) = page {
                request = request.with_query("page", page);
            }
            if let Some(limit) = limit {
                request = request.with_query("limit", limit);
            }
            request
        }
        Command::Delete { id } => {
            InvocationRequest::delete(serde_json::json!({ "id": id }).to_string())
        }
        Command::Invoke(args) => {
            let mut request =
                InvocationRequest::new(Method::parse(&args.method)).with_path(args.path);
            for pair in args.query {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("query `{pair}` must be KEY=VALUE"))?;
                request = request.with_query(key, value);
            }
            if let Some(body) = args.body {
                request = request.with_body(body);
            }
            request
        }
        Command::Version => return Err("version takes no invocation".to_string()),
    };
    Ok(request)
}

fn print_response(response: &InvocationResponse) {
    println!("status={}", response.status);
    println!("{}", response.body);
}
