use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status} ({code}): {message}")]
    ServerError { status: u16, code: String, message: String },
    #[error("cannot read or write {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "labstock", about = "Lab component inventory API CLI")]
struct Cli {
    #[arg(long, env = "LABSTOCK_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
}

impl CliContext {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Components(ComponentsCommand),
    /// Check units out to a student.
    Issue {
        component_id: Uuid,
        #[arg(long)]
        student: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Return an issue in full.
    Return { component_id: Uuid, issue_id: Uuid },
    Maintenance(MaintenanceCommand),
    LowStock,
    Report,
    /// Import components from a CSV file. All rows or none.
    Import { file: PathBuf },
    /// Export the registry as CSV.
    Export {
        #[arg(long, help = "Output file path; stdout when absent")]
        output: Option<PathBuf>,
    },
    Backup(BackupCommand),
}

#[derive(Args, Debug)]
struct ComponentsCommand {
    #[command(subcommand)]
    command: ComponentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ComponentsSubcommand {
    List {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = false)]
        issuable: bool,
    },
    Show {
        id: Uuid,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        low_stock_threshold: Option<u32>,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Args, Debug)]
struct MaintenanceCommand {
    #[command(subcommand)]
    command: MaintenanceSubcommand,
}

#[derive(Subcommand, Debug)]
enum MaintenanceSubcommand {
    /// Flip the maintenance lockout.
    Toggle { component_id: Uuid },
    /// Append a maintenance log entry.
    Log { component_id: Uuid, notes: String },
    /// Delete a maintenance log entry.
    Unlog { component_id: Uuid, log_id: Uuid },
}

#[derive(Args, Debug)]
struct BackupCommand {
    #[command(subcommand)]
    command: BackupSubcommand,
}

#[derive(Subcommand, Debug)]
enum BackupSubcommand {
    Export {
        #[arg(long, help = "Output file path; stdout when absent")]
        output: Option<PathBuf>,
    },
    /// Overwrite every collection with a backup file.
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Components(components) => run_components(&ctx, components).await,
        Command::Issue { component_id, student, quantity } => {
            let path = format!("/api/components/{component_id}/issues");
            let body = serde_json::json!({ "studentName": student, "quantity": quantity });
            let json = api_request(&ctx, reqwest::Method::POST, &path, Some(body)).await?;
            print_json(&json)
        }
        Command::Return { component_id, issue_id } => {
            let path = format!("/api/components/{component_id}/issues/{issue_id}");
            let json = api_request(&ctx, reqwest::Method::DELETE, &path, None).await?;
            print_json(&json)
        }
        Command::Maintenance(maintenance) => run_maintenance(&ctx, maintenance).await,
        Command::LowStock => {
            let json = api_request(&ctx, reqwest::Method::GET, "/api/low-stock", None).await?;
            print_json(&json)
        }
        Command::Report => {
            let json = api_request(&ctx, reqwest::Method::GET, "/api/report", None).await?;
            print_json(&json)
        }
        Command::Import { file } => {
            let text = read_file(&file)?;
            let json = text_request(&ctx, reqwest::Method::POST, "/api/components/import.csv", text).await?;
            print_json(&serde_json::from_str::<Value>(&json)?)
        }
        Command::Export { output } => {
            let text = text_request(&ctx, reqwest::Method::GET, "/api/components/export.csv", String::new()).await?;
            write_output(output, &text)
        }
        Command::Backup(backup) => run_backup(&ctx, backup).await,
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let response = client.get(cli.url("/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError {
            status: status.as_u16(),
            code: "E_HEALTH".to_owned(),
            message: "health check failed".to_owned(),
        });
    }
    println!("ok");
    Ok(())
}

async fn run_components(cli: &CliContext, components: ComponentsCommand) -> Result<(), CliError> {
    match components.command {
        ComponentsSubcommand::List { query, category, issuable } => {
            let params = list_params(query, category, issuable);
            let response = reqwest::Client::new()
                .get(cli.url("/api/components"))
                .query(&params)
                .send()
                .await?;
            let json = read_json(response).await?;
            print_json(&json)
        }
        ComponentsSubcommand::Show { id } => {
            let path = format!("/api/components/{id}");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)
        }
        ComponentsSubcommand::Create { name, category, quantity, description, low_stock_threshold } => {
            let body = serde_json::json!({
                "name": name,
                "category": category,
                "totalQuantity": quantity,
                "description": description,
                "lowStockThreshold": low_stock_threshold,
            });
            let json = api_request(cli, reqwest::Method::POST, "/api/components", Some(body)).await?;
            print_json(&json)
        }
        ComponentsSubcommand::Delete { id } => {
            let path = format!("/api/components/{id}");
            api_request(cli, reqwest::Method::DELETE, &path, None).await?;
            println!("deleted {id}");
            Ok(())
        }
    }
}

async fn run_maintenance(cli: &CliContext, maintenance: MaintenanceCommand) -> Result<(), CliError> {
    match maintenance.command {
        MaintenanceSubcommand::Toggle { component_id } => {
            let path = format!("/api/components/{component_id}/maintenance");
            let json = api_request(cli, reqwest::Method::POST, &path, None).await?;
            print_json(&json)
        }
        MaintenanceSubcommand::Log { component_id, notes } => {
            let path = format!("/api/components/{component_id}/maintenance/logs");
            let body = serde_json::json!({ "notes": notes });
            let json = api_request(cli, reqwest::Method::POST, &path, Some(body)).await?;
            if json.is_null() {
                println!("blank notes, nothing logged");
                return Ok(());
            }
            print_json(&json)
        }
        MaintenanceSubcommand::Unlog { component_id, log_id } => {
            let path = format!("/api/components/{component_id}/maintenance/logs/{log_id}");
            let json = api_request(cli, reqwest::Method::DELETE, &path, None).await?;
            print_json(&json)
        }
    }
}

async fn run_backup(cli: &CliContext, backup: BackupCommand) -> Result<(), CliError> {
    match backup.command {
        BackupSubcommand::Export { output } => {
            let json = api_request(cli, reqwest::Method::GET, "/api/backup", None).await?;
            write_output(output, &serde_json::to_string_pretty(&json)?)
        }
        BackupSubcommand::Import { file } => {
            let text = read_file(&file)?;
            let json = text_request(cli, reqwest::Method::POST, "/api/backup", text).await?;
            print_json(&serde_json::from_str::<Value>(&json)?)
        }
    }
}

// =============================================================================
// HTTP
// =============================================================================

fn list_params(query: Option<String>, category: Option<String>, issuable: bool) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(query) = query {
        params.push(("q", query));
    }
    if let Some(category) = category {
        params.push(("category", category));
    }
    if issuable {
        params.push(("issuable", "true".to_owned()));
    }
    params
}

/// Turn a non-success response into a `ServerError`, reading the
/// `{code, message, row?}` body when the server sent one.
fn server_error(status: reqwest::StatusCode, body: &str) -> CliError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = |key: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    CliError::ServerError {
        status: status.as_u16(),
        code: field("code").unwrap_or_else(|| "E_HTTP".to_owned()),
        message: field("message").unwrap_or_else(|| body.trim().to_owned()),
    }
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::new();
    let request = client.request(method, cli.url(path));
    let request = if let Some(json) = body {
        request.json(&json)
    } else {
        request
    };

    read_json(request.send().await?).await
}

/// Decode a JSON response. An empty success body (204) reads as `null`.
async fn read_json(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(server_error(status, &text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Send a raw text body and return the raw response text.
async fn text_request(cli: &CliContext, method: reqwest::Method, path: &str, body: String) -> Result<String, CliError> {
    let client = reqwest::Client::new();
    let mut request = client.request(method, cli.url(path));
    if !body.is_empty() {
        request = request.header(CONTENT_TYPE, "text/plain; charset=utf-8").body(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(server_error(status, &text));
    }
    Ok(text)
}

// =============================================================================
// OUTPUT
// =============================================================================

fn read_file(path: &PathBuf) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::File { path: path.clone(), source })
}

fn write_output(output: Option<PathBuf>, text: &str) -> Result<(), CliError> {
    match output {
        Some(path) => {
            std::fs::write(&path, text).map_err(|source| CliError::File { path: path.clone(), source })?;
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
