use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use reqwest;
use serde::{Deserialize, Serialize};

const API_URL: &str = "http://localhost:3000";
const SESSION_FILE: &str = ".session";

#[derive(Parser)]
#[command(name = "report-log")]
#[command(about = "A CLI client for the report log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Log in and store the session cookie")]
    Login {
        #[arg(short, long, help = "Username")]
        username: String,

        #[arg(short, long, help = "Password")]
        password: String,
    },

    #[command(about = "Log out and discard the session cookie")]
    Logout,

    #[command(about = "Submit a new report")]
    Submit {
        #[arg(short, long, help = "Name of the person being reported")]
        name: String,

        #[arg(short, long, help = "Reason for the report")]
        reason: String,

        #[arg(short, long, help = "Date of the incident")]
        date: String,
    },

    #[command(about = "List all reports, newest first")]
    List,

    #[command(about = "Show the total report count")]
    Count,

    #[command(about = "Show a single report by id")]
    Show {
        #[arg(help = "Report id")]
        id: String,
    },
}

#[derive(Debug, Serialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct CreateReportRequest {
    name: String,
    reason: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    success: bool,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Report {
    id: String,
    name: String,
    reason: String,
    date: String,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    report: Report,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: usize,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login { username, password } => login(username, password).await,
        Commands::Logout => logout().await,
        Commands::Submit { name, reason, date } => submit_report(name, reason, date).await,
        Commands::List => list_reports().await,
        Commands::Count => show_count().await,
        Commands::Show { id } => show_report(id).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn client() -> Result<reqwest::Client, Box<dyn std::error::Error>> {
    // Redirects stay visible: the server answers protected requests with a
    // redirect to the login page when the session is missing or expired.
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

fn session_cookie() -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(SESSION_FILE)
        .map(|s| s.trim().to_string())
        .map_err(|_| "Not logged in. Run `cli login` first.".into())
}

fn check_session(response: &reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if response.status().is_redirection() {
        return Err("Session expired. Run `cli login` again.".into());
    }
    Ok(())
}

async fn login(username: String, password: String) -> Result<(), Box<dyn std::error::Error>> {
    let response = client()?
        .post(format!("{}/login", API_URL))
        .json(&LoginRequest { username, password })
        .send()
        .await?;

    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let result: StatusResponse = response.json().await?;

    if !result.success {
        let message = result.message.unwrap_or_else(|| "Login failed".to_string());
        return Err(message.into());
    }

    let cookie = cookie.ok_or("Server did not set a session cookie")?;
    std::fs::write(SESSION_FILE, cookie)?;

    println!("✅ Logged in.");
    Ok(())
}

async fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let response = client()?
        .post(format!("{}/logout", API_URL))
        .send()
        .await?;

    let _: StatusResponse = response.json().await?;

    // The local cookie file may already be gone; that is fine.
    let _ = std::fs::remove_file(SESSION_FILE);

    println!("✅ Logged out.");
    Ok(())
}

async fn submit_report(
    name: String,
    reason: String,
    date: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let cookie = session_cookie()?;

    let response = client()?
        .post(format!("{}/api/reports", API_URL))
        .header(reqwest::header::COOKIE, cookie)
        .json(&CreateReportRequest { name, reason, date })
        .send()
        .await?;

    check_session(&response)?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(format!("Failed to submit report: {}", error_text).into());
    }

    let result: ReportResponse = response.json().await?;

    println!("✅ Report submitted!");
    println!("   Name:   {}", result.report.name);
    println!("   Reason: {}", result.report.reason);
    println!("   Date:   {}", result.report.date);
    println!("   ID:     {}", result.report.id);

    Ok(())
}

async fn list_reports() -> Result<(), Box<dyn std::error::Error>> {
    let cookie = session_cookie()?;

    let response = client()?
        .get(format!("{}/api/reports", API_URL))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await?;

    check_session(&response)?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(format!("Failed to fetch reports: {}", error_text).into());
    }

    let reports: Vec<Report> = response.json().await?;

    if reports.is_empty() {
        println!("📭 No reports found.");
        return Ok(());
    }

    println!("\n📋 Reports ({})\n", reports.len());

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Reason"),
        Cell::new("Date"),
    ]));

    for report in reports {
        table.add_row(Row::new(vec![
            Cell::new(&report.id),
            Cell::new(&report.name),
            Cell::new(&report.reason),
            Cell::new(&report.date),
        ]));
    }

    table.printstd();
    println!();

    Ok(())
}

async fn show_count() -> Result<(), Box<dyn std::error::Error>> {
    let cookie = session_cookie()?;

    let response = client()?
        .get(format!("{}/api/reports-count", API_URL))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await?;

    check_session(&response)?;

    let result: CountResponse = response.json().await?;
    println!("📊 Total reports: {}", result.count);

    Ok(())
}

async fn show_report(id: String) -> Result<(), Box<dyn std::error::Error>> {
    let cookie = session_cookie()?;

    let response = client()?
        .get(format!("{}/api/reports/{}", API_URL, id))
        .header(reqwest::header::COOKIE, cookie)
        .send()
        .await?;

    check_session(&response)?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(format!("No report with id {}", id).into());
    }

    let result: ReportResponse = response.json().await?;

    println!("📄 Report {}", result.report.id);
    println!("   Name:   {}", result.report.name);
    println!("   Reason: {}", result.report.reason);
    println!("   Date:   {}", result.report.date);

    Ok(())
}
