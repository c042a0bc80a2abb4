use anyhow::{anyhow, Result};
use housekeeping_bot::config::DEFAULT_DATABASE_URL;
use housekeeping_bot::database::connection::{sqlite_file_path, DatabaseManager};
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    match command {
        "migrate" | "up" => run_migrations(&database_url).await,
        "check" => check_database(&database_url).await,
        "reset" => reset_database(&database_url).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn run_migrations(database_url: &str) -> Result<()> {
    println!("🧹 Housekeeping Bot - database migrations");
    println!("📊 Database: {}", mask_url(database_url));

    let db = DatabaseManager::new(database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match db.run_migrations().await {
        Ok(_) => {
            println!("✅ Schema is up to date.");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn check_database(database_url: &str) -> Result<()> {
    println!("🔍 Checking {}", mask_url(database_url));

    let db = DatabaseManager::new(database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&db.pool)
    .await?;

    let missing: Vec<&str> = ["rooms", "users", "settings"]
        .into_iter()
        .filter(|t| !tables.iter().any(|found| found == t))
        .collect();

    println!("📋 Tables: {}", tables.join(", "));
    if missing.is_empty() {
        let rooms = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms")
            .fetch_one(&db.pool)
            .await?;
        println!("✅ Schema complete, {rooms} room records stored.");
    } else {
        println!("⚠️  Missing tables: {}", missing.join(", "));
        println!("💡 Run 'migrate up' to create them");
    }

    Ok(())
}

async fn reset_database(database_url: &str) -> Result<()> {
    let path = sqlite_file_path(database_url)
        .ok_or_else(|| anyhow!("Reset is only supported for file-backed SQLite databases"))?
        .to_path_buf();

    println!("⚠️  This deletes every plan, user and setting in {}", path.display());
    println!("Type 'yes' to continue:");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    for suffix in ["", "-wal", "-shm"] {
        let file = format!("{}{}", path.display(), suffix);
        if Path::new(&file).exists() {
            std::fs::remove_file(&file)?;
            println!("🗑️  Deleted {file}");
        }
    }

    run_migrations(database_url).await
}

fn mask_url(url: &str) -> String {
    match sqlite_file_path(url).and_then(|p| p.file_name()) {
        Some(name) => format!("sqlite:.../{}", name.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🧹 Housekeeping Bot - database migration tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Apply pending migrations (default)");
    println!("    check          Show tables and whether the schema is complete");
    println!("    reset          Delete the SQLite file and recreate the schema");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: {DEFAULT_DATABASE_URL})");
}
