mod render;

use std::fmt;
use std::io::{BufRead, Write};

use daylog_core::model::{EntryId, UserId};
use services::{AppServices, Clock, DeleteOutcome, LoadOutcome, ProgressDashboard};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArg { name: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidEntryId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArg { name } => write!(f, "missing required {name}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidEntryId { raw } => write!(f, "invalid entry id: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  daylog [dashboard] [--db <sqlite_url>] [--user <id>] [--json]");
    eprintln!("  daylog add --heading <text> [--date YYYY-MM-DD] [--description <text>]");
    eprintln!("             [--url <video_url>] [--image <image_url>] [--db ..] [--user ..]");
    eprintln!("  daylog delete <entry_id> [--yes] [--db ..] [--user ..]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:daylog.sqlite3");
    eprintln!("  --user 1");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DAYLOG_DB_URL, DAYLOG_USER_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dashboard,
    Add,
    Delete,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "dashboard" => Some(Self::Dashboard),
            "add" => Some(Self::Add),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct AddArgs {
    heading: Option<String>,
    date: Option<String>,
    description: Option<String>,
    video_url: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug)]
struct Args {
    db_url: String,
    user_id: UserId,
    json: bool,
    assume_yes: bool,
    entry_id: Option<EntryId>,
    add: AddArgs,
}

impl Args {
    fn from_env() -> Self {
        let db_url = std::env::var("DAYLOG_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://daylog.sqlite3".into(), normalize_sqlite_url);
        let user_id = std::env::var("DAYLOG_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .unwrap_or_else(|| UserId::new(1));
        Self {
            db_url,
            user_id,
            json: false,
            assume_yes: false,
            entry_id: None,
            add: AddArgs::default(),
        }
    }

    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env();

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (_, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                (_, "--user") => {
                    let value = require_value(args, "--user")?;
                    parsed.user_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                (Command::Dashboard, "--json") => parsed.json = true,
                (Command::Add, "--heading") => {
                    parsed.add.heading = Some(require_value(args, "--heading")?);
                }
                (Command::Add, "--date") => {
                    parsed.add.date = Some(require_value(args, "--date")?);
                }
                (Command::Add, "--description") => {
                    parsed.add.description = Some(require_value(args, "--description")?);
                }
                (Command::Add, "--url") => {
                    parsed.add.video_url = Some(require_value(args, "--url")?);
                }
                (Command::Add, "--image") => {
                    parsed.add.image_url = Some(require_value(args, "--image")?);
                }
                (Command::Delete, "--yes" | "-y") => parsed.assume_yes = true,
                (Command::Delete, raw) if !raw.starts_with('-') && parsed.entry_id.is_none() => {
                    let id = raw
                        .parse()
                        .map_err(|_| ArgsError::InvalidEntryId { raw: arg.clone() })?;
                    parsed.entry_id = Some(id);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        match cmd {
            Command::Add if parsed.add.heading.is_none() => {
                Err(ArgsError::MissingArg { name: "--heading" })
            }
            Command::Delete if parsed.entry_id.is_none() => {
                Err(ArgsError::MissingArg { name: "entry id" })
            }
            _ => Ok(parsed),
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,services=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn confirm_delete() -> std::io::Result<bool> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Are you sure you want to delete this entry? [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn print_dashboard(dashboard: &ProgressDashboard, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard.view().snapshot())?);
    } else {
        print!("{}", render::dashboard(dashboard.view()));
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand shows the dashboard.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Dashboard,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Dashboard,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), parsed.user_id).await?;
    let mut dashboard = services.dashboard();

    match cmd {
        Command::Dashboard => {
            if dashboard.load().await == LoadOutcome::FellBackToEmpty {
                tracing::warn!("dashboard shown without stored entries");
            }
            print_dashboard(&dashboard, parsed.json)?;
            Ok(())
        }
        Command::Add => {
            let add = parsed.add;
            let mut draft = services
                .entry_service()
                .draft_for_today(add.heading.unwrap_or_default());
            if let Some(date) = add.date {
                draft = draft.with_date(date);
            }
            if let Some(description) = add.description {
                draft = draft.with_description(description);
            }
            if let Some(url) = add.video_url {
                draft = draft.with_video_url(url);
            }
            if let Some(url) = add.image_url {
                draft = draft.with_image_url(url);
            }

            match dashboard.create(draft).await {
                Ok(id) => {
                    println!("Saved entry {id}.");
                    println!();
                    print_dashboard(&dashboard, false)?;
                    Ok(())
                }
                Err(err) => {
                    eprintln!("{}", render::SAVE_FAILED);
                    Err(err.into())
                }
            }
        }
        Command::Delete => {
            let Some(id) = parsed.entry_id else {
                return Err(ArgsError::MissingArg { name: "entry id" }.into());
            };
            dashboard.load().await;

            if !dashboard.contains(id) {
                println!("No entry {id} for user {}.", dashboard.user_id());
                return Ok(());
            }
            if !parsed.assume_yes && !confirm_delete()? {
                println!("Kept entry {id}.");
                return Ok(());
            }

            match dashboard.delete(id).await {
                Ok(DeleteOutcome::Removed) => {
                    println!("Deleted entry {id}.");
                    println!();
                    print_dashboard(&dashboard, false)?;
                    Ok(())
                }
                Ok(DeleteOutcome::AlreadyAbsent) => {
                    println!("No entry {id} for user {}.", dashboard.user_id());
                    Ok(())
                }
                Err(err) => {
                    print_dashboard(&dashboard, false)?;
                    eprintln!();
                    eprintln!("{}", render::DELETE_FAILED);
                    Err(err.into())
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
