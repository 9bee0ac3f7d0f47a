use std::fmt;

use chrono::{DateTime, Duration, Utc};
use daylog_core::model::{EntryDay, EntryDraft, UserId};
use storage::repository::{ProgressRepository, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    user_id: UserId,
    days: u32,
    per_day: u32,
    skip_today: bool,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidDays { raw: String },
    InvalidPerDay { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidDays { raw } => write!(f, "invalid --days value: {raw}"),
            ArgsError::InvalidPerDay { raw } => write!(f, "invalid --per-day value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("DAYLOG_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3?mode=rwc".into());
        let mut user_id = std::env::var("DAYLOG_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .unwrap_or_else(|| UserId::new(1));
        let mut days = std::env::var("DAYLOG_SEED_DAYS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(7);
        let mut per_day = 2_u32;
        let mut skip_today = false;
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    user_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                }
                "--days" => {
                    let value = require_value(&mut args, "--days")?;
                    days = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidDays { raw: value.clone() })?;
                }
                "--per-day" => {
                    let value = require_value(&mut args, "--per-day")?;
                    per_day = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ArgsError::InvalidPerDay { raw: value.clone() })?;
                }
                "--skip-today" => skip_today = true,
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            user_id,
            days,
            per_day,
            skip_today,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3?mode=rwc)");
    eprintln!("  --user <id>               Owner of the seeded entries (default: 1)");
    eprintln!("  --days <n>                Consecutive days to fill, ending today (default: 7)");
    eprintln!("  --per-day <n>             Entries per day (default: 2)");
    eprintln!("  --skip-today              Leave today empty (streak shows 0)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  DAYLOG_DB_URL, DAYLOG_USER_ID, DAYLOG_SEED_DAYS");
}

const SAMPLES: [(&str, &str); 5] = [
    ("Morning run", "5k along the river, kept a steady pace."),
    ("Read two chapters", "Finished the section on ownership."),
    ("Practiced scales", "Twenty minutes, metronome at 80."),
    ("Cooked dinner from scratch", ""),
    ("Wrote 500 words", "Draft of the opening scene."),
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);
    let today = EntryDay::new(now.date_naive());

    let mut inserted = 0_u32;
    let first_offset = u32::from(args.skip_today);
    for offset in first_offset..args.days.saturating_add(first_offset) {
        let Some(day) = today.days_before(offset) else {
            break;
        };
        for slot in 0..args.per_day {
            let idx = usize::try_from(offset.wrapping_add(slot))? % SAMPLES.len();
            let (heading, description) = SAMPLES[idx];
            let created_at =
                now - Duration::days(i64::from(offset)) + Duration::minutes(i64::from(slot));
            let entry = EntryDraft::new(day, heading)
                .with_description(description)
                .validate(args.user_id, created_at)?;
            storage.entries.insert_entry(entry).await?;
            inserted += 1;
        }
    }

    println!(
        "Seeded {inserted} entries over {} days for user {} into {}",
        args.days, args.user_id, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
