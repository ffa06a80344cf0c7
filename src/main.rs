//! JobTrail CLI — run a Gmail ingest batch, or diagnose classification.
//!
//! Usage:
//!   jobtrail [ingest] [days=N] [limit=N]
//!   jobtrail diagnose
//!
//! Requires a Google token at ~/.jobtrail/google/token.json with the
//! gmail.readonly scope. Reports are printed as JSON on stdout.

use jobtrail_lib::config::{self, Config};
use jobtrail_lib::error::IngestError;
use jobtrail_lib::gmail::{self, client::GmailSource};
use jobtrail_lib::pipeline::{diagnose, ingest};
use jobtrail_lib::rules::RuleSet;
use jobtrail_lib::store::sqlite::TrackerDb;

enum Command {
    Ingest,
    Diagnose,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let first = args.first().cloned();
    let command = match first.as_deref() {
        Some("diagnose") => {
            args.remove(0);
            Command::Diagnose
        }
        Some("ingest") => {
            args.remove(0);
            Command::Ingest
        }
        _ => Command::Ingest,
    };

    let mut config = config::load_config();
    for arg in &args {
        if let Some(value) = arg.strip_prefix("days=") {
            match value.parse() {
                Ok(days) => config.days = days,
                Err(_) => exit_usage(arg),
            }
        } else if let Some(value) = arg.strip_prefix("limit=") {
            match value.parse() {
                Ok(limit) => config.limit = limit,
                Err(_) => exit_usage(arg),
            }
        } else {
            exit_usage(arg);
        }
    }

    if let Err(e) = run(command, config).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn exit_usage(arg: &str) -> ! {
    eprintln!("unrecognized argument: {arg}");
    eprintln!("usage: jobtrail [ingest|diagnose] [days=N] [limit=N]");
    std::process::exit(2);
}

async fn run(command: Command, config: Config) -> Result<(), IngestError> {
    let rules = match &config.rules_path {
        Some(path) => RuleSet::load(path).map_err(IngestError::Config)?,
        None => RuleSet::default_rules(),
    };

    let access_token = gmail::get_valid_access_token().await?;
    let source = GmailSource::new(access_token);

    match command {
        Command::Diagnose => {
            let rows = diagnose::run_diagnose(&source, &rules).await?;
            println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        }
        Command::Ingest => {
            let db = match &config.db_path {
                Some(path) => TrackerDb::open_at(path)?,
                None => TrackerDb::open()?,
            };
            let opts = ingest::IngestOptions {
                user_id: config.user_id.clone(),
                days: config.days,
                limit: config.limit,
                strategy: config.extractor,
            };
            let report = ingest::run_ingest(&source, &db, &rules, &opts).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            );
        }
    }

    Ok(())
}
