//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `daybook_core` linkage and print deterministic probe output.
//! - Report today/upcoming badge counts for a database through the façade.
//! - With `--watch`, keep reporting them at the configured poll interval.

use daybook_core::facade::LocalTransport;
use daybook_core::model::entity::EntityKind;
use daybook_core::sync::{CounterSync, SystemClock, TaskCounts, ViewSession};
use daybook_core::{open_db, share, AppConfig, DataFacade};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Instant;

fn main() -> ExitCode {
    println!("daybook_core ping={}", daybook_core::ping());
    println!("daybook_core version={}", daybook_core::core_version());

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("daybook: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut watch = false;
    for arg in std::env::args_os().skip(1) {
        if arg == "--watch" {
            watch = true;
        } else {
            config.db_path = PathBuf::from(arg);
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("daybook: cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let facade = Rc::new(DataFacade::new(LocalTransport::new(share(conn))));
    println!("db={}", config.db_path.display());
    let counters = CounterSync::attach(&facade, Rc::new(SystemClock), print_counts);

    if let Some(notice) = facade.latest_notice() {
        eprintln!("daybook: {}", notice.message);
        return ExitCode::FAILURE;
    }
    if !watch {
        return ExitCode::SUCCESS;
    }

    let mut badge = ViewSession::mount_polling(
        "cli",
        facade.bus(),
        &[EntityKind::Task],
        &config,
        Instant::now(),
        |_| {},
    );
    println!("watching every {}ms", config.poll_interval.as_millis());
    while badge.is_mounted() && counters.is_attached() {
        std::thread::sleep(config.poll_interval);
        badge.tick(Instant::now());
    }
    ExitCode::SUCCESS
}

fn print_counts(counts: TaskCounts) {
    println!("today={} upcoming={}", counts.today, counts.upcoming);
}
