//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a task database, rebuild the working set and print a summary.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `doit_cli [DB_PATH]`. Set `DOIT_LOG_DIR` to an absolute directory
//! to enable file logging.

use doit_core::db::open_db;
use doit_core::{
    default_log_level, init_logging, load_working_set, LogicController, SqliteTaskStore,
};
use std::error::Error;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "doit.sqlite3";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("DOIT_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("doit_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> Result<(), Box<dyn Error>> {
    println!("doit_core ping={}", doit_core::ping());
    println!("doit_core version={}", doit_core::core_version());

    let conn = open_db(db_path)?;
    let store = SqliteTaskStore::try_new(&conn)?;

    let mut controller = LogicController::new();
    let restored = controller.restore_lists(load_working_set(&store)?);
    let overdue = controller.report_overdue_tasks();

    println!("lists={restored}");
    println!("tasks={}", controller.get_all_tasks().len());
    println!("overdue={overdue}");
    for list in controller.get_all_lists() {
        let open = list.tasks.iter().filter(|task| !task.completed).count();
        println!("list name={:?} tasks={} open={open}", list.name, list.len());
    }
    Ok(())
}
