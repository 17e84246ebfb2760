//! Core domain logic for the doIT task manager.
//! The working set, statistics and persistence rules live here; UI layers
//! only call into `LogicController`.

pub mod cache;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use cache::data_cache::DataCache;
pub use cache::statistics_cache::StatisticsCache;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::TaskCollection;
pub use model::statistics::{StatisticKind, StatisticalData};
pub use model::task::{Priority, PriorityOutOfRange, Task};
pub use repo::task_store::{
    load_working_set, ListRowId, RepoError, RepoResult, SqliteTaskStore, TaskRowId, TaskStore,
};
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use service::logic_controller::LogicController;
pub use service::verifier::{DataVerifier, TaskVerifier};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
