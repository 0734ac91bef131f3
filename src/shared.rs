pub mod ids;
pub mod logging;

pub use ids::{generate_execution_id, now_secs};
pub use logging::{agent_log_path, Logger};
