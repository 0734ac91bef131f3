use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn agent_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/sv-agent.log")
}

#[derive(Debug, Clone, Default)]
pub struct Logger {
    state_root: Option<PathBuf>,
}

impl Logger {
    pub fn new(state_root: impl Into<PathBuf>) -> Self {
        Self {
            state_root: Some(state_root.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { state_root: None }
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.state_root.as_deref().map(agent_log_path)
    }

    pub fn info(&self, event: &str, message: &str) {
        self.append("info", event, message);
    }

    pub fn warn(&self, event: &str, message: &str) {
        self.append("warn", event, message);
    }

    pub fn error(&self, event: &str, message: &str) {
        self.append("error", event, message);
    }

    fn append(&self, level: &str, event: &str, message: &str) {
        let Some(path) = self.path() else {
            return;
        };
        let payload = serde_json::json!({
            "timestamp": super::ids::now_secs(),
            "level": level,
            "event": event,
            "message": message,
        });
        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };
        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
            return;
        };
        let _ = writeln!(file, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn logger_appends_json_lines_under_state_root() {
        let temp = tempdir().expect("tempdir");
        let logger = Logger::new(temp.path());
        logger.info("provider.selected", "using rules");
        logger.warn("provider.fallback", "ollama unavailable");

        let raw = fs::read_to_string(agent_log_path(temp.path())).expect("read log");
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "provider.selected");
        assert_eq!(lines[1]["level"], "warn");
    }

    #[test]
    fn disabled_logger_has_no_path() {
        let logger = Logger::disabled();
        assert!(logger.path().is_none());
        logger.error("noop", "dropped");
    }
}
