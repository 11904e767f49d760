//! Diagnostic scope for timing extraction phases.

use log::{debug, info};
use std::time::Instant;

/// Named scope that logs entry on creation and elapsed time on drop.
///
/// The extraction engine runs inside one of these so every export leaves
/// a timing trail in the logs without threading timers through the code.
pub struct MonitoredScope {
    name: String,
    started: Instant,
}

impl MonitoredScope {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!("Entering scope: {}", name);
        Self {
            name,
            started: Instant::now(),
        }
    }

    /// Elapsed time since the scope was opened
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl Drop for MonitoredScope {
    fn drop(&mut self) {
        info!("{} completed in {:.2}s", self.name, self.elapsed_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_reports_elapsed() {
        let scope = MonitoredScope::new("test");
        assert!(scope.elapsed_secs() >= 0.0);
    }
}
