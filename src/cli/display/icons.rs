//! Status icons for CLI output

pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    pub const PENDING: &'static str = "⏳";

    pub const UNKNOWN: &'static str = "?";

    /// Get status icon based on ready/desired replicas
    pub fn get_replica_icon(ready: u32, total: u32) -> &'static str {
        if total == 0 {
            Self::UNKNOWN
        } else if ready == total {
            Self::SUCCESS
        } else if ready > 0 {
            Self::WARNING
        } else {
            Self::ERROR
        }
    }

    pub fn get_phase_icon(phase: &str) -> &'static str {
        match phase {
            "Running" | "Succeeded" | "Bound" => Self::SUCCESS,
            "Pending" | "Updating" | "Scaling" => Self::PENDING,
            "Failed" => Self::ERROR,
            _ => Self::UNKNOWN,
        }
    }
}
