use serde::Deserialize;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Tunables of the interaction layer. Hosts may override any field from JSON;
/// missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub toast_delay_ms: u64,
    pub toast_exit_ms: u64,
    /// Widths at or below this value use the narrow sidebar layout.
    pub narrow_breakpoint: u32,
    pub min_age: i32,
    pub max_age: i32,
    pub waived_fee: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_delay_ms: 4200,
            toast_exit_ms: 220,
            narrow_breakpoint: 1024,
            min_age: 4,
            max_age: 18,
            waived_fee: "0.00".to_string(),
        }
    }
}

impl UiConfig {
    pub fn toast_delay(&self) -> Duration {
        Duration::from_millis(self.toast_delay_ms)
    }

    pub fn toast_exit(&self) -> Duration {
        Duration::from_millis(self.toast_exit_ms)
    }

    pub fn age_range(&self) -> RangeInclusive<i32> {
        self.min_age..=self.max_age
    }

    pub fn age_message(&self) -> String {
        format!(
            "computed age must be between {} and {} years",
            self.min_age, self.max_age
        )
    }
}
