use serde::{Deserialize, Serialize};

/// Which of the four dashboard views is showing.
///
/// Every tab is reachable from every other tab in one step; there is no
/// terminal tab.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Pending,
    Resolved,
    Learned,
    Statistics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Pending, Tab::Resolved, Tab::Learned, Tab::Statistics];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Pending => "pending",
            Tab::Resolved => "resolved",
            Tab::Learned => "learned",
            Tab::Statistics => "statistics",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            Tab::Pending => "Pending",
            Tab::Resolved => "Resolved",
            Tab::Learned => "Learned Answers",
            Tab::Statistics => "Statistics",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" | "p" => Some(Tab::Pending),
            "resolved" | "r" => Some(Tab::Resolved),
            "learned" | "l" => Some(Tab::Learned),
            "statistics" | "stats" | "s" => Some(Tab::Statistics),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
