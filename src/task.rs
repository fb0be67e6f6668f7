use serde::{Deserialize, Serialize};

/// A single to-do entry. Identity is its position in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(default, alias = "title")]
    pub title: String,
    #[serde(default, alias = "isDone", alias = "is_done")]
    pub is_done: bool,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_done: false,
        }
    }

    pub fn done(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_done: true,
        }
    }

    /// Marker shown in the "Done" column.
    pub fn done_marker(&self) -> &'static str {
        if self.is_done {
            "✔"
        } else {
            ""
        }
    }
}

/// Trims submitted text, rejecting blank input.
pub fn normalize_title(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
