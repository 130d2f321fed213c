//! Bundled mock responses
//!
//! Used when the model is disabled or unreachable. Each response follows the
//! same `FILE:` format a real model is asked to produce.

/// Kind of project a task asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockKind {
    Flask,
    FastApi,
    Script,
    Default,
}

impl MockKind {
    /// Pick the mock matching a task description
    pub fn for_task(task: &str) -> Self {
        let task = task.to_lowercase();
        if task.contains("flask") {
            MockKind::Flask
        } else if task.contains("fastapi") {
            MockKind::FastApi
        } else if ["script", "function", "calculate"]
            .iter()
            .any(|keyword| task.contains(keyword))
        {
            MockKind::Script
        } else {
            MockKind::Default
        }
    }

    pub fn response(&self) -> &'static str {
        match self {
            MockKind::Flask => include_str!("../../templates/mock/flask.txt"),
            MockKind::FastApi => include_str!("../../templates/mock/fastapi.txt"),
            MockKind::Script => include_str!("../../templates/mock/script.txt"),
            MockKind::Default => include_str!("../../templates/mock/default.txt"),
        }
    }
}

/// Mock response for a task
pub fn mock_response(task: &str) -> &'static str {
    MockKind::for_task(task).response()
}
