use std::path::PathBuf;

use rustyline::{Config, Editor, Result};

const HISTORY_FILE: &str = ".safety_travel_assistant_history";

pub fn generate_prompt(assistant_name: Option<&str>) -> String {
    match assistant_name {
        Some(name) => format!("[{}] > ", name),
        None => "> ".to_string(),
    }
}

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();
    Editor::with_config(config)
}

/// Where the line editor keeps its input history between runs.
pub fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}
