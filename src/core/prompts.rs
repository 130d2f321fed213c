//! Prompts sent to the model
//!
//! The system prompt fixes the response format understood by the response
//! parser. The user prompt carries the task and the files already tracked.

use crate::models::FileMap;

/// System prompt for generation and edit tasks
pub const SYSTEM_PROMPT_GENERATE: &str = r#"You are a coding assistant. Generate or edit production-ready code based on the user task.
- For new code, return the complete code with file structure.
- For editing, modify only the specified file and preserve existing content unless instructed otherwise.
- For bug fixing, return corrected code for the specified file.
- Support templates for Flask and FastAPI projects.
- Return only the code and file structure in the format below.
- Do not include explanations or comments unless explicitly requested.
- Use relative file paths inside the project directory.

Format:
FILE: <file_path>
```<language>
<code>
```"#;

/// Build the user prompt for a task
pub fn generate_prompt(task: &str, file_map: &FileMap) -> String {
    let mut prompt = String::new();

    if !file_map.is_empty() {
        prompt.push_str("## Existing Files\n\n");
        for (path, entry) in file_map.iter() {
            prompt.push_str(&format!("- {} ({})\n", path, entry.status.label().to_lowercase()));
        }
        prompt.push('\n');
    }

    prompt.push_str("## Task\n\n");
    prompt.push_str(task.trim());
    prompt.push('\n');
    prompt
}
