//! Inbound log feed parsing.
//!
//! The log source hands the console a JSON array of log records at startup.
//! Records use the feed's camelCase keys with `0`/`1` capability flags:
//!
//! ```json
//! [
//!   {
//!     "id": "L1",
//!     "index": 1,
//!     "userName": "Alice",
//!     "userAccount": "alice01",
//!     "department": "Finance",
//!     "content": "How do I submit a travel claim?",
//!     "source": "web",
//!     "isOnline": 1,
//!     "isFileQA": 0,
//!     "isKnowledgeBase": 1,
//!     "answerContent": "Open the claims portal...",
//!     "userType": "normal"
//!   }
//! ]
//! ```
//!
//! The feed is assumed well formed; anything that does not parse is reported
//! as [`EvalConsoleError::Seed`] rather than partially loaded.

use crate::domain::error::{EvalConsoleError, Result};
use crate::domain::LogEntry;
use std::path::Path;

/// Parses a log feed from a JSON string.
///
/// # Errors
///
/// Returns [`EvalConsoleError::Seed`] if the input is not a JSON array of
/// log records.
///
/// # Examples
///
/// ```
/// use eval_console::store::parse_seed;
///
/// let logs = parse_seed(r#"[{"id":"L1","index":1,"userName":"Alice",
///     "content":"q","isOnline":0,"isFileQA":0,"isKnowledgeBase":1}]"#)?;
/// assert_eq!(logs.len(), 1);
/// assert!(logs[0].is_knowledge_base);
/// # Ok::<(), eval_console::EvalConsoleError>(())
/// ```
pub fn parse_seed(json: &str) -> Result<Vec<LogEntry>> {
    parse_with_origin(json, "<inline>")
}

/// Reads and parses a log feed file.
///
/// # Errors
///
/// Returns [`EvalConsoleError::Io`] if the file cannot be read and
/// [`EvalConsoleError::Seed`] if its contents do not parse.
pub fn load_seed(path: impl AsRef<Path>) -> Result<Vec<LogEntry>> {
    let path = path.as_ref();
    let _span = tracing::debug_span!("load_seed", path = %path.display()).entered();

    let contents = std::fs::read_to_string(path)?;
    let logs = parse_with_origin(&contents, &path.display().to_string())?;

    tracing::info!(log_count = logs.len(), "log feed loaded");
    Ok(logs)
}

fn parse_with_origin(json: &str, origin: &str) -> Result<Vec<LogEntry>> {
    serde_json::from_str(json).map_err(|source| EvalConsoleError::Seed {
        origin: origin.to_string(),
        source,
    })
}
