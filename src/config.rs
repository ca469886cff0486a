// ABOUTME: Configuration and constants for the interpreter
// Version info and the REPL welcome banner

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "Quill Interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A small dynamically-typed scripting language";
pub const WELCOME_FOOTER: &str = "Type 'exit' or press Ctrl-D to leave";

/// REPL history lands next to the working directory, one file per user.
pub const HISTORY_FILE: &str = ".quill_history";
