mod highlighter;

use clap::Parser;
use highlighter::QuillHelper;
use quill::config::{HISTORY_FILE, VERSION, WELCOME_FOOTER, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use quill::env::SymbolTable;
use quill::{default_globals, run};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

/// A small dynamically-typed scripting language
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version = VERSION)]
#[command(about = "A small dynamically-typed scripting language")]
#[command(long_about = "An interpreter with a line-editing REPL and script execution")]
struct CliArgs {
    /// Script file to execute (optional - if not provided, starts REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // One global scope per session: REPL lines and script statements share it.
    let globals = default_globals();

    match args.script {
        Some(path) => run_script(&path, &globals),
        None => repl(&globals),
    }
}

/// Execute a script file from start to finish.
fn run_script(path: &PathBuf, globals: &Rc<SymbolTable>) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot read script file {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let file_name = path.display().to_string();
    match run(&file_name, &source, globals) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Interactive loop with history and syntax highlighting.
fn repl(globals: &Rc<SymbolTable>) -> ExitCode {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<QuillHelper, DefaultHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {e}");
            return ExitCode::FAILURE;
        }
    };
    rl.set_helper(Some(QuillHelper::new()));

    // Try to load history from previous sessions
    let _ = rl.load_history(HISTORY_FILE);

    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");
    println!("{WELCOME_FOOTER}");

    loop {
        match rl.readline("quill> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                match line.trim() {
                    "exit" | "quit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }

                match run("<stdin>", &line, globals) {
                    Ok(value) => println!("=> {value}"),
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    // Save history on exit
    let _ = rl.save_history(HISTORY_FILE);

    ExitCode::SUCCESS
}
