use std::path::PathBuf;

use clap::Parser;

/// Runs blueprint programs, or starts an interactive session.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Source files to load, in order.
    pub files: Vec<PathBuf>,

    /// Evaluates an expression and prints its value.
    #[arg(short, long)]
    pub eval: Option<String>,

    /// Starts a repl session after loading the files.
    #[arg(short, long)]
    pub repl: bool,

    /// Where the repl history is kept, defaults to `$HOME/.blueprint.history`.
    #[arg(long)]
    pub history: Option<PathBuf>,
}

impl Options {
    /// The repl also starts when there is nothing else to do.
    pub fn wants_repl(&self) -> bool {
        self.repl || (self.files.is_empty() && self.eval.is_none())
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.history {
            return Some(path.clone());
        }

        let home_env = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home_env).join(".blueprint.history"))
    }
}
