use std::path::PathBuf;

use blueprint::Interpreter;
use rustyline::{
    error::ReadlineError, validate::MatchingBracketValidator, Completer, Editor, Helper,
    Highlighter, Hinter, Validator,
};

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    brackets: MatchingBracketValidator,
}

/// Reads lines until EOF, evaluating each one in the same interpreter. Errors are reported and
/// the session goes on.
pub fn run(interpreter: &Interpreter, history: Option<PathBuf>) -> rustyline::Result<()> {
    let mut rl = Editor::new()?;
    let h = InputValidator {
        brackets: MatchingBracketValidator::new(),
    };

    rl.set_helper(Some(h));

    if let Some(path) = &history {
        if rl.load_history(path).is_err() {
            log::info!("no previous history at {}", path.display());
        }
    }

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str())?;

                match interpreter.run(&line) {
                    Ok(value) => println!("{}", value),
                    Err(err) => eprintln!("{:?}", miette::Report::new(err)),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }

    if let Some(path) = history {
        if let Err(err) = rl.append_history(&path) {
            log::warn!("cannot save history to {}: {}", path.display(), err);
        }
    }

    Ok(())
}
