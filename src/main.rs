use clap::Parser;
use miette::IntoDiagnostic;

use blueprint::Interpreter;

mod cli;
mod repl;

fn main() -> miette::Result<()> {
    // Install the panic handler.
    bupropion::install(bupropion::BupropionHandlerOpts::new).into_diagnostic()?;

    env_logger::init();

    // Parse the command line arguments.
    let options = cli::Options::parse();

    std::thread::Builder::new()
        .name("blueprint".to_string())
        .stack_size(blueprint::STACK_SIZE)
        .spawn(move || run(options))
        .into_diagnostic()?
        .join()
        .map_err(|_| miette::miette!("the interpreter thread panicked"))?
}

fn run(options: cli::Options) -> miette::Result<()> {
    let interpreter = Interpreter::new()?;

    for file in &options.files {
        interpreter.load(file)?;
    }

    if let Some(expr) = &options.eval {
        println!("{}", interpreter.run(expr)?);
    }

    if options.wants_repl() {
        repl::run(&interpreter, options.history_path()).into_diagnostic()?;
    }

    Ok(())
}
