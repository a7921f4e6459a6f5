use std::io;
use std::path::PathBuf;

use anyhow::Context;
use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use glint::interpreter::{Scope, Value};
use glint::repl;

#[derive(FromArgs)]
/// The glint interpreter.
struct Args {
    /// script file to execute
    #[argh(positional)]
    path: Option<PathBuf>,

    /// inline code to execute
    #[argh(option, short = 'c')]
    code: Option<String>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args: Args = argh::from_env();

    if let Some(path) = &args.path {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return run_source(&source);
    }
    if let Some(code) = &args.code {
        return run_source(code);
    }

    let stdin = io::stdin();
    repl::start(&mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}

fn run_source(source: &str) -> anyhow::Result<()> {
    let env = Scope::new();
    match glint::run(source, &env) {
        Ok(Value::Null) => Ok(()),
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            anyhow::bail!("{} parse error(s)", errors.len())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .compact()
        .init();
}
