//! Line-driven interactive shell.

use std::io::{self, BufRead, Write};

use crate::interpreter::Scope;

const PROMPT: &str = ">> ";

/// Read lines until end of input or the literal word `exit`, running
/// each through the full pipeline against one shared environment.
/// Parse errors print tab-indented, one per line; otherwise the
/// program value's inspection prints on its own line.
pub fn start(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<()> {
    let env = Scope::new();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line == "exit" {
            return Ok(());
        }

        match crate::run(line, &env) {
            Ok(value) => writeln!(output, "{value}")?,
            Err(errors) => {
                for error in errors {
                    writeln!(output, "\t{error}")?;
                }
            }
        }
    }
}
