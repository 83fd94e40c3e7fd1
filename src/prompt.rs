//! Interactive directory prompt.
//!
//! Used when no path is given on the command line. Reads lines until one
//! names an existing directory.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::scanner::validate_directory;

/// Question shown before each attempt.
pub const PROMPT: &str = "Enter the directory to scan for duplicates: ";

/// Shown when the answer is empty or whitespace.
pub const BLANK_MESSAGE: &str = "The field cannot be blank";

/// Ask for a directory until a valid one is entered.
///
/// Blank answers and paths rejected by [`validate_directory`] print a
/// message and ask again. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Fails on end of input or if reading or writing the terminal fails.
///
/// # Example
///
/// ```
/// use dupelink::prompt::prompt_for_directory;
/// use std::io::Cursor;
///
/// let dir = std::env::temp_dir();
/// let input = format!("\n{}\n", dir.display());
/// let mut output = Vec::new();
///
/// let chosen = prompt_for_directory(Cursor::new(input), &mut output).unwrap();
/// assert_eq!(chosen, dir);
/// assert!(String::from_utf8(output).unwrap().contains("cannot be blank"));
/// ```
pub fn prompt_for_directory<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<PathBuf> {
    let mut line = String::new();

    loop {
        write!(output, "{PROMPT}").context("Failed to write prompt")?;
        output.flush().context("Failed to write prompt")?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .context("Failed to read directory from input")?;
        if read == 0 {
            bail!("No directory given: input closed");
        }

        let answer = line.trim();
        if answer.is_empty() {
            writeln!(output, "{BLANK_MESSAGE}").context("Failed to write prompt")?;
            continue;
        }

        match validate_directory(Path::new(answer)) {
            Ok(dir) => return Ok(dir),
            Err(e) => {
                log::debug!("Rejected directory {:?}: {}", answer, e);
                writeln!(output, "{e}").context("Failed to write prompt")?;
            }
        }
    }
}
