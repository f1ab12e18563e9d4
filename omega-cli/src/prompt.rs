//! Interactive target prompt

use std::io::{BufRead, Write};

use anyhow::{Result, bail};

/// Ask for the target URL and return the trimmed answer
pub fn read_target<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Target URL (e.g. http://scanme.nmap.org): ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no target given");
    }
    Ok(line.trim().to_string())
}
