//! Console prompt and read helpers.

use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Print a prompt and read one trimmed line from stdin.
pub fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt until the user enters a valid integer.
pub fn read_int(prompt: &str) -> Result<i32> {
    loop {
        let line = read_line(prompt)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("  Please enter a number."),
        }
    }
}

/// Prompt until the user enters a valid non-negative integer.
pub fn read_usize(prompt: &str) -> Result<usize> {
    loop {
        let line = read_line(prompt)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("  Please enter a non-negative number."),
        }
    }
}

/// Ask a yes/no question; y/yes (any case) counts as yes.
pub fn confirm(prompt: &str) -> Result<bool> {
    let answer = read_line(prompt)?.to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Wait for the user to press enter.
pub fn pause() -> Result<()> {
    read_line("\nPress Enter to continue...")?;
    Ok(())
}
