//! Escape a string for a URI component or a regular expression.

use anyhow::Result;
use clap::Args;

use crate::text::{EscapeMethod, escape};

/// Escape text with the chosen method.
#[derive(Args, Debug)]
pub struct EscapeCommand {
    /// Text to escape
    pub text: String,

    /// Escaping method: `uri` (or `0`), `regexp` (or `1`)
    #[arg(short, long)]
    pub method: String,
}

impl EscapeCommand {
    pub fn execute(self) -> Result<()> {
        let method: EscapeMethod = self.method.parse()?;
        println!("{}", escape(&self.text, method));
        Ok(())
    }
}
