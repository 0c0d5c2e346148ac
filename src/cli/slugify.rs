//! Print the slug of a string.

use anyhow::Result;
use clap::Args;

use crate::constants::DEFAULT_SEPARATOR;
use crate::text::{SlugOptions, slugify};

/// Slugify text with the same rules used for template slugs.
#[derive(Args, Debug)]
pub struct SlugifyCommand {
    /// Text to slugify
    pub text: String,

    /// Separator placed between words
    #[arg(short, long, default_value = DEFAULT_SEPARATOR, conflicts_with = "no_separator")]
    pub separator: String,

    /// Join words with no separator
    #[arg(long)]
    pub no_separator: bool,

    /// Keep the original letter case
    #[arg(long)]
    pub keep_case: bool,

    /// Split camelCase words
    #[arg(long)]
    pub camel: bool,
}

impl SlugifyCommand {
    pub fn options(&self) -> SlugOptions {
        let separator = if self.no_separator {
            String::new()
        } else {
            self.separator.clone()
        };

        SlugOptions::default()
            .with_separator(separator)
            .with_lowercase(!self.keep_case)
            .with_camel_split(self.camel)
    }

    pub fn execute(self) -> Result<()> {
        let slug = slugify(&self.text, &self.options())?;
        println!("{}", slug);
        Ok(())
    }
}
