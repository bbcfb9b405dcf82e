//! Generate command implementation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn generate(path: &Path) -> Result<()> {
    println!("{} {:?}", "Generating".green().bold(), path);

    let count = mt_driver::generate(path)?;

    if count == 0 {
        println!("  {} no procedural macros found", "Note:".bold());
    } else {
        println!(
            "{} {count} procedural macro(s) generated into .macten/",
            "Finished".green().bold()
        );
    }

    Ok(())
}
