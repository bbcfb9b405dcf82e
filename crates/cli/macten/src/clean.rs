//! Clean command implementation

use anyhow::Result;
use colored::Colorize;

pub fn clean() -> Result<()> {
    mt_driver::clean()?;
    println!("{} removed .macten/", "Finished".green().bold());
    Ok(())
}
