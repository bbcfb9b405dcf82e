//! Run command implementation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::time::Instant;

pub fn run(path: &Path, dest: Option<&Path>) -> Result<()> {
    let start = Instant::now();

    println!("{} {:?}", "Expanding".green().bold(), path);

    let output = mt_driver::run(path, dest)?;

    println!(
        "{} expanded source written to {:?} in {:.2}s",
        "Finished".green().bold(),
        output,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
