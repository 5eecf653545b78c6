use anyhow::Result;
use colored::Colorize;

use crate::step::{cargo, OnFailure};

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    // The pigpio feature only adds items; document them too. rustdoc does not link.
    let mut args = vec!["doc", "-p", "gpio", "--no-deps", "--features", "pigpio"];
    if open {
        args.push("--open");
    }
    cargo("Documentation build", &args, OnFailure::Abort)?;

    if !open {
        println!("   {}", "Open target/doc/gpio/index.html in your browser".dimmed());
        println!("   {}", "Or run 'cargo run -p xtask -- doc --open'".dimmed());
        println!();
    }

    Ok(())
}
