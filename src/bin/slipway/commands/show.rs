//! `slipway show` - dump a persisted configuration.

use anyhow::Result;

use slipway::config::Configuration;

use crate::cli::ShowArgs;

pub fn execute(args: ShowArgs) -> Result<()> {
    let config = Configuration::load(&args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Environment:");
    for (name, value) in &config.environment {
        println!("  {}={}", name, value);
    }
    println!("Directories:");
    for (name, path) in &config.directories {
        println!("  {}={}", name, path.display());
    }
    println!("Features:");
    for (name, state) in &config.features {
        println!("  {}={:?}", name, state);
    }
    println!("Macros:");
    for (name, value) in &config.macros {
        match value.as_define() {
            Some(v) => println!("  {}={}", name, v),
            None => println!("  {}", name),
        }
    }
    println!("Parameters:");
    for (name, value) in &config.parameters {
        println!("  {}={}", name, value);
    }
    println!("Include dirs:");
    for dir in &config.incdirs {
        println!("  {}", dir.display());
    }
    println!("Library dirs:");
    for dir in &config.libdirs {
        println!("  {}", dir.display());
    }
    println!("Headers:");
    for header in &config.headers {
        println!("  {}", header);
    }
    println!("Libraries:");
    for lib in &config.libs {
        println!("  {}", lib);
    }

    Ok(())
}
