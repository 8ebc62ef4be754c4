//! Headless token tracing example.
//!
//! Loads every `.css` file under a directory, then prints the alias chain
//! of each token given on the command line along with search suggestions
//! for it.
//!
//! Run with: cargo run -p tokenscope --example trace_tokens -- dist --spectrum-alias-focus-color

use std::path::PathBuf;

use tokenscope::prelude::*;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let root = PathBuf::from(args.next().unwrap_or_else(|| "dist".to_string()));
    let tokens: Vec<String> = args.collect();

    let config = match std::env::var("TOKENSCOPE_CONFIG") {
        Ok(path) => InspectorConfig::from_file(path)?,
        Err(_) => InspectorConfig::default(),
    };

    let session = Session::new(config, DirectorySheetProvider::new(&root))?;

    println!("Sheets under {}", root.display());
    for name in session.store().sheet_names() {
        let kind = session.store().sheet_kind(name)?;
        let count = session.store().extract(name)?.len();
        println!("  {:<24} {:?}, {} tokens", name, kind, count);
    }
    println!();

    for token in &tokens {
        println!("{}", session.chain(token).join(" -> "));

        for result in session.search(token, Some(token.as_str())).iter().take(5) {
            println!(
                "    {:<48} {:>8.3}  {}",
                result.reference,
                result.score,
                session.resolve(&result.reference)
            );
        }
    }

    Ok(())
}
