//! Customizing conversion with PropertiesOptions.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use serde_properties::{
    from_str_keyed, from_str_with_options, to_string, to_string_with_options, PropertiesOptions,
};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Config {
    name: String,
    version: String,
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        version: "1.0.0".to_string(),
        debug: true,
    };

    // Default format
    println!("Default:");
    println!("{}", to_string(&config)?);

    // Everything under a root key
    println!("Rooted at `app`:");
    let rooted = PropertiesOptions::new().with_root("app");
    let text = to_string_with_options(&config, rooted)?;
    println!("{}", text);

    // Sorted output
    println!("Sorted:");
    let sorted = PropertiesOptions::new().with_sorted_keys();
    println!("{}", to_string_with_options(&config, sorted)?);

    // Reading one section of a larger document
    let document = format!("{}other.name=ignored\n", text);
    let back: Config = from_str_keyed("app", &document)?;
    assert_eq!(back, config);
    println!("✓ Keyed decode successful");

    // A different comment marker
    let input = "! managed by ops\nname=Legacy\nversion=0.9\ndebug=0\n";
    let options = PropertiesOptions::new().with_comment('!');
    let legacy: Config = from_str_with_options(input, options)?;
    println!("Legacy config: {:?}", legacy);

    Ok(())
}
