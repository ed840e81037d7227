//! Working with the flat Properties mapping directly.
//!
//! Run with: cargo run --example flat_mapping

use serde::Serialize;
use serde_properties::{from_properties, scanner, to_properties, Properties, PropertiesOptions};
use std::collections::HashMap;
use std::error::Error;

#[derive(Serialize)]
struct Database {
    host: String,
    port: u16,
    replicas: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let db = Database {
        host: "db.internal".to_string(),
        port: 5432,
        replicas: vec!["r1.internal".to_string(), "r2.internal".to_string()],
    };

    // Flatten to a mapping and inspect individual keys
    let props = to_properties(&db)?;
    for (key, value) in props.iter() {
        println!("{:<12} -> {}", key, value);
    }

    // Move the whole document under a root, then cut it back out
    let nested = props.nest("database");
    println!("\nNested:\n{}", nested);
    assert_eq!(nested.restrict("database"), props);

    // Scan text by hand and decode into an untyped map
    let text = "# cache settings\ncache.size=512\ncache.policy=lru\n";
    let scanned: Properties = scanner::scan(text, &PropertiesOptions::new())?;
    let cache: HashMap<String, HashMap<String, String>> = from_properties(&scanned)?;
    println!("Cache policy: {}", cache["cache"]["policy"]);

    // Plain hash maps convert both ways
    let plain: HashMap<String, String> = scanned.into();
    println!("{} plain entries", plain.len());

    Ok(())
}
