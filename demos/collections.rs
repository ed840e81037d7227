//! Maps, sequences and optional members.
//!
//! Run with: cargo run --example collections

use serde::{Deserialize, Serialize};
use serde_properties::{from_str, to_string_with_options, PropertiesOptions};
use std::collections::HashMap;
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Endpoint {
    url: String,
    timeout_ms: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Gateway {
    routes: HashMap<String, Endpoint>,
    allow: Vec<String>,
    fallback: Option<Endpoint>,
    limits: HashMap<u16, u32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut routes = HashMap::new();
    routes.insert(
        "users".to_string(),
        Endpoint {
            url: "http://users.internal/?v=2".to_string(),
            timeout_ms: 250,
        },
    );
    routes.insert(
        "orders".to_string(),
        Endpoint {
            url: "http://orders.internal".to_string(),
            timeout_ms: 500,
        },
    );

    let mut limits = HashMap::new();
    limits.insert(80, 1000);
    limits.insert(443, 5000);

    let gateway = Gateway {
        routes,
        allow: vec!["10.0.0.0/8".to_string(), "192.168.0.0/16".to_string()],
        fallback: None,
        limits,
    };

    // Hash maps iterate in arbitrary order; sorting keeps the output stable
    let text = to_string_with_options(&gateway, PropertiesOptions::new().with_sorted_keys())?;
    println!("Properties output:\n{}", text);

    let back: Gateway = from_str(&text)?;
    assert_eq!(gateway, back);
    println!("✓ Round-trip successful (fallback stays {:?})", back.fallback);

    // Sequences stop at the first missing index
    let sparse = "allow[0]=a\nallow[1]=b\nallow[3]=d\n";
    let partial: Gateway = from_str(sparse)?;
    println!("Sparse input decodes to {:?}", partial.allow);

    Ok(())
}
