//! Building flat mappings with the properties! macro.
//!
//! Run with: cargo run --example macro

use serde::Deserialize;
use serde_properties::{from_properties, properties};
use std::error::Error;

#[derive(Debug, Deserialize)]
struct Service {
    name: String,
    replicas: u8,
    ports: Vec<u16>,
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let props = properties! {
        "name" => "checkout",
        "replicas" => 3,
        "ports[0]" => 8080,
        "ports[1]" => 8443,
        "debug" => "F",
    };

    println!("Mapping:\n{}", props);

    let service: Service = from_properties(&props)?;
    println!("Decoded: {:?}", service);
    println!(
        "{} runs {} replicas on {} ports (debug: {})",
        service.name,
        service.replicas,
        service.ports.len(),
        service.debug
    );

    Ok(())
}
