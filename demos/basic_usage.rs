//! Resolve a small service configuration and print the result.
//!
//! Run with `RUST_LOG=variable_json=trace` to see every followed reference.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use variable_json::{Options, VariableJsonError, from_str, parse_with_options, to_string_pretty};

#[derive(Debug, Deserialize)]
struct Service {
    name: String,
    endpoint: String,
    retries: u32,
}

const CONFIG: &str = r#"{
    "$vars": {
        "env": "staging",
        "host": "api.example.com",
        "endpoint": "$(host)",
        "policy": {"retries": 3}
    },
    "name": "$(env)",
    "endpoint": "$(endpoint)",
    "retries": "$(policy.retries)"
}"#;

fn main() -> Result<(), VariableJsonError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let service: Service = from_str(CONFIG)?;
    println!("Typed: {:?}", service);
    println!(
        "{} -> {} (retries: {})",
        service.name, service.endpoint, service.retries
    );

    let resolved = parse_with_options(CONFIG, Options::default().with_keep_vars(true))?;
    println!("Resolved document:\n{}", to_string_pretty(&resolved)?);

    match from_str::<Service>(r#"{"$vars": {"a": "$(a)"}, "name": "$(a)"}"#) {
        Err(err) => println!("Cycle detected as expected: {}", err),
        Ok(service) => println!("Unexpected success: {:?}", service),
    }

    Ok(())
}
