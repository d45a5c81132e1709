use std::{env, error, process};

use reqwest::Url;

/// Container healthcheck probe: GET the given URL and require the health
/// payload. Exits nonzero on any failure so orchestrators restart the pod.
fn main() -> Result<(), Box<dyn error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: model_serve_health <url>");
        process::exit(2);
    }

    let url = Url::parse(&args[1])?;
    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        eprintln!("Health request failed with status {}", response.status());
        process::exit(1);
    }

    let body: serde_json::Value = serde_json::from_slice(&response.bytes()?)?;
    if body.get("status").and_then(|status| status.as_str()) != Some("healthy") {
        eprintln!("Unexpected health payload: {body}");
        process::exit(1);
    }

    Ok(())
}
