use anyhow::Result;
use clap_serde_derive::ClapSerde;
use serde::Deserialize;

// Defaults live in the `#[default]` attribute, not in clap: a clap-side
// default would always parse as `Some` and clobber file values on merge.
#[derive(ClapSerde, Deserialize, Debug)]
pub struct Config {
    /// The address the listener binds to
    #[default(String::from("0.0.0.0"))]
    #[arg(short, long, env)]
    pub(crate) address: String,

    /// The port the listener binds to
    #[default(8000u16)]
    #[arg(short, long, env)]
    pub(crate) port: u16,

    /// Model identifiers registered at startup
    #[default(vec![String::from("logistic_model"), String::from("rf_model")])]
    #[arg(short, long, env, num_args = 1.., value_delimiter = ',')]
    pub(crate) models: Vec<String>,
}

impl Config {
    pub fn from_toml(path: &str) -> Result<Self> {
        let str = std::fs::read_to_string(path)?;
        let config = toml::from_str(&str)?;
        Ok(config)
    }
}
