use clap::Parser;

use crate::core::document_cache::{DEFAULT_CAPACITY, DEFAULT_TTL_SECONDS};

#[derive(Debug, Clone, Parser)]
#[command(name = "quote-engine")]
#[command(about = "Deterministic service-quotation engine with a cached document renderer")]
pub struct CliConfig {
    /// TOML quote request (service, customer, company, optional notes).
    #[arg(long)]
    pub input: String,

    /// Directory the rendered document is written to.
    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Backing file for the document cache. Defaults to
    /// `<output_path>/documents.json`.
    #[arg(long)]
    pub cache_file: Option<String>,

    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,

    #[arg(long, default_value_t = DEFAULT_TTL_SECONDS)]
    pub cache_ttl_seconds: i64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn cache_file(&self) -> String {
        self.cache_file
            .clone()
            .unwrap_or_else(|| format!("{}/documents.json", self.output_path))
    }
}
