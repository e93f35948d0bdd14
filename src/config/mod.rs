#[cfg(feature = "cli")]
pub mod cli;
pub mod request_file;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use request_file::QuoteRequest;
