pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::QuoteRequest;

pub use adapters::{FileDocumentStore, InMemoryDocumentStore, PlainTextRenderer};
pub use crate::core::assembler::{AssemblyOutcome, QuoteAssembler, QuoteWarning};
pub use crate::core::catalog::RateCatalog;
pub use crate::core::document_cache::DocumentCache;
pub use crate::core::pricing::PricingEngine;
pub use domain::model::{CalculatorInput, PriceEstimate, Quote, QuoteStatus, RenderedDocument};
pub use utils::error::{FieldError, QuoteError, Result};
