pub mod assembler;
pub mod catalog;
pub mod document_cache;
pub mod pricing;

pub use crate::domain::model::{CalculatorInput, PriceEstimate, Quote};
pub use crate::domain::ports::{DocumentRenderer, DocumentStore};
pub use crate::utils::error::Result;
