// Adapters layer: concrete implementations of the domain ports (stores,
// renderer). The engine and cache only ever see the traits.

pub mod file_store;
pub mod memory_store;
pub mod text_renderer;

pub use file_store::FileDocumentStore;
pub use memory_store::InMemoryDocumentStore;
pub use text_renderer::PlainTextRenderer;
