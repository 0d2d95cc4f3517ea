pub mod catalog;

// Re-export common types
pub use catalog::{Catalog, CatalogError, Category, MenuItem};
