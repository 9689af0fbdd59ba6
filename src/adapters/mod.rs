// Adapters layer: concrete implementations of the domain ports (storage and catalogs).

pub mod csv_catalog;
pub mod memory_catalog;
pub mod storage;
