// Adapters layer: concrete implementations for external systems (XML parsing, file storage).

pub mod storage;
pub mod xml;
