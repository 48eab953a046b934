// lib/src/ingest/mod.rs

pub mod fhir;
pub mod normalizer;

pub use fhir::Bundle;
pub use normalizer::{normalize, Normalized};
