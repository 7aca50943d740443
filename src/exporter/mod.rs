// file: src/exporter/mod.rs
// description: transcript output module exports
// reference: internal module structure

pub mod sink;

pub use sink::{OutputSink, OutputTarget};
