//! WASM bindings
//!
//! This module provides JavaScript-friendly wrappers around the document,
//! client and server types.

pub mod bindings;
pub mod utils;

pub use bindings::{WasmClient, WasmDocument, WasmServer};
