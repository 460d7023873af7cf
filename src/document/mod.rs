//! Document model: line-indexed text with a linear unit index
//!
//! A [`Document`] stores text as lines of `char`s. Every character counts as
//! one unit and so does the implicit newline between two lines, giving a
//! single linear index that edit scripts walk over. [`Position`] caches the
//! (line, offset) an index resolves to and lets scans resume where the
//! previous one stopped.

mod apply;
mod position;
mod text;

pub use position::Position;
pub use text::Document;
