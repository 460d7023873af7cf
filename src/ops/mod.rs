//! Operation algebra: edit scripts and the OT primitives over them
//!
//! An [`OperationSequence`] is a whole-document edit script made of
//! [`Operation`]s. Two pure algorithms give OT its guarantees:
//!
//! - [`compose`] merges two consecutive scripts into one
//! - [`transform`] rewrites two concurrent scripts so that applying them in
//!   either order converges
//!
//! Both return canonical sequences.
//!
//! # References
//!
//! - Ellis & Gibbs, "Concurrency Control in Groupware Systems" (1989)
//! - Google Wave, "Operational Transformation" whitepaper

mod compose;
mod operation;
mod sequence;
mod transform;

pub use compose::compose;
pub use operation::Operation;
pub use sequence::OperationSequence;
pub use transform::transform;
