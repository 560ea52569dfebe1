//! Lowering from bound declaration tables to the IDM.
//!
//! This crate is the resolve phase of the pipeline. It runs after every
//! unit has been bound, reads the whole program through
//! [`declc_binder::GlobalTable`], and produces one [`declc_model::IdmUnit`]
//! per input. Type annotations are normalized into [`declc_model::TypeNode`]
//! trees, inherited members are folded into their shapes, and the unit's
//! export surface is resolved down to canonical symbol names.
//!
//! Extraction errors come in two strengths. Recoverable constructs degrade
//! to [`declc_model::TypeNode::Unknown`] with a warning; fatal errors (an
//! unresolvable type reference, a malformed tuple, an inheritance cycle)
//! abort the unit. An aborted unit keeps its diagnostics but contributes no
//! symbols to the document.

mod context;
mod enums;
mod members;
mod normalize;

pub mod assemble;

pub use assemble::{lower_unit, LowerOutput};
pub use context::{Fatal, LowerResult};
