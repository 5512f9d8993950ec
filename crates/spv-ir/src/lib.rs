//! In-memory SPIR-V IR for a shader compiler backend.
//!
//! A [`Module`] owns [`Function`]s, each a CFG of [`Block`]s, each an ordered
//! sequence of [`Instruction`]s. The builder that decides *what* to emit is
//! external; this crate maintains the structural invariants (label-first
//! blocks, terminator placement, the module-wide id index) and serializes
//! the whole hierarchy into the flat 32-bit word stream of the SPIR-V
//! binary format via `dump`.

pub mod error;
pub mod ir;

pub use error::{Error, Result};
pub use ir::{
    Block, FUNCTION_CONTROL_NONE, FuncRef, Function, Id, InstrRef, Instruction, Module, Op,
    StorageClass, WORD_COUNT_SHIFT,
};
