//! Type oracle for the Jay optimizer.
//!
//! Pure queries over a program's frozen reference-type hierarchy:
//! castability, instantiability, override closure, and the reference-type
//! lattice operations the optimizer narrows declared types with. The
//! hierarchy must not change while an oracle is in use; slot declared types
//! may (the oracle never reads them).
//!
//! # Query surface
//!
//! - [`can_trivially_cast`] / [`can_theoretically_cast`]: static
//!   assignability and hierarchy intersection.
//! - [`TypeOracle`]: allocation-derived instantiability and the override
//!   closure.
//! - [`generalize`] / [`generalize_types`] / [`stronger`]: least upper
//!   bound and strictness comparison, with the null type as the lattice
//!   bottom.

mod lattice;
mod oracle;

pub use lattice::{generalize, generalize_types, stronger};
pub use oracle::{all_overrides, can_theoretically_cast, can_trivially_cast, TypeOracle};
