//! Intermediate representation for the Jay whole-program optimizer.
//!
//! Jay is a class-based, nominally-typed object language with single
//! inheritance, interfaces, `null`, and primitives. After linking, the
//! whole program lives in one [`Program`]: flat arenas of reference types,
//! fields, methods, parameters, locals, statements, and expressions, all
//! referenced by 32-bit index ids.
//!
//! # Design
//!
//! - No `Box<Expr>`: children are [`ExprId`]/[`StmtId`] indices into
//!   contiguous arenas, variable-length child lists are ranges into
//!   flattened side tables.
//! - Expression types are *derived*, not stored: a variable reference's
//!   type is its slot's current declared type, so narrowing a declaration
//!   is immediately visible at every use (see [`Program::type_of`]).
//! - Node replacement is in-place ([`Program::replace_expr`]): ids are
//!   stable, so substituting a node never touches its parents.
//!
//! Traversal comes in two flavors: the read-only [`Visitor`] trait with
//! `walk_*` defaults, and the post-order [`rewrite_expr`]/[`rewrite_stmt`]
//! drivers that hand each node to a mutating handler after its children.

/// Asserts that a type has an expected size at compile time.
///
/// Usage: `static_assert_size!(ExprKind, 24);`
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod decl;
mod display;
mod expr;
mod ids;
mod interner;
mod name;
mod program;
mod rewrite;
mod span;
mod stmt;
mod types;
mod validate;
mod visit;

pub use decl::{Body, Field, FieldFlags, ForeignRefs, Local, Method, MethodFlags, Param, Slot};
pub use expr::{BinaryOp, Expr, ExprKind};
pub use ids::{ExprId, ExprRange, FieldId, LocalId, MethodId, ParamId, StmtId, StmtRange, TypeId};
pub use interner::Interner;
pub use name::Name;
pub use program::Program;
pub use rewrite::{rewrite_expr, rewrite_stmt};
pub use span::Span;
pub use stmt::{Stmt, StmtKind};
pub use types::{TypeDef, TypeKind};
pub use validate::{validate, ValidateError};
pub use visit::{
    walk_expr, walk_field, walk_method, walk_program, walk_stmt, walk_type, Visitor,
};

// Size assertions to prevent accidental regressions. Expressions dominate
// arena memory; keep the id types at a single word-quarter.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ExprId, Span, TypeId};
    static_assert_size!(TypeId, 4);
    static_assert_size!(ExprId, 4);
    static_assert_size!(Span, 8);
}
