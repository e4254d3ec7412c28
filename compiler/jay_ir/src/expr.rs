//! Expression nodes.
//!
//! All children are indices, not boxes; variable-length argument lists are
//! ranges into the program's flattened expression-list table. `ExprKind` is
//! `Copy`, so traversals can lift a node's kind out of the arena, recurse,
//! and write a replacement back without aliasing trouble.

use crate::{ExprId, ExprRange, FieldId, LocalId, MethodId, ParamId, Span, TypeId};

/// An expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Binary operators.
///
/// `Assign` is the only writing operator; the rest are value-producing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Assign,
    Eq,
    NotEq,
    And,
    Or,
}

/// Expression variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// The `null` literal.
    Null,

    /// A boolean literal.
    Bool(bool),

    /// An integer literal.
    Int(i64),

    /// A read of (or assignment target for) a local variable.
    LocalRef(LocalId),

    /// A read of (or assignment target for) a parameter.
    ParamRef(ParamId),

    /// A field access. `instance` is `None` for unqualified static access.
    FieldRef {
        instance: Option<ExprId>,
        field: FieldId,
    },

    /// A method call. `polymorphic` marks calls whose dispatch depends on
    /// the receiver's runtime type; clearing it permits direct invocation.
    Call {
        instance: Option<ExprId>,
        method: MethodId,
        args: ExprRange,
        polymorphic: bool,
    },

    /// An allocation. Constructor invocation is a separate call, so `New`
    /// carries no arguments.
    New { class: TypeId },

    /// A checked cast to a reference type. A cast whose target is the null
    /// type is a guaranteed failure that downstream passes lower into an
    /// explicit fault.
    Cast { target: TypeId, expr: ExprId },

    /// A runtime type test.
    InstanceOf { target: TypeId, expr: ExprId },

    /// A binary operation.
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
}
