//! Statement nodes.

use crate::{ExprId, LocalId, Span, StmtId, StmtRange};

/// A statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statement variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// An expression evaluated for effect.
    Expr(ExprId),

    /// A local declaration, with optional initializer.
    Decl {
        local: LocalId,
        init: Option<ExprId>,
    },

    /// Return from the enclosing method.
    Return(Option<ExprId>),

    /// Conditional execution. Both branches are block statements.
    If {
        cond: ExprId,
        then_block: StmtId,
        else_block: Option<StmtId>,
    },

    /// A statement list.
    Block(StmtRange),

    /// Exception handling. The catch parameter is a method local bound to
    /// the thrown value.
    Try {
        try_block: StmtId,
        catch_param: LocalId,
        catch_block: StmtId,
    },
}
