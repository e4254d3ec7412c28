//! Post-order mutating traversal.
//!
//! [`rewrite_expr`] hands every expression node to the handler *after* its
//! children, so by the time a node is processed its operands' types already
//! reflect any narrowing the handler performed below it. The handler
//! substitutes nodes in place via [`Program::replace_expr`]; ids are
//! stable, so the walk over a parent is unaffected by child replacement.
//!
//! Nodes the handler synthesizes as replacements are not themselves
//! revisited in the same traversal.

use smallvec::SmallVec;

use crate::{ExprId, ExprKind, Program, StmtId, StmtKind};

/// Rewrite every expression under a statement, children before parents.
pub fn rewrite_stmt<F>(p: &mut Program, stmt: StmtId, handler: &mut F)
where
    F: FnMut(&mut Program, ExprId),
{
    match p.stmt(stmt).kind {
        StmtKind::Expr(e) => rewrite_expr(p, e, handler),
        StmtKind::Decl { init, .. } => {
            if let Some(e) = init {
                rewrite_expr(p, e, handler);
            }
        }
        StmtKind::Return(value) => {
            if let Some(e) = value {
                rewrite_expr(p, e, handler);
            }
        }
        StmtKind::If {
            cond,
            then_block,
            else_block,
        } => {
            rewrite_expr(p, cond, handler);
            rewrite_stmt(p, then_block, handler);
            if let Some(s) = else_block {
                rewrite_stmt(p, s, handler);
            }
        }
        StmtKind::Block(range) => {
            let stmts: SmallVec<[StmtId; 8]> = p.stmt_list(range).iter().copied().collect();
            for s in stmts {
                rewrite_stmt(p, s, handler);
            }
        }
        StmtKind::Try {
            try_block,
            catch_block,
            ..
        } => {
            rewrite_stmt(p, try_block, handler);
            rewrite_stmt(p, catch_block, handler);
        }
    }
}

/// Rewrite an expression tree, children before parents.
pub fn rewrite_expr<F>(p: &mut Program, expr: ExprId, handler: &mut F)
where
    F: FnMut(&mut Program, ExprId),
{
    match p.expr(expr).kind {
        ExprKind::Null
        | ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::LocalRef(_)
        | ExprKind::ParamRef(_)
        | ExprKind::New { .. } => {}
        ExprKind::FieldRef { instance, .. } => {
            if let Some(i) = instance {
                rewrite_expr(p, i, handler);
            }
        }
        ExprKind::Call { instance, args, .. } => {
            if let Some(i) = instance {
                rewrite_expr(p, i, handler);
            }
            let args: SmallVec<[ExprId; 4]> = p.expr_list(args).iter().copied().collect();
            for arg in args {
                rewrite_expr(p, arg, handler);
            }
        }
        ExprKind::Cast { expr: inner, .. } | ExprKind::InstanceOf { expr: inner, .. } => {
            rewrite_expr(p, inner, handler);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            rewrite_expr(p, lhs, handler);
            rewrite_expr(p, rhs, handler);
        }
    }

    handler(p, expr);
}

#[cfg(test)]
mod tests;
