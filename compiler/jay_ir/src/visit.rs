//! Read-only IR traversal.
//!
//! A single [`Visitor`] trait with default methods that call the matching
//! `walk_*` function. Override a `visit_*` method to hook a node kind; call
//! the `walk_*` function from the override to continue into children. The
//! visitor can mutate its own state, but the program stays immutable.

use crate::{Body, ExprId, ExprKind, FieldId, MethodId, Program, StmtId, StmtKind, TypeId};

/// IR visitor.
pub trait Visitor {
    /// Visit the whole program: every declared type, field, and method.
    fn visit_program(&mut self, p: &Program) {
        walk_program(self, p);
    }

    /// Visit a declared type.
    fn visit_type(&mut self, p: &Program, ty: TypeId) {
        walk_type(self, p, ty);
    }

    /// Visit a field declaration.
    fn visit_field(&mut self, p: &Program, field: FieldId) {
        walk_field(self, p, field);
    }

    /// Visit a method declaration.
    fn visit_method(&mut self, p: &Program, method: MethodId) {
        walk_method(self, p, method);
    }

    /// Visit a statement.
    fn visit_stmt(&mut self, p: &Program, stmt: StmtId) {
        walk_stmt(self, p, stmt);
    }

    /// Visit an expression.
    fn visit_expr(&mut self, p: &Program, expr: ExprId) {
        walk_expr(self, p, expr);
    }
}

/// Visit every declared type, then every field, then every method.
pub fn walk_program<V: Visitor + ?Sized>(v: &mut V, p: &Program) {
    for ty in p.declared_types() {
        v.visit_type(p, ty);
    }
    for field in p.field_ids() {
        v.visit_field(p, field);
    }
    for method in p.method_ids() {
        v.visit_method(p, method);
    }
}

/// Types have no child nodes; members are walked from the program level.
pub fn walk_type<V: Visitor + ?Sized>(_v: &mut V, _p: &Program, _ty: TypeId) {}

/// Walk a field's initializer, if any.
pub fn walk_field<V: Visitor + ?Sized>(v: &mut V, p: &Program, field: FieldId) {
    if let Some(init) = p.field(field).initializer {
        v.visit_expr(p, init);
    }
}

/// Walk a method's body. Foreign bodies expose their written field
/// references as expressions.
pub fn walk_method<V: Visitor + ?Sized>(v: &mut V, p: &Program, method: MethodId) {
    match &p.method(method).body {
        Body::None => {}
        Body::Block(stmts) => {
            for &stmt in stmts {
                v.visit_stmt(p, stmt);
            }
        }
        Body::Foreign(refs) => {
            for &write in &refs.field_writes {
                v.visit_expr(p, write);
            }
        }
    }
}

/// Walk a statement's children.
pub fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, p: &Program, stmt: StmtId) {
    match p.stmt(stmt).kind {
        StmtKind::Expr(e) => v.visit_expr(p, e),
        StmtKind::Decl { init, .. } => {
            if let Some(e) = init {
                v.visit_expr(p, e);
            }
        }
        StmtKind::Return(value) => {
            if let Some(e) = value {
                v.visit_expr(p, e);
            }
        }
        StmtKind::If {
            cond,
            then_block,
            else_block,
        } => {
            v.visit_expr(p, cond);
            v.visit_stmt(p, then_block);
            if let Some(s) = else_block {
                v.visit_stmt(p, s);
            }
        }
        StmtKind::Block(range) => {
            for &s in p.stmt_list(range) {
                v.visit_stmt(p, s);
            }
        }
        StmtKind::Try {
            try_block,
            catch_block,
            ..
        } => {
            v.visit_stmt(p, try_block);
            v.visit_stmt(p, catch_block);
        }
    }
}

/// Walk an expression's children.
pub fn walk_expr<V: Visitor + ?Sized>(v: &mut V, p: &Program, expr: ExprId) {
    match p.expr(expr).kind {
        ExprKind::Null
        | ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::LocalRef(_)
        | ExprKind::ParamRef(_)
        | ExprKind::New { .. } => {}
        ExprKind::FieldRef { instance, .. } => {
            if let Some(i) = instance {
                v.visit_expr(p, i);
            }
        }
        ExprKind::Call { instance, args, .. } => {
            if let Some(i) = instance {
                v.visit_expr(p, i);
            }
            for &arg in p.expr_list(args) {
                v.visit_expr(p, arg);
            }
        }
        ExprKind::Cast { expr: inner, .. } | ExprKind::InstanceOf { expr: inner, .. } => {
            v.visit_expr(p, inner);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            v.visit_expr(p, lhs);
            v.visit_expr(p, rhs);
        }
    }
}

#[cfg(test)]
mod tests;
