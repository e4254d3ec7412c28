//! Program well-formedness checking.
//!
//! Walks every arena and verifies the structural invariants the optimizer
//! assumes: all ids resolve, cast and type-test targets are reference
//! types, overriding methods agree on parameter counts, and static
//! forwarders carry their `this` marker in first position. Embedders run
//! this eagerly in debug builds; the optimizer itself never does — a breach
//! found mid-pass is handled by leaving the affected slot alone.

use crate::{
    Body, ExprId, ExprKind, MethodId, ParamId, Program, StmtId, StmtKind, TypeId, TypeKind,
};

/// A structural invariant breach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// An id referenced a type that is not declared in the program.
    UnknownType { ty: TypeId },
    /// An expression referenced an out-of-bounds node.
    UnknownExpr { expr: ExprId },
    /// A statement referenced an out-of-bounds node.
    UnknownStmt { stmt: StmtId },
    /// A cast or type test targeted a non-reference type.
    NonReferenceTarget { expr: ExprId },
    /// A method and one of its overridden methods disagree on parameter
    /// count.
    ParamCountMismatch {
        method: MethodId,
        overridden: MethodId,
    },
    /// A static forwarder's first parameter lacks the `this` marker.
    ForwarderWithoutThis { method: MethodId },
    /// A forwarder and its instance counterpart disagree on arity.
    ForwarderArity {
        forwarder: MethodId,
        origin: MethodId,
    },
    /// A `this` marker appeared somewhere other than the first parameter
    /// of a static method.
    MisplacedThisMarker { method: MethodId, param: ParamId },
}

impl std::fmt::Display for ValidateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidateError::UnknownType { ty } => write!(f, "{ty:?} is not declared"),
            ValidateError::UnknownExpr { expr } => write!(f, "{expr:?} is out of bounds"),
            ValidateError::UnknownStmt { stmt } => write!(f, "{stmt:?} is out of bounds"),
            ValidateError::NonReferenceTarget { expr } => {
                write!(f, "{expr:?} targets a non-reference type")
            }
            ValidateError::ParamCountMismatch { method, overridden } => write!(
                f,
                "{method:?} and overridden {overridden:?} disagree on parameter count"
            ),
            ValidateError::ForwarderWithoutThis { method } => {
                write!(f, "static forwarder {method:?} lacks a leading this parameter")
            }
            ValidateError::ForwarderArity { forwarder, origin } => write!(
                f,
                "forwarder {forwarder:?} does not have one more parameter than {origin:?}"
            ),
            ValidateError::MisplacedThisMarker { method, param } => {
                write!(f, "{param:?} of {method:?} carries a misplaced this marker")
            }
        }
    }
}

impl std::error::Error for ValidateError {}

/// Check every structural invariant; returns the first breach found.
pub fn validate(p: &Program) -> Result<(), ValidateError> {
    validate_types(p)?;
    validate_fields(p)?;
    validate_methods(p)?;
    validate_exprs(p)?;
    validate_stmts(p)?;
    Ok(())
}

fn check_type(p: &Program, ty: TypeId) -> Result<(), ValidateError> {
    if ty.is_declared() && ty.declared_index().is_some_and(|i| i >= p.num_types()) {
        return Err(ValidateError::UnknownType { ty });
    }
    Ok(())
}

fn check_expr(p: &Program, expr: ExprId) -> Result<(), ValidateError> {
    if expr.index() >= p.num_exprs() {
        return Err(ValidateError::UnknownExpr { expr });
    }
    Ok(())
}

fn check_stmt(p: &Program, stmt: StmtId) -> Result<(), ValidateError> {
    if stmt.index() >= p.num_stmts() {
        return Err(ValidateError::UnknownStmt { stmt });
    }
    Ok(())
}

fn validate_types(p: &Program) -> Result<(), ValidateError> {
    for ty in p.declared_types() {
        let def = p.type_def(ty);
        if let Some(superclass) = def.superclass {
            check_type(p, superclass)?;
            if !superclass.is_declared() || p.type_def(superclass).kind != TypeKind::Class {
                return Err(ValidateError::UnknownType { ty: superclass });
            }
        }
        for &iface in &def.interfaces {
            check_type(p, iface)?;
            if !iface.is_declared() || p.type_def(iface).kind != TypeKind::Interface {
                return Err(ValidateError::UnknownType { ty: iface });
            }
        }
    }
    Ok(())
}

fn validate_fields(p: &Program) -> Result<(), ValidateError> {
    for field in p.field_ids() {
        let f = p.field(field);
        check_type(p, f.owner)?;
        check_type(p, f.ty)?;
        if let Some(init) = f.initializer {
            check_expr(p, init)?;
        }
    }
    Ok(())
}

fn validate_methods(p: &Program) -> Result<(), ValidateError> {
    for method in p.method_ids() {
        let m = p.method(method);
        check_type(p, m.owner)?;
        check_type(p, m.return_ty)?;

        for (i, &param) in m.params.iter().enumerate() {
            if p.param(param).is_this && (i != 0 || !m.is_static()) {
                return Err(ValidateError::MisplacedThisMarker { method, param });
            }
        }

        for &overridden in &m.overrides {
            if p.method(overridden).params.len() != m.params.len() {
                return Err(ValidateError::ParamCountMismatch { method, overridden });
            }
        }

        if let Some(origin) = m.instance_origin {
            if !m.params.first().is_some_and(|&first| p.param(first).is_this) {
                return Err(ValidateError::ForwarderWithoutThis { method });
            }
            if m.params.len() != p.method(origin).params.len() + 1 {
                return Err(ValidateError::ForwarderArity {
                    forwarder: method,
                    origin,
                });
            }
        }

        match &m.body {
            Body::None => {}
            Body::Block(stmts) => {
                for &stmt in stmts {
                    check_stmt(p, stmt)?;
                }
            }
            Body::Foreign(refs) => {
                for &write in &refs.field_writes {
                    check_expr(p, write)?;
                }
            }
        }
    }
    Ok(())
}

fn validate_exprs(p: &Program) -> Result<(), ValidateError> {
    for id in p.expr_ids() {
        match p.expr(id).kind {
            ExprKind::Null | ExprKind::Bool(_) | ExprKind::Int(_) => {}
            ExprKind::LocalRef(_) | ExprKind::ParamRef(_) => {}
            ExprKind::FieldRef { instance, .. } => {
                if let Some(i) = instance {
                    check_expr(p, i)?;
                }
            }
            ExprKind::Call { instance, args, .. } => {
                if let Some(i) = instance {
                    check_expr(p, i)?;
                }
                if (args.start + args.len) as usize > p.num_expr_list_entries() {
                    return Err(ValidateError::UnknownExpr { expr: id });
                }
            }
            ExprKind::New { class } => {
                check_type(p, class)?;
                if !class.is_declared() || p.type_def(class).kind != TypeKind::Class {
                    return Err(ValidateError::UnknownType { ty: class });
                }
            }
            ExprKind::Cast { target, expr } | ExprKind::InstanceOf { target, expr } => {
                check_expr(p, expr)?;
                check_type(p, target)?;
                if !target.is_reference() {
                    return Err(ValidateError::NonReferenceTarget { expr: id });
                }
            }
            ExprKind::Binary { lhs, rhs, .. } => {
                check_expr(p, lhs)?;
                check_expr(p, rhs)?;
            }
        }
    }
    Ok(())
}

fn validate_stmts(p: &Program) -> Result<(), ValidateError> {
    for id in p.stmt_ids() {
        match p.stmt(id).kind {
            StmtKind::Expr(e) => check_expr(p, e)?,
            StmtKind::Decl { init, .. } => {
                if let Some(e) = init {
                    check_expr(p, e)?;
                }
            }
            StmtKind::Return(value) => {
                if let Some(e) = value {
                    check_expr(p, e)?;
                }
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                check_expr(p, cond)?;
                check_stmt(p, then_block)?;
                if let Some(s) = else_block {
                    check_stmt(p, s)?;
                }
            }
            StmtKind::Block(range) => {
                if (range.start + range.len) as usize > p.num_stmt_list_entries() {
                    return Err(ValidateError::UnknownStmt { stmt: id });
                }
            }
            StmtKind::Try {
                try_block,
                catch_block,
                ..
            } => {
                check_stmt(p, try_block)?;
                check_stmt(p, catch_block)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
