//! Dangling-reference repair.
//!
//! Tightening can leave a field or method reference whose qualifier is now
//! null-typed: the receiver can only ever be `null`, so the referent is
//! unreachable. Those references are retargeted to the program-wide null
//! sentinels, which downstream passes lower into explicit faults. While
//! here, effect-free qualifiers on static member references are dropped.

use jay_ir::{rewrite_expr, rewrite_stmt, Body, ExprId, ExprKind, FieldId, Program};

/// Repair dangling references across every ordinary body and field
/// initializer.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run(p: &mut Program) {
    let mut stmt_roots = Vec::new();
    let mut expr_roots = Vec::new();
    for method in p.method_ids() {
        if let Body::Block(stmts) = &p.method(method).body {
            stmt_roots.extend(stmts.iter().copied());
        }
    }
    for field in p.field_ids() {
        if let Some(init) = p.field(field).initializer {
            expr_roots.push(init);
        }
    }

    for stmt in stmt_roots {
        rewrite_stmt(p, stmt, &mut fix_node);
    }
    for expr in expr_roots {
        rewrite_expr(p, expr, &mut fix_node);
    }
}

fn fix_node(p: &mut Program, id: ExprId) {
    match p.expr(id).kind {
        ExprKind::FieldRef {
            instance: Some(instance),
            field,
        } => fix_field_ref(p, id, instance, field),
        ExprKind::Call { .. } => fix_call(p, id),
        _ => {}
    }
}

fn fix_field_ref(p: &mut Program, id: ExprId, instance: ExprId, field: FieldId) {
    if p.field(field).is_static() {
        // An effect-free qualifier on a static access is dead weight.
        if !p.has_side_effects(instance) {
            p.replace_expr(
                id,
                ExprKind::FieldRef {
                    instance: None,
                    field,
                },
            );
        }
    } else if p.type_of(instance).is_null() && field != p.null_field() {
        // A read through a receiver that can only be null.
        let qualifier = normalized_null_qualifier(p, instance);
        p.replace_expr(
            id,
            ExprKind::FieldRef {
                instance: Some(qualifier),
                field: p.null_field(),
            },
        );
    }
}

fn fix_call(p: &mut Program, id: ExprId) {
    let ExprKind::Call {
        instance,
        method,
        args,
        polymorphic,
    } = p.expr(id).kind
    else {
        return;
    };

    if method == p.null_method() {
        return;
    }

    let is_static = p.method(method).is_static();
    if is_static && !p.is_forwarder(method) {
        if let Some(inst) = instance {
            if !p.has_side_effects(inst) {
                p.replace_expr(
                    id,
                    ExprKind::Call {
                        instance: None,
                        method,
                        args,
                        polymorphic,
                    },
                );
            }
        }
    } else if !is_static {
        if let Some(inst) = instance {
            if p.type_of(inst).is_null() {
                let qualifier = normalized_null_qualifier(p, inst);
                let no_args = p.alloc_expr_list(&[]);
                p.replace_expr(
                    id,
                    ExprKind::Call {
                        instance: Some(qualifier),
                        method: p.null_method(),
                        args: no_args,
                        polymorphic: false,
                    },
                );
            }
        }
    } else {
        // Static forwarder: the receiver travels as the first argument.
        let first = p.expr_list(args).first().copied();
        if let Some(receiver) = first {
            if p.type_of(receiver).is_null() {
                let qualifier = normalized_null_qualifier(p, receiver);
                let no_args = p.alloc_expr_list(&[]);
                p.replace_expr(
                    id,
                    ExprKind::Call {
                        instance: Some(qualifier),
                        method: p.null_method(),
                        args: no_args,
                        polymorphic: false,
                    },
                );
            }
        }
    }
}

/// Keep a null-typed qualifier only for its effects; otherwise a plain
/// null literal stands in.
fn normalized_null_qualifier(p: &mut Program, instance: ExprId) -> ExprId {
    if p.has_side_effects(instance) {
        instance
    } else {
        let span = p.expr(instance).span;
        p.alloc_expr(ExprKind::Null, span)
    }
}
