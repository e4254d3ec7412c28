use pretty_assertions::assert_eq;

use crate::{rewrite_expr, rewrite_stmt, ExprKind, MethodFlags, Program, Span, StmtKind, TypeId};

#[test]
fn children_are_handled_before_parents() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let m = p.add_method(shape, "probe", TypeId::VOID, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);

    let inner = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let cast = p.alloc_expr(
        ExprKind::Cast {
            target: shape,
            expr: inner,
        },
        Span::DUMMY,
    );

    let mut order = Vec::new();
    rewrite_expr(&mut p, cast, &mut |_, id| order.push(id));
    assert_eq!(order, vec![inner, cast]);
}

#[test]
fn handler_replacement_is_visible_to_parent_handlers() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let m = p.add_method(shape, "probe", TypeId::VOID, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);

    // (Shape) s — replace the child with null, then observe the cast's
    // operand type from the parent handler.
    let inner = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let cast = p.alloc_expr(
        ExprKind::Cast {
            target: shape,
            expr: inner,
        },
        Span::DUMMY,
    );

    let mut seen_operand_ty = None;
    rewrite_expr(&mut p, cast, &mut |p, id| match p.expr(id).kind {
        ExprKind::LocalRef(_) => p.replace_expr(id, ExprKind::Null),
        ExprKind::Cast { expr, .. } => seen_operand_ty = Some(p.type_of(expr)),
        _ => {}
    });
    assert_eq!(seen_operand_ty, Some(TypeId::NULL));
}

#[test]
fn rewrites_through_statements() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let m = p.add_method(shape, "probe", TypeId::VOID, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);

    let null = p.alloc_expr(ExprKind::Null, Span::DUMMY);
    let decl = p.alloc_stmt(
        StmtKind::Decl {
            local,
            init: Some(null),
        },
        Span::DUMMY,
    );
    let read = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let ret = p.alloc_stmt(StmtKind::Return(Some(read)), Span::DUMMY);
    let range = p.alloc_stmt_list(&[decl, ret]);
    let block = p.alloc_stmt(StmtKind::Block(range), Span::DUMMY);

    let mut count = 0;
    rewrite_stmt(&mut p, block, &mut |_, _| count += 1);
    assert_eq!(count, 2);
}
