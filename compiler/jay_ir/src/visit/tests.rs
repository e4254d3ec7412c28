use crate::{
    Body, ExprId, ExprKind, MethodFlags, Program, Span, StmtKind, TypeId, Visitor,
};

/// Counts expression nodes reached by the default walk.
struct CountExprs {
    count: usize,
}

impl Visitor for CountExprs {
    fn visit_expr(&mut self, p: &Program, expr: ExprId) {
        self.count += 1;
        crate::walk_expr(self, p, expr);
    }
}

#[test]
fn walks_method_bodies_and_field_initializers() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let field = p.add_field(shape, "origin", shape, crate::FieldFlags::STATIC);
    let init = p.alloc_expr(ExprKind::Null, Span::DUMMY);
    p.set_field_initializer(field, init);

    let m = p.add_method(shape, "poke", TypeId::VOID, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);
    let null = p.alloc_expr(ExprKind::Null, Span::DUMMY);
    let decl = p.alloc_stmt(
        StmtKind::Decl {
            local,
            init: Some(null),
        },
        Span::DUMMY,
    );
    p.set_method_body(m, Body::Block(vec![decl]));

    let mut v = CountExprs { count: 0 };
    v.visit_program(&p);
    // The field initializer and the declaration initializer.
    assert_eq!(v.count, 2);
}

#[test]
fn walks_nested_statements() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let m = p.add_method(shape, "branch", TypeId::VOID, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);

    let cond = p.alloc_expr(ExprKind::Bool(true), Span::DUMMY);
    let read = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let then_stmt = p.alloc_stmt(StmtKind::Expr(read), Span::DUMMY);
    let then_range = p.alloc_stmt_list(&[then_stmt]);
    let then_block = p.alloc_stmt(StmtKind::Block(then_range), Span::DUMMY);
    let if_stmt = p.alloc_stmt(
        StmtKind::If {
            cond,
            then_block,
            else_block: None,
        },
        Span::DUMMY,
    );
    p.set_method_body(m, Body::Block(vec![if_stmt]));

    let mut v = CountExprs { count: 0 };
    v.visit_program(&p);
    assert_eq!(v.count, 2);
}

#[test]
fn walks_foreign_field_writes() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let field = p.add_field(shape, "state", shape, crate::FieldFlags::STATIC);
    let native = p.add_method(shape, "poke", TypeId::VOID, MethodFlags::NATIVE);

    let write = p.alloc_expr(
        ExprKind::FieldRef {
            instance: None,
            field,
        },
        Span::DUMMY,
    );
    p.set_method_body(
        native,
        Body::Foreign(crate::ForeignRefs {
            field_writes: vec![write],
            method_refs: Vec::new(),
        }),
    );

    let mut v = CountExprs { count: 0 };
    v.visit_program(&p);
    assert_eq!(v.count, 1);
}
