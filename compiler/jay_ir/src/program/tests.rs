use pretty_assertions::assert_eq;

use crate::{
    BinaryOp, ExprKind, FieldFlags, MethodFlags, Program, Slot, Span, StmtKind, TypeId, TypeKind,
};

#[test]
fn new_program_has_root_and_sentinels() {
    let p = Program::new();
    let object = p.object();
    assert!(object.is_declared());
    assert_eq!(p.type_def(object).kind, TypeKind::Class);
    assert_eq!(p.type_def(object).superclass, None);

    assert_eq!(p.field(p.null_field()).ty, TypeId::NULL);
    assert_eq!(p.method(p.null_method()).return_ty, TypeId::NULL);
}

#[test]
fn classes_default_extend_object() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, true);
    let circle = p.add_class("Circle", Some(shape), false);

    assert_eq!(p.type_def(shape).superclass, Some(p.object()));
    assert_eq!(p.type_def(circle).superclass, Some(shape));
    assert!(p.type_def(shape).is_abstract);
    assert!(p.type_def(circle).is_concrete_class());
}

#[test]
fn interfaces_are_abstract_and_classless() {
    let mut p = Program::new();
    let drawable = p.add_interface("Drawable", &[]);
    let scalable = p.add_interface("Scalable", &[drawable]);

    assert!(p.type_def(drawable).is_interface());
    assert!(p.type_def(drawable).is_abstract);
    assert_eq!(p.type_def(scalable).interfaces.as_slice(), &[drawable]);
}

#[test]
fn derived_types_follow_slot_declarations() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let circle = p.add_class("Circle", Some(shape), false);
    let m = p.add_method(shape, "area", TypeId::INT, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);

    let use_site = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    assert_eq!(p.type_of(use_site), shape);

    // Narrowing the slot is immediately visible at the use.
    p.set_slot_ty(Slot::Local(local), circle);
    assert_eq!(p.type_of(use_site), circle);
}

#[test]
fn type_of_literals_and_operators() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let m = p.add_method(shape, "check", TypeId::BOOL, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);

    let null = p.alloc_expr(ExprKind::Null, Span::DUMMY);
    assert_eq!(p.type_of(null), TypeId::NULL);

    let lhs = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let assign = p.alloc_expr(
        ExprKind::Binary {
            op: BinaryOp::Assign,
            lhs,
            rhs: null,
        },
        Span::DUMMY,
    );
    assert_eq!(p.type_of(assign), shape);

    let test = p.alloc_expr(
        ExprKind::InstanceOf {
            target: shape,
            expr: lhs,
        },
        Span::DUMMY,
    );
    assert_eq!(p.type_of(test), TypeId::BOOL);
}

#[test]
fn side_effect_classification() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let count = p.add_field(shape, "count", TypeId::INT, FieldFlags::STATIC);
    let hot = p.add_field(
        shape,
        "hot",
        TypeId::BOOL,
        FieldFlags::STATIC | FieldFlags::VOLATILE,
    );
    let m = p.add_method(shape, "make", shape, MethodFlags::STATIC);

    let null = p.alloc_expr(ExprKind::Null, Span::DUMMY);
    assert!(!p.has_side_effects(null));

    let read = p.alloc_expr(
        ExprKind::FieldRef {
            instance: None,
            field: count,
        },
        Span::DUMMY,
    );
    assert!(!p.has_side_effects(read));

    // Volatile reads are observable.
    let volatile_read = p.alloc_expr(
        ExprKind::FieldRef {
            instance: None,
            field: hot,
        },
        Span::DUMMY,
    );
    assert!(p.has_side_effects(volatile_read));

    let args = p.alloc_expr_list(&[]);
    let call = p.alloc_expr(
        ExprKind::Call {
            instance: None,
            method: m,
            args,
            polymorphic: false,
        },
        Span::DUMMY,
    );
    assert!(p.has_side_effects(call));

    let cast = p.alloc_expr(
        ExprKind::Cast {
            target: shape,
            expr: call,
        },
        Span::DUMMY,
    );
    assert!(p.has_side_effects(cast));
}

#[test]
fn replace_expr_keeps_ids_stable() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let m = p.add_method(shape, "id", shape, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);

    let inner = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let cast = p.alloc_expr(
        ExprKind::Cast {
            target: shape,
            expr: inner,
        },
        Span::DUMMY,
    );
    let ret = p.alloc_stmt(StmtKind::Return(Some(cast)), Span::DUMMY);

    // Drop the cast in place; the return statement still points at the
    // same id.
    p.replace_expr(cast, p.expr(inner).kind);
    assert_eq!(p.expr(cast).kind, ExprKind::LocalRef(local));
    match p.stmt(ret).kind {
        StmtKind::Return(Some(e)) => assert_eq!(e, cast),
        other => panic!("expected return statement, got {other:?}"),
    }
}

#[test]
fn forwarder_detection() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let inst = p.add_method(shape, "draw", TypeId::VOID, MethodFlags::empty());
    let fwd = p.add_method(shape, "draw$", TypeId::VOID, MethodFlags::STATIC);
    p.add_this_param(fwd, shape);
    p.set_instance_origin(fwd, Some(inst));

    assert!(p.is_forwarder(fwd));
    assert!(!p.is_forwarder(inst));
}
