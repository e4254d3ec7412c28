use crate::{
    validate, ExprId, ExprKind, MethodFlags, Program, Span, TypeId, ValidateError,
};

#[test]
fn fresh_program_is_valid() {
    let p = Program::new();
    assert_eq!(validate(&p), Ok(()));
}

#[test]
fn small_program_is_valid() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, true);
    let circle = p.add_class("Circle", Some(shape), false);
    let drawable = p.add_interface("Drawable", &[]);
    p.add_implements(circle, drawable);

    let m = p.add_method(circle, "clone", shape, MethodFlags::empty());
    let local = p.add_local(m, "c", circle);
    let read = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let cast = p.alloc_expr(
        ExprKind::Cast {
            target: shape,
            expr: read,
        },
        Span::DUMMY,
    );
    let ret = p.alloc_stmt(crate::StmtKind::Return(Some(cast)), Span::DUMMY);
    p.set_method_body(m, crate::Body::Block(vec![ret]));

    assert_eq!(validate(&p), Ok(()));
}

#[test]
fn rejects_cast_to_primitive() {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, false);
    let m = p.add_method(shape, "bad", TypeId::VOID, MethodFlags::empty());
    let local = p.add_local(m, "s", shape);
    let read = p.alloc_expr(ExprKind::LocalRef(local), Span::DUMMY);
    let cast = p.alloc_expr(
        ExprKind::Cast {
            target: TypeId::INT,
            expr: read,
        },
        Span::DUMMY,
    );

    assert_eq!(
        validate(&p),
        Err(ValidateError::NonReferenceTarget { expr: cast })
    );
}

#[test]
fn rejects_override_arity_mismatch() {
    let mut p = Program::new();
    let a = p.add_class("A", None, false);
    let b = p.add_class("B", Some(a), false);
    let base = p.add_method(a, "m", TypeId::VOID, MethodFlags::empty());
    p.add_param(base, "x", p.object());
    let sub = p.add_method(b, "m", TypeId::VOID, MethodFlags::empty());
    p.add_override(sub, base);

    assert_eq!(
        validate(&p),
        Err(ValidateError::ParamCountMismatch {
            method: sub,
            overridden: base,
        })
    );
}

#[test]
fn rejects_forwarder_without_this_marker() {
    let mut p = Program::new();
    let a = p.add_class("A", None, false);
    let inst = p.add_method(a, "m", TypeId::VOID, MethodFlags::empty());
    let fwd = p.add_method(a, "m$", TypeId::VOID, MethodFlags::STATIC);
    p.add_param(fwd, "self", a); // plain param, not a this marker
    p.set_instance_origin(fwd, Some(inst));

    assert_eq!(
        validate(&p),
        Err(ValidateError::ForwarderWithoutThis { method: fwd })
    );
}

#[test]
fn rejects_misplaced_this_marker() {
    let mut p = Program::new();
    let a = p.add_class("A", None, false);
    let m = p.add_method(a, "m", TypeId::VOID, MethodFlags::empty());
    let this = p.add_this_param(m, a); // non-static method

    assert_eq!(
        validate(&p),
        Err(ValidateError::MisplacedThisMarker { method: m, param: this })
    );
}

#[test]
fn rejects_dangling_expr_id() {
    let mut p = Program::new();
    let a = p.add_class("A", None, false);
    let bogus = ExprId::from_raw(999);
    p.alloc_expr(
        ExprKind::Cast {
            target: a,
            expr: bogus,
        },
        Span::DUMMY,
    );

    assert_eq!(validate(&p), Err(ValidateError::UnknownExpr { expr: bogus }));
}
