use pretty_assertions::assert_eq;

use jay_ir::{Program, TypeId};

use crate::{can_trivially_cast, generalize, generalize_types, stronger};

fn diamond() -> (Program, TypeId, TypeId, TypeId, TypeId) {
    let mut p = Program::new();
    let shape = p.add_class("Shape", None, true);
    let circle = p.add_class("Circle", Some(shape), false);
    let square = p.add_class("Square", Some(shape), false);
    let drawable = p.add_interface("Drawable", &[]);
    p.add_implements(circle, drawable);
    p.add_implements(square, drawable);
    (p, shape, circle, square, drawable)
}

#[test]
fn null_is_the_identity() {
    let (p, shape, ..) = diamond();
    assert_eq!(generalize(&p, TypeId::NULL, shape), shape);
    assert_eq!(generalize(&p, shape, TypeId::NULL), shape);
    assert_eq!(generalize(&p, TypeId::NULL, TypeId::NULL), TypeId::NULL);
}

#[test]
fn comparable_types_keep_the_supertype() {
    let (p, shape, circle, ..) = diamond();
    assert_eq!(generalize(&p, circle, shape), shape);
    assert_eq!(generalize(&p, shape, circle), shape);
    assert_eq!(generalize(&p, circle, circle), circle);
}

#[test]
fn siblings_generalize_to_their_superclass() {
    let (p, shape, circle, square, _) = diamond();
    assert_eq!(generalize(&p, circle, square), shape);
}

#[test]
fn unrelated_classes_sharing_an_interface_generalize_to_it() {
    let mut p = Program::new();
    let drawable = p.add_interface("Drawable", &[]);
    let circle = p.add_class("Circle", None, false);
    let label = p.add_class("Label", None, false);
    p.add_implements(circle, drawable);
    p.add_implements(label, drawable);

    assert_eq!(generalize(&p, circle, label), drawable);
}

#[test]
fn unrelated_classes_generalize_to_object() {
    let mut p = Program::new();
    let circle = p.add_class("Circle", None, false);
    let label = p.add_class("Label", None, false);
    assert_eq!(generalize(&p, circle, label), p.object());
}

#[test]
fn generalize_set_folds_from_null() {
    let (p, shape, circle, square, _) = diamond();
    assert_eq!(generalize_types(&p, []), TypeId::NULL);
    assert_eq!(generalize_types(&p, [TypeId::NULL, circle]), circle);
    assert_eq!(generalize_types(&p, [circle, square]), shape);
    assert_eq!(generalize_types(&p, [circle, square, p.object()]), p.object());
}

#[test]
fn stronger_picks_the_strict_subtype() {
    let (p, shape, circle, square, _) = diamond();
    assert_eq!(stronger(&p, shape, circle), circle);
    assert_eq!(stronger(&p, circle, shape), circle);
    assert_eq!(stronger(&p, shape, shape), shape);
    // Incomparable: keep the first.
    assert_eq!(stronger(&p, circle, square), circle);
    // Null is the strict bottom.
    assert_eq!(stronger(&p, shape, TypeId::NULL), TypeId::NULL);
}

mod proptest_lattice {
    use proptest::prelude::*;

    use super::*;

    /// Parent codes for a random class tower: class `i` extends
    /// `classes[code - 1]` when `0 < code <= i`, else the root class.
    fn arb_parent_codes() -> impl Strategy<Value = Vec<usize>> {
        proptest::collection::vec(0usize..8, 1..8)
    }

    fn build(codes: &[usize]) -> (Program, Vec<TypeId>) {
        let mut p = Program::new();
        let mut classes = Vec::with_capacity(codes.len());
        for (i, &code) in codes.iter().enumerate() {
            let parent = if code == 0 || code > i {
                None
            } else {
                Some(classes[code - 1])
            };
            classes.push(p.add_class(&format!("C{i}"), parent, false));
        }
        (p, classes)
    }

    proptest! {
        #[test]
        fn generalize_is_commutative(
            codes in arb_parent_codes(),
            ia: proptest::sample::Index,
            ib: proptest::sample::Index,
        ) {
            let (p, classes) = build(&codes);
            let a = classes[ia.index(classes.len())];
            let b = classes[ib.index(classes.len())];
            prop_assert_eq!(generalize(&p, a, b), generalize(&p, b, a));
        }

        #[test]
        fn generalize_is_an_upper_bound(
            codes in arb_parent_codes(),
            ia: proptest::sample::Index,
            ib: proptest::sample::Index,
        ) {
            let (p, classes) = build(&codes);
            let a = classes[ia.index(classes.len())];
            let b = classes[ib.index(classes.len())];
            let g = generalize(&p, a, b);
            prop_assert!(can_trivially_cast(&p, a, g));
            prop_assert!(can_trivially_cast(&p, b, g));
        }

        #[test]
        fn stronger_returns_one_of_its_inputs(
            codes in arb_parent_codes(),
            ia: proptest::sample::Index,
            ib: proptest::sample::Index,
        ) {
            let (p, classes) = build(&codes);
            let a = classes[ia.index(classes.len())];
            let b = classes[ib.index(classes.len())];
            let s = stronger(&p, a, b);
            prop_assert!(s == a || s == b);
            // Whatever wins is castable from the loser or is `a` itself.
            if s == b {
                prop_assert!(can_trivially_cast(&p, b, a));
            }
        }

        #[test]
        fn null_absorbs_into_anything(
            codes in arb_parent_codes(),
            ia: proptest::sample::Index,
        ) {
            let (p, classes) = build(&codes);
            let a = classes[ia.index(classes.len())];
            prop_assert_eq!(generalize(&p, TypeId::NULL, a), a);
            prop_assert_eq!(stronger(&p, a, TypeId::NULL), TypeId::NULL);
        }
    }
}
