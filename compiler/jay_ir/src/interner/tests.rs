use crate::{Interner, Name};

#[test]
fn same_string_same_name() {
    let interner = Interner::new();
    let a = interner.intern("widget");
    let b = interner.intern("widget");
    assert_eq!(a, b);
}

#[test]
fn different_strings_different_names() {
    let interner = Interner::new();
    let a = interner.intern("alpha");
    let b = interner.intern("beta");
    assert_ne!(a, b);
}

#[test]
fn resolve_round_trips() {
    let interner = Interner::new();
    let name = interner.intern("Shape");
    assert_eq!(interner.resolve(name), "Shape");
}

#[test]
fn empty_string_is_pre_interned() {
    let interner = Interner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.resolve(Name::EMPTY), "");
}
