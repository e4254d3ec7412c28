use crate::TypeId;

#[test]
fn primitives_are_not_reference_types() {
    assert!(!TypeId::VOID.is_reference());
    assert!(!TypeId::BOOL.is_reference());
    assert!(!TypeId::INT.is_reference());
}

#[test]
fn null_is_a_reference_type_but_not_declared() {
    assert!(TypeId::NULL.is_reference());
    assert!(TypeId::NULL.is_null());
    assert!(!TypeId::NULL.is_declared());
    assert_eq!(TypeId::NULL.declared_index(), None);
}

#[test]
fn declared_types_start_at_first_declared() {
    let first = TypeId::from_raw(TypeId::FIRST_DECLARED);
    assert!(first.is_reference());
    assert!(first.is_declared());
    assert_eq!(first.declared_index(), Some(0));

    let third = TypeId::from_raw(TypeId::FIRST_DECLARED + 2);
    assert_eq!(third.declared_index(), Some(2));
}
