//! The reference-type lattice.
//!
//! Declared reference types ordered by static assignability, with the null
//! type as the bottom element and the root class as the top. [`generalize`]
//! is the join; [`stronger`] picks the stricter of two comparable types.

use jay_ir::{Program, TypeId, TypeKind};

use crate::oracle::can_trivially_cast;

/// Least upper bound of two reference types.
///
/// The null type is the identity. For incomparable types the bound is the
/// common superclass, refined to a common interface when a unique most
/// specific one exists below it.
pub fn generalize(p: &Program, a: TypeId, b: TypeId) -> TypeId {
    if a == b {
        return a;
    }
    if a.is_null() {
        return b;
    }
    if b.is_null() {
        return a;
    }
    if can_trivially_cast(p, a, b) {
        return b;
    }
    if can_trivially_cast(p, b, a) {
        return a;
    }

    let class_bound = class_lub(p, a, b);
    if class_bound != p.object() {
        return class_bound;
    }

    // Nothing better than Object on the class side; a unique most specific
    // common interface beats it.
    let common: Vec<TypeId> = p
        .declared_types()
        .filter(|&i| {
            p.type_def(i).kind == TypeKind::Interface
                && can_trivially_cast(p, a, i)
                && can_trivially_cast(p, b, i)
        })
        .collect();
    for &candidate in &common {
        if common
            .iter()
            .all(|&other| can_trivially_cast(p, candidate, other))
        {
            return candidate;
        }
    }
    class_bound
}

/// Least upper bound of a set of reference types. The null type is the
/// identity, so an empty set generalizes to null.
pub fn generalize_types<I>(p: &Program, types: I) -> TypeId
where
    I: IntoIterator<Item = TypeId>,
{
    types
        .into_iter()
        .fold(TypeId::NULL, |acc, ty| generalize(p, acc, ty))
}

/// The stricter of two types: the strict subtype if one dominates, else
/// `a`. Ties keep `a`.
pub fn stronger(p: &Program, a: TypeId, b: TypeId) -> TypeId {
    if a != b && can_trivially_cast(p, b, a) {
        return b;
    }
    a
}

/// Common superclass of two types' class ancestries. Interfaces contribute
/// only the root class.
fn class_lub(p: &Program, a: TypeId, b: TypeId) -> TypeId {
    let mut ancestors_of_a = Vec::new();
    let mut cur = Some(class_anchor(p, a));
    while let Some(ty) = cur {
        ancestors_of_a.push(ty);
        cur = p.type_def(ty).superclass;
    }

    let mut cur = Some(class_anchor(p, b));
    while let Some(ty) = cur {
        if ancestors_of_a.contains(&ty) {
            return ty;
        }
        cur = p.type_def(ty).superclass;
    }
    p.object()
}

/// The class a type contributes to class-side LUB computation.
fn class_anchor(p: &Program, ty: TypeId) -> TypeId {
    if p.type_def(ty).kind == TypeKind::Class {
        ty
    } else {
        p.object()
    }
}

#[cfg(test)]
mod tests;
