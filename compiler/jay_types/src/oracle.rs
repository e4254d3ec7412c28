//! Hierarchy and instantiability queries.

use rustc_hash::FxHashSet;

use jay_ir::{MethodId, Program, TypeId, TypeKind};

/// Static assignability: every value of `from` is-a `to`, no runtime check
/// needed.
///
/// Holds for identity, for the null type against any reference type, for
/// any reference type against the root class, and along superclass /
/// transitive-interface edges. Never holds when either side is a primitive
/// (other than identity).
pub fn can_trivially_cast(p: &Program, from: TypeId, to: TypeId) -> bool {
    if from == to {
        return true;
    }
    if !from.is_reference() || !to.is_reference() {
        return false;
    }
    if from.is_null() {
        return true;
    }
    if to.is_null() {
        return false;
    }
    if to == p.object() {
        return true;
    }
    is_assignable(p, from, to)
}

/// Whether the hierarchies of `from` and `to` intersect: some declared
/// class is assignable to both, so a runtime cast might succeed.
///
/// The program is closed, so "might exist" is decided against the declared
/// hierarchy (allocation knowledge is deliberately not consulted; that is
/// what instantiability queries are for).
pub fn can_theoretically_cast(p: &Program, from: TypeId, to: TypeId) -> bool {
    if can_trivially_cast(p, from, to) || can_trivially_cast(p, to, from) {
        return true;
    }
    if !from.is_reference() || !to.is_reference() || to.is_null() {
        return false;
    }
    p.declared_types().any(|c| {
        p.type_def(c).kind == TypeKind::Class
            && is_assignable(p, c, from)
            && is_assignable(p, c, to)
    })
}

/// Declared-hierarchy assignability walk (identity, superclass chain,
/// transitive interfaces).
fn is_assignable(p: &Program, from: TypeId, to: TypeId) -> bool {
    if from == to {
        return true;
    }
    let def = p.type_def(from);
    if let Some(superclass) = def.superclass {
        if is_assignable(p, superclass, to) {
            return true;
        }
    }
    def.interfaces.iter().any(|&i| is_assignable(p, i, to))
}

/// Allocation-derived queries over a frozen program.
///
/// Built once per optimizer run: a single scan collects every class with a
/// direct allocation site. The optimizer never adds or removes allocations,
/// so the set stays valid for the run.
pub struct TypeOracle {
    /// Classes with a direct `new` anywhere in the program.
    instantiated: FxHashSet<TypeId>,
}

impl TypeOracle {
    /// Scan the program's allocation sites.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn build(p: &Program) -> Self {
        let mut instantiated = FxHashSet::default();
        for id in p.expr_ids() {
            if let jay_ir::ExprKind::New { class } = p.expr(id).kind {
                instantiated.insert(class);
            }
        }
        tracing::debug!(classes = instantiated.len(), "collected allocation classes");
        Self { instantiated }
    }

    /// Whether a `new` of exactly this class exists.
    #[inline]
    pub fn is_directly_instantiated(&self, class: TypeId) -> bool {
        self.instantiated.contains(&class)
    }

    /// Whether any value of type `ty` can exist: some directly-instantiated
    /// class is assignable to `ty`. Covers abstract classes and interfaces
    /// through their instantiated subtypes. The null type has no instances.
    pub fn is_instantiated(&self, p: &Program, ty: TypeId) -> bool {
        if !ty.is_reference() || ty.is_null() {
            return false;
        }
        self.instantiated
            .iter()
            .any(|&c| can_trivially_cast(p, c, ty))
    }

}

/// The set of methods `method` directly or transitively overrides.
pub fn all_overrides(p: &Program, method: MethodId) -> FxHashSet<MethodId> {
    let mut seen = FxHashSet::default();
    let mut stack: Vec<MethodId> = p.method(method).overrides.to_vec();
    while let Some(m) = stack.pop() {
        if seen.insert(m) {
            stack.extend(p.method(m).overrides.iter().copied());
        }
    }
    seen
}
