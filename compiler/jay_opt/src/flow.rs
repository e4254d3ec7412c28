//! Type-flow recording.
//!
//! A single read-only traversal that builds the global relations the
//! tightener consumes. Everything is keyed by id — node identity, not
//! structure — and nothing here is mutated once recording finishes.

use rustc_hash::{FxHashMap, FxHashSet};

use jay_ir::{
    walk_expr, walk_field, walk_method, walk_stmt, BinaryOp, Body, ExprId, ExprKind, FieldId,
    MethodId, ParamId, Program, Slot, StmtId, StmtKind, TypeId, TypeKind, Visitor,
};
use jay_types::{all_overrides, TypeOracle};

/// The recorded flow relations.
///
/// - `assignments`: every expression ever stored into a slot.
/// - `returns`: every expression returned from a method.
/// - `overriders`: for each method, the overriding methods declared in
///   instantiated types.
/// - `implementors`: for each reference type, the directly-instantiated
///   classes assignable to it.
/// - `param_up_refs`: for each parameter, the positionally-matching
///   parameters of overridden methods (plus the forwarder `this`
///   self-cycle that pins its type).
/// - `pinned`: slots that escape through an opaque boundary and must keep
///   their declared type as a generalization floor.
#[derive(Default)]
pub struct TypeFlow {
    pub assignments: FxHashMap<Slot, FxHashSet<ExprId>>,
    pub returns: FxHashMap<MethodId, FxHashSet<ExprId>>,
    pub overriders: FxHashMap<MethodId, FxHashSet<MethodId>>,
    pub implementors: FxHashMap<TypeId, FxHashSet<TypeId>>,
    pub param_up_refs: FxHashMap<ParamId, FxHashSet<ParamId>>,
    pub pinned: FxHashSet<Slot>,
}

impl TypeFlow {
    fn add_assignment(&mut self, slot: Slot, expr: ExprId) {
        self.assignments.entry(slot).or_default().insert(expr);
    }

    fn add_up_ref(&mut self, param: ParamId, up: ParamId) {
        self.param_up_refs.entry(param).or_default().insert(up);
    }

    /// Returns whether `class` was newly added to `implementors(ty)`.
    fn add_implementor(&mut self, ty: TypeId, class: TypeId) -> bool {
        self.implementors.entry(ty).or_default().insert(class)
    }
}

/// Record the flow relations of a program.
#[tracing::instrument(level = "debug", skip_all)]
pub fn record(p: &Program, oracle: &TypeOracle) -> TypeFlow {
    let mut recorder = FlowRecorder {
        oracle,
        flow: TypeFlow::default(),
        current_method: None,
    };
    recorder.visit_program(p);
    tracing::debug!(
        assigned_slots = recorder.flow.assignments.len(),
        returning_methods = recorder.flow.returns.len(),
        pinned_slots = recorder.flow.pinned.len(),
        "recorded type flow"
    );
    recorder.flow
}

struct FlowRecorder<'a> {
    oracle: &'a TypeOracle,
    flow: TypeFlow,
    current_method: Option<MethodId>,
}

impl FlowRecorder<'_> {
    /// Walk the superclass chain of a directly-instantiated class, adding
    /// it to `implementors` of each ancestor and of every interface those
    /// ancestors transitively implement.
    fn record_implementors(&mut self, p: &Program, class: TypeId) {
        let mut cur = Some(class);
        while let Some(ty) = cur {
            self.flow.add_implementor(ty, class);
            let mut ifaces: Vec<TypeId> = p.type_def(ty).interfaces.to_vec();
            while let Some(iface) = ifaces.pop() {
                // Already present means its superinterfaces were walked too.
                if self.flow.add_implementor(iface, class) {
                    ifaces.extend(p.type_def(iface).interfaces.iter().copied());
                }
            }
            cur = p.type_def(ty).superclass;
        }
    }

    /// Install override up-refs for an instance method: each parameter
    /// links to the positionally-matching parameter of every overridden
    /// method. Mismatched arity indicates an upstream bug; that overridden
    /// method is skipped.
    fn record_override_up_refs(&mut self, p: &Program, method: MethodId) {
        let params = &p.method(method).params;
        for overridden in all_overrides(p, method) {
            let up_params = &p.method(overridden).params;
            if up_params.len() != params.len() {
                continue;
            }
            for (&param, &up) in params.iter().zip(up_params) {
                self.flow.add_up_ref(param, up);
            }
        }
    }

    /// Install up-refs for a static forwarder whose instance counterpart
    /// survived pruning: the `this` parameter pins itself, and parameter
    /// `j` links to the counterpart's parameter `j - 1`.
    fn record_forwarder_up_refs(&mut self, p: &Program, method: MethodId) {
        let m = p.method(method);
        let Some(origin) = m.instance_origin else {
            // Counterpart pruned: nothing to link against.
            return;
        };
        let Some(&this) = m.params.first() else {
            return;
        };
        self.flow.add_up_ref(this, this);

        let origin_params = &p.method(origin).params;
        if origin_params.len() + 1 != m.params.len() {
            return;
        }
        for (j, &param) in m.params.iter().enumerate().skip(1) {
            self.flow.add_up_ref(param, origin_params[j - 1]);
        }
    }

    /// Pin everything a foreign body can reach: written fields and every
    /// parameter of referenced methods.
    fn record_foreign_pins(&mut self, p: &Program, method: MethodId) {
        let Body::Foreign(refs) = &p.method(method).body else {
            return;
        };
        for &write in &refs.field_writes {
            if let ExprKind::FieldRef { field, .. } = p.expr(write).kind {
                self.flow.pinned.insert(Slot::Field(field));
            }
        }
        for &target in &refs.method_refs {
            for &param in &p.method(target).params {
                self.flow.pinned.insert(Slot::Param(param));
            }
        }
    }
}

impl Visitor for FlowRecorder<'_> {
    fn visit_type(&mut self, p: &Program, ty: TypeId) {
        if p.type_def(ty).kind == TypeKind::Class && self.oracle.is_directly_instantiated(ty) {
            self.record_implementors(p, ty);
        }
    }

    fn visit_field(&mut self, p: &Program, field: FieldId) {
        let f = p.field(field);
        if let Some(init) = f.initializer {
            if f.ty.is_reference() {
                self.flow.add_assignment(Slot::Field(field), init);
            }
        }
        walk_field(self, p, field);
    }

    fn visit_method(&mut self, p: &Program, method: MethodId) {
        if p.is_forwarder(method) {
            self.record_forwarder_up_refs(p, method);
        } else if !p.method(method).is_static() {
            self.record_override_up_refs(p, method);
        }
        self.record_foreign_pins(p, method);

        let prev = self.current_method.replace(method);
        walk_method(self, p, method);
        self.current_method = prev;

        if self.oracle.is_instantiated(p, p.method(method).owner) {
            for overridden in all_overrides(p, method) {
                self.flow
                    .overriders
                    .entry(overridden)
                    .or_default()
                    .insert(method);
            }
        }
    }

    fn visit_stmt(&mut self, p: &Program, stmt: StmtId) {
        match p.stmt(stmt).kind {
            StmtKind::Decl {
                local,
                init: Some(init),
            } => {
                if p.local(local).ty.is_reference() {
                    self.flow.add_assignment(Slot::Local(local), init);
                }
            }
            StmtKind::Return(Some(value)) => {
                if let Some(method) = self.current_method {
                    if p.method(method).return_ty.is_reference() {
                        self.flow.returns.entry(method).or_default().insert(value);
                    }
                }
            }
            StmtKind::Try { catch_param, .. } => {
                // Thrown values escape local control flow.
                self.flow.pinned.insert(Slot::Local(catch_param));
            }
            _ => {}
        }
        walk_stmt(self, p, stmt);
    }

    fn visit_expr(&mut self, p: &Program, expr: ExprId) {
        match p.expr(expr).kind {
            ExprKind::Binary {
                op: BinaryOp::Assign,
                lhs,
                rhs,
            } => {
                if p.type_of(expr).is_reference() {
                    if let Some(slot) = p.slot_for_lvalue(lhs) {
                        self.flow.add_assignment(slot, rhs);
                    }
                }
            }
            ExprKind::Call { method, args, .. } => {
                let params = p.method(method).params.clone();
                for (&param, &arg) in params.iter().zip(p.expr_list(args)) {
                    if p.param(param).ty.is_reference() {
                        self.flow.add_assignment(Slot::Param(param), arg);
                    }
                }
            }
            _ => {}
        }
        walk_expr(self, p, expr);
    }
}
