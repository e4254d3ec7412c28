//! Declared-type narrowing and expression simplification.
//!
//! One tightening round narrows every slot whose flow permits it, then
//! rewrites casts, type tests, and calls whose outcome the narrowed types
//! determine. Rounds repeat (driven by `lib.rs`) because each narrowing can
//! enable others; the `changed` flag reports whether this round did
//! anything.
//!
//! Structural surprises — a non-reference type flowing into a reference
//! slot — mean an upstream bug; the affected slot is left untightened
//! rather than failing the pass.

use smallvec::SmallVec;

use jay_ir::{
    rewrite_expr, rewrite_stmt, Body, ExprId, ExprKind, MethodId, Program, Slot, StmtId, TypeId,
};
use jay_types::{
    can_theoretically_cast, can_trivially_cast, generalize_types, stronger, TypeOracle,
};

use crate::flow::TypeFlow;

pub struct Tightener<'a> {
    oracle: &'a TypeOracle,
    flow: &'a TypeFlow,
    changed: bool,
}

impl<'a> Tightener<'a> {
    pub fn new(oracle: &'a TypeOracle, flow: &'a TypeFlow) -> Self {
        Tightener {
            oracle,
            flow,
            changed: false,
        }
    }

    /// Run one tightening round. Returns whether anything changed.
    pub fn run(&mut self, p: &mut Program) -> bool {
        self.changed = false;

        for field in p.field_ids() {
            let skip = {
                let f = p.field(field);
                f.is_volatile() || p.is_codegen_type(f.owner)
            };
            if !skip {
                self.tighten_slot(p, Slot::Field(field));
            }
        }

        for method in p.method_ids() {
            if p.is_codegen_type(p.method(method).owner) {
                continue;
            }
            let params: SmallVec<[_; 4]> = p.method(method).params.clone();
            for param in params {
                self.tighten_slot(p, Slot::Param(param));
            }
            let locals: SmallVec<[_; 4]> = p.method(method).locals.clone();
            for local in locals {
                self.tighten_slot(p, Slot::Local(local));
            }
            self.tighten_return(p, method);
        }

        self.rewrite_expressions(p);

        self.changed
    }

    // === Slot tightening ===

    /// Narrow one slot's declared type: null it when nothing of that type
    /// is ever instantiated, jump an abstract type to its sole concrete
    /// implementor, else generalize over everything that flows in.
    fn tighten_slot(&mut self, p: &mut Program, slot: Slot) {
        let declared = p.slot_ty(slot);
        if !declared.is_reference() || declared.is_null() {
            return;
        }

        if !self.oracle.is_instantiated(p, declared) {
            self.narrow(p, slot, TypeId::NULL);
            return;
        }

        if let Some(leaf) = self.single_concrete_type(p, declared) {
            self.narrow(p, slot, leaf);
            return;
        }

        let is_param = matches!(slot, Slot::Param(_));
        let mut candidates: SmallVec<[TypeId; 8]> = SmallVec::new();
        if !is_param {
            // Bottom seed: a slot nothing flows into becomes null.
            candidates.push(TypeId::NULL);
        }
        if self.flow.pinned.contains(&slot) {
            // The slot escapes; its own declared type floors the result.
            candidates.push(declared);
        }
        if let Some(assigns) = self.flow.assignments.get(&slot) {
            for &expr in assigns {
                let ty = p.type_of(expr);
                if !ty.is_reference() {
                    return;
                }
                candidates.push(ty);
            }
        }
        if let Slot::Param(param) = slot {
            if let Some(ups) = self.flow.param_up_refs.get(&param) {
                for &up in ups {
                    candidates.push(p.param(up).ty);
                }
            }
        }
        if candidates.is_empty() {
            // A parameter nothing flows into is dead; later passes prune it.
            return;
        }

        let generalized = generalize_types(p, candidates);
        let result = stronger(p, declared, generalized);
        if result != declared {
            self.narrow(p, slot, result);
        }
    }

    /// Narrow a method's return slot. Candidates include overriders'
    /// return types; native methods get no flow inference, only the
    /// instantiability and sole-implementor narrowings.
    fn tighten_return(&mut self, p: &mut Program, method: MethodId) {
        let declared = p.method(method).return_ty;
        if !declared.is_reference() || declared.is_null() {
            return;
        }

        if !self.oracle.is_instantiated(p, declared) {
            self.narrow(p, Slot::Return(method), TypeId::NULL);
            return;
        }

        if let Some(leaf) = self.single_concrete_type(p, declared) {
            self.narrow(p, Slot::Return(method), leaf);
            return;
        }

        if p.method(method).is_native() {
            return;
        }

        let mut candidates: SmallVec<[TypeId; 8]> = SmallVec::new();
        candidates.push(TypeId::NULL);
        if let Some(returns) = self.flow.returns.get(&method) {
            for &expr in returns {
                let ty = p.type_of(expr);
                if !ty.is_reference() {
                    return;
                }
                candidates.push(ty);
            }
        }
        if let Some(overriders) = self.flow.overriders.get(&method) {
            for &m in overriders {
                candidates.push(p.method(m).return_ty);
            }
        }

        let generalized = generalize_types(p, candidates);
        let result = stronger(p, declared, generalized);
        if result != declared {
            self.narrow(p, Slot::Return(method), result);
        }
    }

    fn narrow(&mut self, p: &mut Program, slot: Slot, to: TypeId) {
        tracing::trace!(
            slot = %p.describe_slot(slot),
            from = p.type_name(p.slot_ty(slot)),
            to = p.type_name(to),
            "narrowed declared type"
        );
        p.set_slot_ty(slot, to);
        self.changed = true;
    }

    /// The sole concrete implementor of an abstract type, if there is
    /// exactly one.
    fn single_concrete_type(&self, p: &Program, ty: TypeId) -> Option<TypeId> {
        if !ty.is_declared() || !p.type_def(ty).is_abstract {
            return None;
        }
        let implementors = self.flow.implementors.get(&ty)?;
        if implementors.len() == 1 {
            implementors.iter().next().copied()
        } else {
            None
        }
    }

    /// The unique concrete override of a method whose enclosing type has a
    /// sole concrete implementor.
    fn single_concrete_method(&self, p: &Program, method: MethodId) -> Option<MethodId> {
        self.single_concrete_type(p, p.method(method).owner)?;
        let overriders = self.flow.overriders.get(&method)?;
        let mut concrete = overriders.iter().filter(|&&m| !p.method(m).is_abstract());
        let first = concrete.next().copied();
        if concrete.next().is_some() {
            None
        } else {
            first
        }
    }

    // === Expression rewriting ===

    /// Post-order rewrite of every non-native, non-codegen body and every
    /// field initializer.
    fn rewrite_expressions(&mut self, p: &mut Program) {
        let roots = expression_roots(p);
        for root in roots {
            match root {
                Root::Stmt(stmt) => {
                    rewrite_stmt(p, stmt, &mut |p, id| self.rewrite_node(p, id));
                }
                Root::Expr(expr) => {
                    rewrite_expr(p, expr, &mut |p, id| self.rewrite_node(p, id));
                }
            }
        }
    }

    fn rewrite_node(&mut self, p: &mut Program, id: ExprId) {
        match p.expr(id).kind {
            ExprKind::Cast { target, expr } => self.rewrite_cast(p, id, target, expr),
            ExprKind::InstanceOf { target, expr } => self.rewrite_instance_of(p, id, target, expr),
            ExprKind::Call { .. } => self.rewrite_call(p, id),
            _ => {}
        }
    }

    /// Simplify `(T) e`: drop statically-true casts, collapse statically-
    /// false ones to a guaranteed-null cast, and narrow the target to a
    /// sole concrete implementor otherwise.
    fn rewrite_cast(&mut self, p: &mut Program, id: ExprId, target: TypeId, inner: ExprId) {
        if target.is_null() {
            // Already a guaranteed-null cast.
            return;
        }
        let from = p.type_of(inner);
        if !target.is_reference() || !from.is_reference() {
            return;
        }

        if can_trivially_cast(p, from, target) {
            p.replace_expr(id, p.expr(inner).kind);
            self.changed = true;
        } else if !self.oracle.is_instantiated(p, target)
            || !can_theoretically_cast(p, from, target)
        {
            p.replace_expr(
                id,
                ExprKind::Cast {
                    target: TypeId::NULL,
                    expr: inner,
                },
            );
            self.changed = true;
        } else if let Some(leaf) = self.single_concrete_type(p, target) {
            p.replace_expr(
                id,
                ExprKind::Cast {
                    target: leaf,
                    expr: inner,
                },
            );
            self.changed = true;
        }
    }

    /// Simplify `e instanceof T` when the answer is static: `false` for a
    /// null-typed or disjoint operand, a null check when every `e` is-a
    /// `T`, and a narrowed test target when `T` has a sole implementor.
    fn rewrite_instance_of(&mut self, p: &mut Program, id: ExprId, target: TypeId, inner: ExprId) {
        let from = p.type_of(inner);
        if !target.is_reference() || !from.is_reference() {
            return;
        }

        if from.is_null() {
            // null is never an instance of anything.
            p.replace_expr(id, ExprKind::Bool(false));
            self.changed = true;
        } else if can_trivially_cast(p, from, target) {
            let span = p.expr(id).span;
            let null_lit = p.alloc_expr(ExprKind::Null, span);
            p.replace_expr(
                id,
                ExprKind::Binary {
                    op: jay_ir::BinaryOp::NotEq,
                    lhs: inner,
                    rhs: null_lit,
                },
            );
            self.changed = true;
        } else if !self.oracle.is_instantiated(p, target)
            || !can_theoretically_cast(p, from, target)
        {
            p.replace_expr(id, ExprKind::Bool(false));
            self.changed = true;
        } else if let Some(leaf) = self.single_concrete_type(p, target) {
            p.replace_expr(
                id,
                ExprKind::InstanceOf {
                    target: leaf,
                    expr: inner,
                },
            );
            self.changed = true;
        }
    }

    /// Devirtualize a call through an abstract type with a sole concrete
    /// implementor, then clear the polymorphic flag when no overrider can
    /// possibly receive the dispatch.
    fn rewrite_call(&mut self, p: &mut Program, id: ExprId) {
        let ExprKind::Call {
            instance,
            method,
            args,
            polymorphic,
        } = p.expr(id).kind
        else {
            return;
        };

        let mut target = method;
        if let Some(concrete) = self.single_concrete_method(p, method) {
            if concrete != method {
                p.replace_expr(
                    id,
                    ExprKind::Call {
                        instance,
                        method: concrete,
                        args,
                        polymorphic,
                    },
                );
                self.changed = true;
                target = concrete;
            }
        }

        if !polymorphic {
            return;
        }
        let Some(inst) = instance else {
            return;
        };
        let inst_ty = p.type_of(inst);
        let truly_polymorphic = self.flow.overriders.get(&target).is_some_and(|overriders| {
            overriders
                .iter()
                .any(|&o| can_theoretically_cast(p, inst_ty, p.method(o).owner))
        });
        if !truly_polymorphic {
            p.replace_expr(
                id,
                ExprKind::Call {
                    instance,
                    method: target,
                    args,
                    polymorphic: false,
                },
            );
            self.changed = true;
        }
    }
}

/// Rewrite roots: statements of ordinary bodies plus field initializers,
/// excluding native methods and host code-generation types.
enum Root {
    Stmt(StmtId),
    Expr(ExprId),
}

fn expression_roots(p: &Program) -> Vec<Root> {
    let mut roots = Vec::new();
    for method in p.method_ids() {
        let m = p.method(method);
        if p.is_codegen_type(m.owner) || m.is_native() {
            continue;
        }
        if let Body::Block(stmts) = &m.body {
            roots.extend(stmts.iter().map(|&s| Root::Stmt(s)));
        }
    }
    for field in p.field_ids() {
        let f = p.field(field);
        if p.is_codegen_type(f.owner) {
            continue;
        }
        if let Some(init) = f.initializer {
            roots.push(Root::Expr(init));
        }
    }
    roots
}
