//! The whole-program IR container.
//!
//! All nodes live in contiguous arenas owned by [`Program`]; everything is
//! referenced by id. Construction happens through the `add_*`/`alloc_*`
//! factory methods; the optimizer mutates nodes in place through
//! [`Program::replace_expr`] and [`Program::set_slot_ty`], which keeps every
//! id stable across rewrites.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::{
    BinaryOp, Body, Expr, ExprId, ExprKind, ExprRange, Field, FieldFlags, FieldId, Interner,
    Local, LocalId, Method, MethodFlags, MethodId, Param, ParamId, Slot, Span, Stmt, StmtId,
    StmtKind, StmtRange, TypeDef, TypeId, TypeKind,
};

/// Panic helper for arena overflow (cold path, never inlined).
#[cold]
#[inline(never)]
fn panic_capacity_exceeded(value: usize, context: &str) -> ! {
    panic!("arena capacity exceeded: {context} has {value} elements, max is {}", u32::MAX)
}

/// Convert usize to u32, panicking with a clear message on overflow.
#[inline]
fn to_u32(value: usize, context: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic_capacity_exceeded(value, context))
}

/// A fully-linked program.
///
/// Created with the root `Object` class and the two receiver-normalization
/// sentinels ([`null_field`](Program::null_field) /
/// [`null_method`](Program::null_method)) already present.
pub struct Program {
    interner: Interner,

    /// Declared types, indexed by `TypeId - FIRST_DECLARED`.
    types: Vec<TypeDef>,
    fields: Vec<Field>,
    methods: Vec<Method>,
    params: Vec<Param>,
    locals: Vec<Local>,

    exprs: Vec<Expr>,
    /// Flattened expression lists (call arguments).
    expr_lists: Vec<ExprId>,
    stmts: Vec<Stmt>,
    /// Flattened statement lists (block bodies).
    stmt_lists: Vec<StmtId>,

    /// Host-enumerated code-generation classes the optimizer must not
    /// touch.
    codegen_types: FxHashSet<TypeId>,

    object: TypeId,
    null_field: FieldId,
    null_method: MethodId,
}

impl Program {
    /// Create an empty program with the root class and sentinels.
    pub fn new() -> Self {
        let mut p = Program {
            interner: Interner::new(),
            types: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            params: Vec::new(),
            locals: Vec::new(),
            exprs: Vec::new(),
            expr_lists: Vec::new(),
            stmts: Vec::new(),
            stmt_lists: Vec::new(),
            codegen_types: FxHashSet::default(),
            object: TypeId::NULL,
            null_field: FieldId::from_raw(0),
            null_method: MethodId::from_raw(0),
        };

        let name = p.interner.intern("Object");
        p.object = p.push_type(TypeDef {
            name,
            kind: TypeKind::Class,
            superclass: None,
            interfaces: SmallVec::new(),
            is_abstract: false,
        });

        let name = p.interner.intern("nullField");
        p.null_field = p.push_field(Field {
            name,
            owner: p.object,
            ty: TypeId::NULL,
            flags: FieldFlags::empty(),
            initializer: None,
        });

        let name = p.interner.intern("nullMethod");
        p.null_method = p.push_method(Method {
            name,
            owner: p.object,
            return_ty: TypeId::NULL,
            params: SmallVec::new(),
            locals: SmallVec::new(),
            flags: MethodFlags::NATIVE,
            overrides: SmallVec::new(),
            instance_origin: None,
            body: Body::None,
        });

        p
    }

    // === Sentinels ===

    /// The root class every class ultimately extends.
    #[inline]
    pub fn object(&self) -> TypeId {
        self.object
    }

    /// The "read through null" placeholder field.
    #[inline]
    pub fn null_field(&self) -> FieldId {
        self.null_field
    }

    /// The "invoke through null" placeholder method.
    #[inline]
    pub fn null_method(&self) -> MethodId {
        self.null_method
    }

    /// The identifier interner.
    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Intern an identifier.
    #[inline]
    pub fn intern(&self, text: &str) -> crate::Name {
        self.interner.intern(text)
    }

    // === Declaration factory ===

    /// Declare a class. `superclass: None` extends the root class.
    pub fn add_class(
        &mut self,
        name: &str,
        superclass: Option<TypeId>,
        is_abstract: bool,
    ) -> TypeId {
        let name = self.interner.intern(name);
        let superclass = Some(superclass.unwrap_or(self.object));
        self.push_type(TypeDef {
            name,
            kind: TypeKind::Class,
            superclass,
            interfaces: SmallVec::new(),
            is_abstract,
        })
    }

    /// Declare an interface extending the given superinterfaces.
    pub fn add_interface(&mut self, name: &str, extends: &[TypeId]) -> TypeId {
        let name = self.interner.intern(name);
        self.push_type(TypeDef {
            name,
            kind: TypeKind::Interface,
            superclass: None,
            interfaces: extends.iter().copied().collect(),
            is_abstract: true,
        })
    }

    /// Record that `ty` directly implements (or extends) `iface`.
    pub fn add_implements(&mut self, ty: TypeId, iface: TypeId) {
        self.type_def_mut(ty).interfaces.push(iface);
    }

    /// Declare a field.
    pub fn add_field(&mut self, owner: TypeId, name: &str, ty: TypeId, flags: FieldFlags) -> FieldId {
        let name = self.interner.intern(name);
        self.push_field(Field {
            name,
            owner,
            ty,
            flags,
            initializer: None,
        })
    }

    /// Attach an initializer expression to a field.
    pub fn set_field_initializer(&mut self, field: FieldId, init: ExprId) {
        self.field_mut(field).initializer = Some(init);
    }

    /// Declare a method with no parameters and no body.
    pub fn add_method(
        &mut self,
        owner: TypeId,
        name: &str,
        return_ty: TypeId,
        flags: MethodFlags,
    ) -> MethodId {
        let name = self.interner.intern(name);
        self.push_method(Method {
            name,
            owner,
            return_ty,
            params: SmallVec::new(),
            locals: SmallVec::new(),
            flags,
            overrides: SmallVec::new(),
            instance_origin: None,
            body: Body::None,
        })
    }

    /// Append a parameter to a method.
    pub fn add_param(&mut self, method: MethodId, name: &str, ty: TypeId) -> ParamId {
        let name = self.interner.intern(name);
        let id = ParamId::from_raw(to_u32(self.params.len(), "params"));
        self.params.push(Param {
            name,
            ty,
            is_this: false,
        });
        self.method_mut(method).params.push(id);
        id
    }

    /// Append the explicit receiver parameter of a static forwarder.
    pub fn add_this_param(&mut self, method: MethodId, ty: TypeId) -> ParamId {
        let name = self.interner.intern("this");
        let id = ParamId::from_raw(to_u32(self.params.len(), "params"));
        self.params.push(Param {
            name,
            ty,
            is_this: true,
        });
        self.method_mut(method).params.push(id);
        id
    }

    /// Declare a method-local variable (or catch parameter).
    pub fn add_local(&mut self, method: MethodId, name: &str, ty: TypeId) -> LocalId {
        let name = self.interner.intern(name);
        let id = LocalId::from_raw(to_u32(self.locals.len(), "locals"));
        self.locals.push(Local { name, ty });
        self.method_mut(method).locals.push(id);
        id
    }

    /// Record that `method` directly overrides `overridden`.
    pub fn add_override(&mut self, method: MethodId, overridden: MethodId) {
        self.method_mut(method).overrides.push(overridden);
    }

    /// Link (or unlink, on pruning) a static forwarder to the instance
    /// method it was synthesized from.
    pub fn set_instance_origin(&mut self, method: MethodId, origin: Option<MethodId>) {
        self.method_mut(method).instance_origin = origin;
    }

    /// Attach a body to a method.
    pub fn set_method_body(&mut self, method: MethodId, body: Body) {
        self.method_mut(method).body = body;
    }

    /// Mark a class as a host code-generation type.
    pub fn mark_codegen_type(&mut self, ty: TypeId) {
        self.codegen_types.insert(ty);
    }

    /// Whether a class was marked as a host code-generation type.
    #[inline]
    pub fn is_codegen_type(&self, ty: TypeId) -> bool {
        self.codegen_types.contains(&ty)
    }

    fn push_type(&mut self, def: TypeDef) -> TypeId {
        let id = TypeId::from_raw(TypeId::FIRST_DECLARED + to_u32(self.types.len(), "types"));
        self.types.push(def);
        id
    }

    fn push_field(&mut self, field: Field) -> FieldId {
        let id = FieldId::from_raw(to_u32(self.fields.len(), "fields"));
        self.fields.push(field);
        id
    }

    fn push_method(&mut self, method: Method) -> MethodId {
        let id = MethodId::from_raw(to_u32(self.methods.len(), "methods"));
        self.methods.push(method);
        id
    }

    // === Node factory ===

    /// Allocate an expression node.
    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId::from_raw(to_u32(self.exprs.len(), "exprs"));
        self.exprs.push(Expr::new(kind, span));
        id
    }

    /// Flatten a slice of expression ids into the side table.
    pub fn alloc_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expr lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange {
            start,
            len: to_u32(ids.len(), "expr list"),
        }
    }

    /// Allocate a statement node.
    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId::from_raw(to_u32(self.stmts.len(), "stmts"));
        self.stmts.push(Stmt::new(kind, span));
        id
    }

    /// Flatten a slice of statement ids into the side table.
    pub fn alloc_stmt_list(&mut self, ids: &[StmtId]) -> StmtRange {
        let start = to_u32(self.stmt_lists.len(), "stmt lists");
        self.stmt_lists.extend_from_slice(ids);
        StmtRange {
            start,
            len: to_u32(ids.len(), "stmt list"),
        }
    }

    /// Substitute the node at `id` in place, preserving its span. Ids are
    /// stable, so the node's parents are unaffected.
    pub fn replace_expr(&mut self, id: ExprId, kind: ExprKind) {
        self.exprs[id.index()].kind = kind;
    }

    // === Accessors ===

    /// Look up a declared type.
    ///
    /// # Panics
    /// Panics if `ty` is not a declared class or interface.
    #[inline]
    pub fn type_def(&self, ty: TypeId) -> &TypeDef {
        match ty.declared_index() {
            Some(idx) => &self.types[idx],
            None => panic!("{ty:?} is not a declared type"),
        }
    }

    fn type_def_mut(&mut self, ty: TypeId) -> &mut TypeDef {
        match ty.declared_index() {
            Some(idx) => &mut self.types[idx],
            None => panic!("{ty:?} is not a declared type"),
        }
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.fields[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    fn method_mut(&mut self, id: MethodId) -> &mut Method {
        &mut self.methods[id.index()]
    }

    #[inline]
    pub fn param(&self, id: ParamId) -> &Param {
        &self.params[id.index()]
    }

    #[inline]
    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id.index()]
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Resolve an expression range to its ids.
    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.start as usize..(range.start + range.len) as usize]
    }

    /// Resolve a statement range to its ids.
    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.start as usize..(range.start + range.len) as usize]
    }

    // === Id enumeration ===

    /// Ids of all declared types, in declaration order.
    pub fn declared_types(&self) -> impl Iterator<Item = TypeId> {
        let n = to_u32(self.types.len(), "types");
        (0..n).map(|i| TypeId::from_raw(TypeId::FIRST_DECLARED + i))
    }

    /// Ids of all fields, in declaration order.
    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> {
        (0..to_u32(self.fields.len(), "fields")).map(FieldId::from_raw)
    }

    /// Ids of all methods, in declaration order.
    pub fn method_ids(&self) -> impl Iterator<Item = MethodId> {
        (0..to_u32(self.methods.len(), "methods")).map(MethodId::from_raw)
    }

    /// Ids of all expression nodes, in allocation order.
    pub fn expr_ids(&self) -> impl Iterator<Item = ExprId> {
        (0..to_u32(self.exprs.len(), "exprs")).map(ExprId::from_raw)
    }

    /// Ids of all statement nodes, in allocation order.
    pub fn stmt_ids(&self) -> impl Iterator<Item = StmtId> {
        (0..to_u32(self.stmts.len(), "stmts")).map(StmtId::from_raw)
    }

    pub fn num_types(&self) -> usize {
        self.types.len()
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn num_locals(&self) -> usize {
        self.locals.len()
    }

    pub fn num_exprs(&self) -> usize {
        self.exprs.len()
    }

    pub fn num_stmts(&self) -> usize {
        self.stmts.len()
    }

    pub fn num_expr_list_entries(&self) -> usize {
        self.expr_lists.len()
    }

    pub fn num_stmt_list_entries(&self) -> usize {
        self.stmt_lists.len()
    }

    // === Slots ===

    /// A slot's current declared type.
    pub fn slot_ty(&self, slot: Slot) -> TypeId {
        match slot {
            Slot::Field(f) => self.field(f).ty,
            Slot::Local(l) => self.local(l).ty,
            Slot::Param(p) => self.param(p).ty,
            Slot::Return(m) => self.method(m).return_ty,
        }
    }

    /// Narrow a slot's declared type.
    pub fn set_slot_ty(&mut self, slot: Slot, ty: TypeId) {
        match slot {
            Slot::Field(f) => self.field_mut(f).ty = ty,
            Slot::Local(l) => self.locals[l.index()].ty = ty,
            Slot::Param(p) => self.params[p.index()].ty = ty,
            Slot::Return(m) => self.method_mut(m).return_ty = ty,
        }
    }

    /// The slot an lvalue expression stores into, if it is one.
    pub fn slot_for_lvalue(&self, id: ExprId) -> Option<Slot> {
        match self.expr(id).kind {
            ExprKind::LocalRef(l) => Some(Slot::Local(l)),
            ExprKind::ParamRef(p) => Some(Slot::Param(p)),
            ExprKind::FieldRef { field, .. } => Some(Slot::Field(field)),
            _ => None,
        }
    }

    /// Whether a method is a static forwarder (static, with an explicit
    /// leading `this` parameter).
    pub fn is_forwarder(&self, id: MethodId) -> bool {
        let method = self.method(id);
        method.is_static()
            && method
                .params
                .first()
                .is_some_and(|&p| self.param(p).is_this)
    }

    // === Derived expression properties ===

    /// The type of an expression.
    ///
    /// Derived from the current IR state: a variable reference has its
    /// slot's current declared type, a call has its target's current return
    /// type. Narrowing a slot is therefore immediately visible at every
    /// use, which is what makes child-before-parent rewriting sound.
    pub fn type_of(&self, id: ExprId) -> TypeId {
        match self.expr(id).kind {
            ExprKind::Null => TypeId::NULL,
            ExprKind::Bool(_) | ExprKind::InstanceOf { .. } => TypeId::BOOL,
            ExprKind::Int(_) => TypeId::INT,
            ExprKind::LocalRef(l) => self.local(l).ty,
            ExprKind::ParamRef(p) => self.param(p).ty,
            ExprKind::FieldRef { field, .. } => self.field(field).ty,
            ExprKind::Call { method, .. } => self.method(method).return_ty,
            ExprKind::New { class } => class,
            ExprKind::Cast { target, .. } => target,
            ExprKind::Binary { op, lhs, .. } => match op {
                BinaryOp::Assign => self.type_of(lhs),
                BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => TypeId::BOOL,
            },
        }
    }

    /// Whether evaluating an expression can have observable effects.
    ///
    /// Calls, allocations, assignments, and volatile field reads are
    /// effectful; literals, variable references, and pure operators over
    /// pure operands are not.
    pub fn has_side_effects(&self, id: ExprId) -> bool {
        match self.expr(id).kind {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Int(_)
            | ExprKind::LocalRef(_)
            | ExprKind::ParamRef(_) => false,
            ExprKind::FieldRef { instance, field } => {
                self.field(field).is_volatile()
                    || instance.is_some_and(|i| self.has_side_effects(i))
            }
            ExprKind::Call { .. } | ExprKind::New { .. } => true,
            ExprKind::Cast { expr, .. } | ExprKind::InstanceOf { expr, .. } => {
                self.has_side_effects(expr)
            }
            ExprKind::Binary { op: BinaryOp::Assign, .. } => true,
            ExprKind::Binary { lhs, rhs, .. } => {
                self.has_side_effects(lhs) || self.has_side_effects(rhs)
            }
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
