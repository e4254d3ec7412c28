//! Member declarations: fields, methods, parameters, locals.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::{ExprId, FieldId, LocalId, MethodId, Name, ParamId, StmtId, TypeId};

bitflags! {
    /// Field modifier bits.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FieldFlags: u8 {
        /// Static (per-type) storage.
        const STATIC = 1 << 0;
        /// Volatile fields are excluded from declared-type narrowing.
        const VOLATILE = 1 << 1;
    }
}

bitflags! {
    /// Method modifier bits.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodFlags: u8 {
        /// Static dispatch, no receiver (unless a forwarder's explicit
        /// `this` parameter).
        const STATIC = 1 << 0;
        /// No implementation in this type; concrete overriders provide one.
        const ABSTRACT = 1 << 1;
        /// Implemented outside the program; the body is an opaque sink.
        const NATIVE = 1 << 2;
    }
}

/// A field declaration.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: Name,
    pub owner: TypeId,
    pub ty: TypeId,
    pub flags: FieldFlags,
    pub initializer: Option<ExprId>,
}

impl Field {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    #[inline]
    pub fn is_volatile(&self) -> bool {
        self.flags.contains(FieldFlags::VOLATILE)
    }
}

/// A method parameter.
#[derive(Clone, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: TypeId,
    /// Marks the explicit receiver parameter of a static forwarder.
    pub is_this: bool,
}

/// A method-local variable (declared locals and catch parameters).
#[derive(Clone, Debug)]
pub struct Local {
    pub name: Name,
    pub ty: TypeId,
}

/// References a native body makes through the opaque boundary.
///
/// Anything listed here escapes the optimizer's view: written fields and
/// the parameters of referenced methods must keep their declared types.
#[derive(Clone, Debug, Default)]
pub struct ForeignRefs {
    /// Field-reference expressions written to from foreign code.
    pub field_writes: Vec<ExprId>,
    /// Methods invoked (or captured) from foreign code.
    pub method_refs: Vec<MethodId>,
}

/// A method body.
#[derive(Clone, Debug, Default)]
pub enum Body {
    /// No body: abstract methods, or natives with no recorded references.
    #[default]
    None,
    /// An ordinary statement-list body.
    Block(Vec<StmtId>),
    /// A native body, opaque except for the references it declares.
    Foreign(ForeignRefs),
}

/// A method declaration.
#[derive(Clone, Debug)]
pub struct Method {
    pub name: Name,
    pub owner: TypeId,
    pub return_ty: TypeId,
    pub params: SmallVec<[ParamId; 4]>,
    pub locals: SmallVec<[LocalId; 4]>,
    pub flags: MethodFlags,
    /// Methods this one directly overrides (superclass and interface
    /// declarations with the same signature).
    pub overrides: SmallVec<[MethodId; 2]>,
    /// For a static forwarder: the instance method it was synthesized
    /// from. Cleared when that method is pruned.
    pub instance_origin: Option<MethodId>,
    pub body: Body,
}

impl Method {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MethodFlags::ABSTRACT)
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.flags.contains(MethodFlags::NATIVE)
    }
}

/// A location that carries a declared type: the optimizer's unit of
/// narrowing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Slot {
    Field(FieldId),
    Local(LocalId),
    Param(ParamId),
    /// A method's return slot.
    Return(MethodId),
}
