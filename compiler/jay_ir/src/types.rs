//! Declared reference types.

use smallvec::SmallVec;

use crate::{Name, TypeId};

/// Whether a declared type is a class or an interface.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Class,
    Interface,
}

/// A declared class or interface.
///
/// Classes form a single-inheritance tree rooted at the program's `Object`
/// class (`superclass` is `None` only for the root); `interfaces` lists the
/// directly implemented interfaces. For interfaces, `superclass` is always
/// `None` and `interfaces` lists the directly extended superinterfaces.
#[derive(Clone, Debug)]
pub struct TypeDef {
    pub name: Name,
    pub kind: TypeKind,
    pub superclass: Option<TypeId>,
    pub interfaces: SmallVec<[TypeId; 2]>,
    /// Abstract classes cannot be instantiated directly. Always set for
    /// interfaces.
    pub is_abstract: bool,
}

impl TypeDef {
    /// Whether this is an interface.
    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether this is a concrete (instantiable) class.
    #[inline]
    pub fn is_concrete_class(&self) -> bool {
        self.kind == TypeKind::Class && !self.is_abstract
    }
}
