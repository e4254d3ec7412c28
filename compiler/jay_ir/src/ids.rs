//! Arena index ids.
//!
//! Every IR entity is referenced by a 32-bit index into its arena. Ids are
//! `Copy` and compare by index, which is exactly the identity semantics the
//! optimizer's relations need: two syntactically identical literals are
//! distinct nodes with distinct ids.

use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an id from a raw index.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw index value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// The index as a `usize`, for arena access.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id! {
    /// Index of a field declaration.
    FieldId, "field#"
}
define_id! {
    /// Index of a method declaration.
    MethodId, "method#"
}
define_id! {
    /// Index of a parameter declaration.
    ParamId, "param#"
}
define_id! {
    /// Index of a local variable declaration (including catch parameters).
    LocalId, "local#"
}
define_id! {
    /// Index of an expression node.
    ExprId, "expr#"
}
define_id! {
    /// Index of a statement node.
    StmtId, "stmt#"
}

/// Index of a type.
///
/// Primitives occupy fixed low indices; declared reference types (classes
/// and interfaces) start at [`TypeId::FIRST_DECLARED`]. The distinguished
/// null type — the bottom of the reference lattice — is pre-interned like a
/// primitive but counts as a reference type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Pre-interned types (fixed indices) ===

    /// The `void` type (method returns without a value).
    pub const VOID: Self = Self(0);
    /// The `bool` type.
    pub const BOOL: Self = Self(1);
    /// The `int` type.
    pub const INT: Self = Self(2);
    /// The null type: subtype of every reference type, type of the `null`
    /// literal.
    pub const NULL: Self = Self(3);

    /// First index for declared classes and interfaces. Indices between the
    /// pre-interned types and this are reserved.
    pub const FIRST_DECLARED: u32 = 8;

    /// Create a type id from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw index value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the declared-type table, if this is a declared type.
    #[inline]
    pub const fn declared_index(self) -> Option<usize> {
        if self.0 >= Self::FIRST_DECLARED {
            Some((self.0 - Self::FIRST_DECLARED) as usize)
        } else {
            None
        }
    }

    /// Whether this is a reference type (a class, an interface, or null).
    #[inline]
    pub const fn is_reference(self) -> bool {
        self.0 == Self::NULL.0 || self.0 >= Self::FIRST_DECLARED
    }

    /// Whether this is the null type.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    /// Whether this is a declared class or interface.
    #[inline]
    pub const fn is_declared(self) -> bool {
        self.0 >= Self::FIRST_DECLARED
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::VOID => write!(f, "type#void"),
            Self::BOOL => write!(f, "type#bool"),
            Self::INT => write!(f, "type#int"),
            Self::NULL => write!(f, "type#null"),
            other => write!(f, "type#{}", other.0),
        }
    }
}

/// A contiguous run of [`ExprId`]s in the flattened expression-list table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprRange {
    pub start: u32,
    pub len: u32,
}

impl ExprRange {
    /// An empty range.
    pub const EMPTY: Self = Self { start: 0, len: 0 };

    /// Whether the range contains no elements.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A contiguous run of [`StmtId`]s in the flattened statement-list table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StmtRange {
    pub start: u32,
    pub len: u32,
}

impl StmtRange {
    /// An empty range.
    pub const EMPTY: Self = Self { start: 0, len: 0 };
}

#[cfg(test)]
mod tests;
