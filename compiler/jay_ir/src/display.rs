//! Human-readable rendering of IR entities, for logs and test output.

use crate::{Program, Slot, TypeId};

impl Program {
    /// A type's source-level name.
    pub fn type_name(&self, ty: TypeId) -> &'static str {
        match ty {
            TypeId::VOID => "void",
            TypeId::BOOL => "bool",
            TypeId::INT => "int",
            TypeId::NULL => "null",
            declared => self.interner().resolve(self.type_def(declared).name),
        }
    }

    /// A readable description of a slot, e.g. `field Shape.origin` or
    /// `return of Shape.area`.
    pub fn describe_slot(&self, slot: Slot) -> String {
        let interner = self.interner();
        match slot {
            Slot::Field(f) => {
                let field = self.field(f);
                format!(
                    "field {}.{}",
                    self.type_name(field.owner),
                    interner.resolve(field.name)
                )
            }
            Slot::Local(l) => format!("local {}", interner.resolve(self.local(l).name)),
            Slot::Param(p) => format!("param {}", interner.resolve(self.param(p).name)),
            Slot::Return(m) => {
                let method = self.method(m);
                format!(
                    "return of {}.{}",
                    self.type_name(method.owner),
                    interner.resolve(method.name)
                )
            }
        }
    }
}
