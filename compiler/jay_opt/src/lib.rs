//! Whole-program optimization passes for the Jay compiler.
//!
//! The centerpiece is **type tightening**: a flow-insensitive whole-program
//! inference that narrows every reference-typed declaration (fields,
//! locals, parameters, method returns) to the most specific supertype
//! consistent with everything that can flow into it, and simplifies casts,
//! type tests, and polymorphic calls whose outcome the narrowed types
//! decide.
//!
//! # Pipeline Position
//!
//! ```text
//! Link → **Tighten Types** → prune / inline / emit
//! ```
//!
//! # How a Run Works
//!
//! 1. **Record** (`flow`): one read-only traversal collects the global
//!    assignment, return, overrider, implementor, and parameter-up-ref
//!    relations, plus the pinned slots that escape through native code.
//! 2. **Tighten** (`tighten`): narrow every slot against the recorded
//!    flow and the type oracle; rewrite casts, `instanceof`, and calls.
//! 3. **Fix** (`fixup`): repair references whose qualifier became
//!    null-typed by retargeting them to the program's null sentinels.
//! 4. Repeat 2–3 until a tightening round changes nothing. Termination is
//!    guaranteed: every change strictly narrows a slot in a finite
//!    lattice, drops a cast, or clears a dispatch flag.
//!
//! The pass never fails on well-formed IR; structural surprises abort the
//! affected slot only (see `jay_ir::validate` for eager checking).

mod fixup;
mod flow;
mod tighten;

pub use flow::{record, TypeFlow};
pub use tighten::Tightener;

use jay_ir::Program;
use jay_types::TypeOracle;

/// Tighten every declared type in the program to a fixed point.
///
/// Returns whether the program was modified.
#[tracing::instrument(level = "debug", skip_all)]
pub fn tighten(program: &mut Program) -> bool {
    let oracle = TypeOracle::build(program);
    let flow = flow::record(program, &oracle);

    let mut any_changed = false;
    let mut iteration = 0u32;
    loop {
        iteration += 1;
        let mut tightener = Tightener::new(&oracle, &flow);
        let changed = tightener.run(program);
        tracing::debug!(iteration, changed, "tightening round");
        if !changed {
            break;
        }
        any_changed = true;
        fixup::run(program);
    }
    any_changed
}
