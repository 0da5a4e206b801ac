//! ## Merging
//! Union of representations sharing the same precision:
//! - dense + dense       - register-wise maximum.
//! - explicit + explicit - set union, promoted if the union outgrows the threshold.
//! - explicit + dense    - explicit hashes are replayed into a copy of dense registers,
//!   which gives the same registers as promoting first and taking register-wise maximum.
//!
//! The receiver ends up dense if either operand was dense. Resulting registers don't depend on
//! merge order, so merging is commutative and associative.

use std::mem::replace;

use crate::explicit::ExplicitSet;
use crate::representation::{Representation, RepresentationTrait};

/// Merge `rhs` into `lhs`, both built with `precision`
pub(crate) fn merge_representations(lhs: &mut Representation, rhs: &Representation, precision: u8) {
    match (&mut *lhs, rhs) {
        (Representation::Dense(lhs_registers), Representation::Dense(rhs_registers)) => {
            lhs_registers.merge(rhs_registers);
        }
        (Representation::Dense(lhs_registers), Representation::Explicit(rhs_set)) => {
            rhs_set.iter().for_each(|h| {
                lhs_registers.insert_hash(h);
            });
        }
        (Representation::Explicit(lhs_set), Representation::Explicit(rhs_set)) => {
            rhs_set.iter().for_each(|h| {
                lhs_set.add(h);
            });
            lhs.promote_if_needed(precision);
        }
        (Representation::Explicit(lhs_set), Representation::Dense(rhs_registers)) => {
            let lhs_set = replace(lhs_set, ExplicitSet::new(0));
            let mut registers = rhs_registers.clone();
            lhs_set.drain_into(&mut registers);
            *lhs = Representation::Dense(registers);
        }
    }
}
