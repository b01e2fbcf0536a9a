//! Best-effort type inference by value probing.
//!
//! `#[derive(Record)]` resolves almost every field from its declared
//! type path. When the path is opaque (a type alias, a re-export under
//! another name) the macro falls back to [`probe_type`], which tries
//! to store representative zero values into an empty slot of the
//! field's type and reports the first one that fits.
//!
//! The answer depends on the order of [`PROBES`] and on exact type
//! identity: no numeric conversion is attempted, so a newtype around
//! `i32` probes as [`SemanticType::Other`] and is left out of the
//! table. Prefer a type the macro recognises.

use std::any::Any;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::kind::SemanticType;

type Probe = fn(&mut dyn Any) -> bool;

/// Probes in priority order.
pub const PROBES: &[(Probe, SemanticType)] = &[
    (assign::<String>, SemanticType::Text),
    (assign::<NaiveDateTime>, SemanticType::DateTime),
    (assign::<DateTime<Utc>>, SemanticType::DateTime),
    (assign::<NaiveDate>, SemanticType::DateTime),
    (assign::<f64>, SemanticType::Double),
    (assign::<f32>, SemanticType::Float),
    (assign::<i64>, SemanticType::Long),
    (assign::<i32>, SemanticType::Int),
    (assign::<bool>, SemanticType::Bool),
    (assign::<u8>, SemanticType::Byte),
];

fn assign<T: Any + Default>(slot: &mut dyn Any) -> bool {
    match slot.downcast_mut::<Option<T>>() {
        Some(value) => {
            *value = Some(T::default());
            true
        }
        None => false,
    }
}

/// Runs [`PROBES`] against an `Option<_>` slot.
///
/// Returns [`SemanticType::Other`] when every probe is rejected.
pub fn probe_slot(slot: &mut dyn Any) -> SemanticType {
    PROBES
        .iter()
        .find(|(probe, _)| probe(slot))
        .map_or(SemanticType::Other, |(_, ty)| *ty)
}

/// Probes the semantic type of `T` through an empty `Option<T>`.
#[must_use]
pub fn probe_type<T: Any>() -> SemanticType {
    let mut slot: Option<T> = None;
    probe_slot(&mut slot)
}
