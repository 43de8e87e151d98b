//! Named constructors for every algorithm linked into the binary.
//!
//! Algorithms register themselves with `inventory::submit!` and the driver picks one
//! by name at runtime, then asks it for its capabilities.

use crate::query::csa::CsaAlgorithm;
use crate::query::Algorithm;

pub struct AlgorithmRegistration {
    pub name: &'static str,
    pub create: fn() -> Box<dyn Algorithm>,
}

impl AlgorithmRegistration {
    pub const fn new(name: &'static str, create: fn() -> Box<dyn Algorithm>) -> AlgorithmRegistration {
        AlgorithmRegistration { name, create }
    }
}

inventory::collect!(AlgorithmRegistration);

fn create_csa() -> Box<dyn Algorithm> {
    Box::new(CsaAlgorithm::new())
}

inventory::submit! { AlgorithmRegistration::new("csa", create_csa) }

/// Fresh instance of the algorithm registered under `name` (case-insensitive).
pub fn create(name: &str) -> Option<Box<dyn Algorithm>> {
    inventory::iter::<AlgorithmRegistration>
        .into_iter()
        .find(|r| r.name.eq_ignore_ascii_case(name))
        .map(|r| (r.create)())
}

pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = inventory::iter::<AlgorithmRegistration>
        .into_iter()
        .map(|r| r.name)
        .collect();
    names.sort_unstable();
    names
}
