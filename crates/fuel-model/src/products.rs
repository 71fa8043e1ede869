//! Canonical product names referenced by derivations.

pub const ETHANOL: &str = "ETANOL";
/// Gasoline grade ethanol prices are compared against.
pub const REFERENCE_GASOLINE: &str = "GASOLINA COMUM";
