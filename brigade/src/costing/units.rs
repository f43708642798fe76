//! Metric unit conversion for ingredient quantities.
//!
//! Unit strings are compared case-sensitively, exactly as stored. Conversion
//! failure is `None`, which callers must keep distinct from a legitimate
//! `Some(0.0)` result: a zero quantity converts to a zero cost, an unknown
//! unit converts to an indeterminate one.

/// Unit families that can be converted within but never across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitFamily {
    Mass,
    Volume,
}

/// Scale factor of a unit relative to its family's base unit (g for mass,
/// ml for volume). Unknown units have no factor.
fn unit_factor(unit: &str) -> Option<(UnitFamily, f64)> {
    match unit {
        "mg" => Some((UnitFamily::Mass, 0.001)),
        "g" => Some((UnitFamily::Mass, 1.0)),
        "kg" => Some((UnitFamily::Mass, 1000.0)),
        "ml" => Some((UnitFamily::Volume, 1.0)),
        "cl" => Some((UnitFamily::Volume, 10.0)),
        "dl" => Some((UnitFamily::Volume, 100.0)),
        "l" => Some((UnitFamily::Volume, 1000.0)),
        _ => None,
    }
}

/// Convert `quantity` from `from_unit` to `to_unit`.
///
/// Identical unit strings always convert, even when the unit is not a known
/// metric one ("portion" to "portion" is the identity). Otherwise both units
/// must belong to the same family.
pub fn convert_to_base_unit(quantity: f64, from_unit: &str, to_unit: &str) -> Option<f64> {
    if from_unit == to_unit {
        return Some(quantity);
    }

    let (from_family, from_factor) = unit_factor(from_unit)?;
    let (to_family, to_factor) = unit_factor(to_unit)?;
    if from_family != to_family {
        return None;
    }

    Some(quantity * from_factor / to_factor)
}
