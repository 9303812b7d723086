use phf::{Map, phf_map};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown element symbol: '{0}'")]
pub struct UnknownElementError(pub String);

// Van der Waals radii in Angstroms, keyed by upper-case element symbol.
static VDW_RADII: Map<&'static str, f32> = phf_map! {
    "H" => 1.10, "D" => 1.10, "HE" => 1.40,
    "LI" => 1.82, "BE" => 1.53, "B" => 1.92, "C" => 1.70, "N" => 1.55, "O" => 1.52,
    "F" => 1.47, "NE" => 1.54,
    "NA" => 2.27, "MG" => 1.73, "AL" => 1.84, "SI" => 2.10, "P" => 1.80, "S" => 1.80,
    "CL" => 1.75, "AR" => 1.88,
    "K" => 2.75, "CA" => 2.31, "SC" => 2.11, "TI" => 1.87, "V" => 1.79, "CR" => 1.89,
    "MN" => 1.97, "FE" => 1.94, "CO" => 1.92, "NI" => 1.63, "CU" => 1.40, "ZN" => 1.39,
    "GA" => 1.87, "GE" => 2.11, "AS" => 1.85, "SE" => 1.90, "BR" => 1.85, "KR" => 2.02,
    "RB" => 3.03, "SR" => 2.49, "Y" => 2.19, "ZR" => 1.86, "MO" => 2.09, "RU" => 2.07,
    "RH" => 1.95, "PD" => 1.63, "AG" => 1.72, "CD" => 1.58, "IN" => 1.93, "SN" => 2.17,
    "SB" => 2.06, "TE" => 2.06, "I" => 1.98, "XE" => 2.16,
    "CS" => 3.43, "BA" => 2.68, "LA" => 2.40, "GD" => 2.37, "W" => 2.10, "RE" => 2.05,
    "OS" => 2.00, "IR" => 2.02, "PT" => 1.75, "AU" => 1.66, "HG" => 1.55, "TL" => 1.96,
    "PB" => 2.02, "BI" => 2.07, "U" => 1.86,
};

/// Looks up the van der Waals radius (Angstroms) of an element.
///
/// The symbol is matched case-insensitively and surrounding whitespace is ignored, so
/// `"CL"`, `"Cl"` and `" cl"` all resolve to chlorine.
pub fn vdw_radius(symbol: &str) -> Result<f32, UnknownElementError> {
    let key = symbol.trim().to_ascii_uppercase();
    VDW_RADII
        .get(key.as_str())
        .copied()
        .ok_or_else(|| UnknownElementError(symbol.to_string()))
}
