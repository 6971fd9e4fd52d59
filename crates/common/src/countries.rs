//! ISO-3166 alpha-3 country-code translation.
//!
//! The downstream verifier is configured with full country names, not
//! codes. The lookup is total: codes without a known name fall back to
//! the first three characters uppercased, so resolution never fails.

/// Translate an alpha-3 code to the country name the verifier expects.
pub fn country_name(code: &str) -> String {
    let name = match code {
        "AFG" => "Afghanistan",
        "BLR" => "Belarus",
        "CHN" => "China",
        "CUB" => "Cuba",
        "ERI" => "Eritrea",
        "IRN" => "Iran (Islamic Republic of)",
        "IRQ" => "Iraq",
        "LBY" => "Libya",
        "MMR" => "Myanmar",
        "NIC" => "Nicaragua",
        "PRK" => "Korea (Democratic People's Republic of)",
        "RUS" => "Russian Federation",
        "SDN" => "Sudan",
        "SOM" => "Somalia",
        "SSD" => "South Sudan",
        "SYR" => "Syrian Arab Republic",
        "VEN" => "Venezuela (Bolivarian Republic of)",
        "YEM" => "Yemen",
        "ZWE" => "Zimbabwe",
        _ => return fallback_name(code),
    };
    name.to_string()
}

/// Deterministic placeholder for unknown codes.
fn fallback_name(code: &str) -> String {
    code.chars().take(3).collect::<String>().to_ascii_uppercase()
}
