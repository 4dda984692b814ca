//! Reference tables for translating external country and sector vocabulary
//! into the internal codes.
//!
//! Supplementary sources report full country names and their own sector
//! taxonomy. Translation is a fixed override table for known mismatches,
//! then an exact-name match against the reference list; names that match
//! neither are skipped by callers.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// ISO 3166-1 alpha-2 code and English short name.
static COUNTRIES: &[(&str, &str)] = &[
    ("AE", "United Arab Emirates"),
    ("AR", "Argentina"),
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BD", "Bangladesh"),
    ("BE", "Belgium"),
    ("BG", "Bulgaria"),
    ("BH", "Bahrain"),
    ("BM", "Bermuda"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CL", "Chile"),
    ("CN", "China"),
    ("CO", "Colombia"),
    ("CY", "Cyprus"),
    ("CZ", "Czech Republic"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EE", "Estonia"),
    ("EG", "Egypt"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("GR", "Greece"),
    ("HK", "Hong Kong"),
    ("HR", "Croatia"),
    ("HU", "Hungary"),
    ("ID", "Indonesia"),
    ("IE", "Ireland"),
    ("IL", "Israel"),
    ("IN", "India"),
    ("IS", "Iceland"),
    ("IT", "Italy"),
    ("JE", "Jersey"),
    ("JO", "Jordan"),
    ("JP", "Japan"),
    ("KE", "Kenya"),
    ("KR", "South Korea"),
    ("KW", "Kuwait"),
    ("KY", "Cayman Islands"),
    ("LK", "Sri Lanka"),
    ("LT", "Lithuania"),
    ("LU", "Luxembourg"),
    ("LV", "Latvia"),
    ("MA", "Morocco"),
    ("MT", "Malta"),
    ("MU", "Mauritius"),
    ("MX", "Mexico"),
    ("MY", "Malaysia"),
    ("NG", "Nigeria"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("NZ", "New Zealand"),
    ("OM", "Oman"),
    ("PA", "Panama"),
    ("PE", "Peru"),
    ("PH", "Philippines"),
    ("PK", "Pakistan"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("QA", "Qatar"),
    ("RO", "Romania"),
    ("RS", "Serbia"),
    ("RU", "Russia"),
    ("SA", "Saudi Arabia"),
    ("SE", "Sweden"),
    ("SG", "Singapore"),
    ("SI", "Slovenia"),
    ("SK", "Slovakia"),
    ("TH", "Thailand"),
    ("TR", "Turkey"),
    ("TW", "Taiwan"),
    ("UA", "Ukraine"),
    ("US", "United States"),
    ("UY", "Uruguay"),
    ("VN", "Vietnam"),
    ("ZA", "South Africa"),
];

lazy_static! {
    static ref COUNTRY_BY_NAME: HashMap<&'static str, &'static str> =
        COUNTRIES.iter().map(|(code, name)| (*name, *code)).collect();

    /// External country names that differ from the reference list.
    static ref COUNTRY_NAME_OVERRIDES: HashMap<&'static str, &'static str> = [
        ("Czechia", "Czech Republic"),
        ("Holland", "Netherlands"),
        ("Korea, Republic of", "South Korea"),
        ("Republic of Korea", "South Korea"),
        ("Russian Federation", "Russia"),
        ("Taiwan, Province of China", "Taiwan"),
        ("United States of America", "United States"),
        ("Viet Nam", "Vietnam"),
    ]
    .into_iter()
    .collect();

    /// External sector names that differ from the internal taxonomy.
    static ref SECTOR_OVERRIDES: HashMap<&'static str, &'static str> = [
        ("Consumer Discretionary", "Consumer Cyclical"),
        ("Consumer Defensive", "Consumer Staples"),
        ("Health Care", "Healthcare"),
        ("Information Technology", "Technology"),
    ]
    .into_iter()
    .collect();
}

/// Resolve a country name to its ISO 3166-1 alpha-2 code.
///
/// Overrides are applied first, then an exact match against the reference
/// list. `None` means the name is unknown and the entry should be skipped.
pub fn country_code_by_name(name: &str) -> Option<&'static str> {
    let canonical = COUNTRY_NAME_OVERRIDES.get(name).copied().unwrap_or(name);
    COUNTRY_BY_NAME.get(canonical).copied()
}

/// Translate an external sector name into the internal taxonomy.
/// Names without an override pass through unchanged.
pub fn normalize_sector(name: &str) -> &str {
    SECTOR_OVERRIDES.get(name).copied().unwrap_or(name)
}
