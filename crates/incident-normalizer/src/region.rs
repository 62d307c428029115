//! Region resolution heuristics.
//!
//! Maps free-text region and country labels onto the canonical five-region
//! set. Resolution is an ordered fallback chain; the first stage that
//! produces a match wins.

use geo_reference::tables::{region_for_country_code, region_for_country_name};
use geo_reference::CanonicalRegion;

/// Exact uppercase labels that mean "no specific region".
const GLOBAL_LABELS: &[&str] = &["GLOBAL", "WORLD"];

/// Exact uppercase synonyms for the Americas bucket.
const AMER_LABELS: &[&str] = &[
    "AMER",
    "AMERICAS",
    "AMERICA",
    "NA",
    "NORAM",
    "NORTH AMERICA",
    "US",
    "USA",
    "CANADA",
];

/// LATAM-specific labels, carved out of the Americas set.
const LATAM_LABELS: &[&str] = &["LATAM", "LATIN AMERICA", "LAC"];

/// Exact uppercase synonyms for EMEA.
const EMEA_LABELS: &[&str] = &["EMEA", "EMEAR", "EUROPE", "EU", "MIDDLE EAST", "AFRICA"];

// Substring token lists, scanned in fixed priority order. APJC first is
// significant: a label containing both an APJC and an AMER token resolves
// to APJC.
const APJC_TOKENS: &[&str] = &["apjc", "apac", "asia", "pacific", "japan", "anz"];
const AMER_TOKENS: &[&str] = &["amer", "america", "north america", "canada", "united states"];
const EMEA_TOKENS: &[&str] = &["emea", "europe", "middle east", "africa"];
const LATAM_TOKENS: &[&str] = &["latam", "latin", "caribbean"];

/// Resolve a raw region label to a canonical region.
///
/// Stages, first match wins: empty input, exact global/AMER/LATAM/EMEA
/// synonym, substring token scan (APJC, AMER, EMEA, LATAM in that order),
/// exact country-name lookup, two-letter country-code guess, `Global`.
pub fn normalize_region(raw: Option<&str>) -> CanonicalRegion {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return CanonicalRegion::Global,
    };

    let upper = raw.to_uppercase();
    if GLOBAL_LABELS.contains(&upper.as_str()) {
        return CanonicalRegion::Global;
    }
    if LATAM_LABELS.contains(&upper.as_str()) {
        return CanonicalRegion::Latam;
    }
    if AMER_LABELS.contains(&upper.as_str()) {
        return CanonicalRegion::Amer;
    }
    if EMEA_LABELS.contains(&upper.as_str()) {
        return CanonicalRegion::Emea;
    }

    let lower = raw.to_lowercase();
    let token_lists: [(&[&str], CanonicalRegion); 4] = [
        (APJC_TOKENS, CanonicalRegion::Apjc),
        (AMER_TOKENS, CanonicalRegion::Amer),
        (EMEA_TOKENS, CanonicalRegion::Emea),
        (LATAM_TOKENS, CanonicalRegion::Latam),
    ];
    for (tokens, region) in token_lists {
        if tokens.iter().any(|t| lower.contains(t)) {
            return region;
        }
    }

    if let Some(region) = region_for_country_name(&lower) {
        return region;
    }

    // Last guess: treat the first two characters as a country code.
    let code_guess: String = lower.chars().take(2).collect();
    if code_guess.len() == 2 {
        if let Some(region) = region_for_country_code(&code_guess) {
            return region;
        }
    }

    CanonicalRegion::Global
}

// Country-name fragments used as a final heuristic when code and name
// lookups both miss.
const AMER_COUNTRY_FRAGMENTS: &[&str] = &["united states", "canada"];
const LATAM_COUNTRY_FRAGMENTS: &[&str] =
    &["brazil", "mexico", "argentina", "chile", "colombia", "peru"];
const EMEA_COUNTRY_FRAGMENTS: &[&str] = &[
    "kingdom", "ireland", "germany", "france", "netherlands", "spain", "italy", "poland",
    "africa", "emirates", "saudi", "israel", "egypt", "turkey",
];
const APJC_COUNTRY_FRAGMENTS: &[&str] = &[
    "india", "china", "japan", "korea", "singapore", "malaysia", "thailand", "vietnam",
    "philippines", "indonesia", "taiwan", "australia", "zealand",
];

/// Resolve a country string to its region, or `None` when nothing matches.
///
/// Used when a record's region came out `Global` but a country is known;
/// callers must not overwrite their region on `None`.
pub fn region_for_country(country: &str) -> Option<CanonicalRegion> {
    let lower = country.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    // Common synonyms that the code table will not catch.
    let code_hint = match lower.as_str() {
        "usa" | "us" => "us",
        "uk" | "gb" => "gb",
        "south korea" => "kr",
        _ => "",
    };
    if !code_hint.is_empty() {
        if let Some(region) = region_for_country_code(code_hint) {
            return Some(region);
        }
    }

    if lower.len() == 2 {
        if let Some(region) = region_for_country_code(&lower) {
            return Some(region);
        }
    }
    if let Some(region) = region_for_country_name(&lower) {
        return Some(region);
    }

    let fragment_lists: [(&[&str], CanonicalRegion); 4] = [
        (AMER_COUNTRY_FRAGMENTS, CanonicalRegion::Amer),
        (LATAM_COUNTRY_FRAGMENTS, CanonicalRegion::Latam),
        (EMEA_COUNTRY_FRAGMENTS, CanonicalRegion::Emea),
        (APJC_COUNTRY_FRAGMENTS, CanonicalRegion::Apjc),
    ];
    for (fragments, region) in fragment_lists {
        if fragments.iter().any(|f| lower.contains(f)) {
            return Some(region);
        }
    }

    None
}
