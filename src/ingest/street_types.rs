//! Calgary street-type abbreviations and address normalization.
//!
//! Parcel addresses are written `#UNIT NUMBER STREET NAME TYPE QUADRANT`,
//! e.g. `#7V 20 COUNTRY HILLS VW NW`, with the street type abbreviated
//! to two letters.

/// Street-type abbreviations used in Calgary parcel addresses.
pub const STREET_TYPES: [(&str, &str); 46] = [
    ("AL", "Alley"),
    ("AV", "Avenue"),
    ("BA", "Bay"),
    ("BV", "Boulevard"),
    ("CA", "Cape"),
    ("CE", "Centre"),
    ("CI", "Circle"),
    ("CL", "Close"),
    ("CM", "Common"),
    ("CO", "Court"),
    ("CV", "Cove"),
    ("CR", "Crescent"),
    ("DR", "Drive"),
    ("GD", "Gardens"),
    ("GA", "Gate"),
    ("GR", "Green"),
    ("GV", "Grove"),
    ("HE", "Heath"),
    ("HT", "Heights"),
    ("HI", "Highway"),
    ("HL", "Hill"),
    ("IS", "Island"),
    ("LN", "Lane"),
    ("LI", "Link"),
    ("MR", "Manor"),
    ("ME", "Mews"),
    ("MT", "Mount"),
    ("PR", "Parade"),
    ("PA", "Park"),
    ("PY", "Parkway"),
    ("PS", "Passage"),
    ("PH", "Path"),
    ("PL", "Place"),
    ("PZ", "Plaza"),
    ("PT", "Point"),
    ("RI", "Rise"),
    ("RD", "Road"),
    ("RO", "Row"),
    ("SQ", "Square"),
    ("ST", "Street"),
    ("TC", "Terrace"),
    ("TR", "Trail"),
    ("VW", "View"),
    ("VI", "Villas"),
    ("WK", "Walk"),
    ("WY", "Way"),
];

const QUADRANTS: [&str; 4] = ["NE", "NW", "SE", "SW"];

/// Full street-type name for a two-letter abbreviation.
///
/// # Examples
///
/// ```
/// use delivery_routes::ingest::street_type_name;
///
/// assert_eq!(street_type_name("vw"), Some("View"));
/// assert_eq!(street_type_name("XX"), None);
/// ```
pub fn street_type_name(abbreviation: &str) -> Option<&'static str> {
    STREET_TYPES
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(abbreviation))
        .map(|&(_, name)| name)
}

/// Two-letter abbreviation for a full street-type name.
pub fn street_type_abbreviation(name: &str) -> Option<&'static str> {
    STREET_TYPES
        .iter()
        .find(|(_, full)| full.eq_ignore_ascii_case(name))
        .map(|&(abbr, _)| abbr)
}

/// Canonical form used to match addresses against the parcel table.
///
/// Uppercases, collapses whitespace, drops trailing punctuation, and
/// abbreviates a spelled-out street type sitting before the quadrant
/// (or at the end when there is no quadrant).
///
/// # Examples
///
/// ```
/// use delivery_routes::ingest::normalize_address;
///
/// assert_eq!(normalize_address(" 20 Country Hills  View NW."), "20 COUNTRY HILLS VW NW");
/// assert_eq!(normalize_address("24 aero dr ne"), "24 AERO DR NE");
/// ```
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim().trim_end_matches([',', '.']);
    let mut words: Vec<String> = trimmed
        .split_whitespace()
        .map(|w| w.to_ascii_uppercase())
        .collect();

    let type_pos = match words.last() {
        Some(last) if QUADRANTS.contains(&last.as_str()) => words.len().checked_sub(2),
        Some(_) => Some(words.len() - 1),
        None => None,
    };

    // Never touch the house number.
    if let Some(pos) = type_pos.filter(|&p| p > 0) {
        if let Some(abbr) = street_type_abbreviation(&words[pos]) {
            words[pos] = abbr.to_string();
        }
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_consistent() {
        for (abbr, name) in STREET_TYPES {
            assert_eq!(abbr.len(), 2);
            assert_eq!(street_type_name(abbr), Some(name));
            assert_eq!(street_type_abbreviation(name), Some(abbr));
        }
    }

    #[test]
    fn test_abbreviation_case_insensitive() {
        assert_eq!(street_type_abbreviation("CRESCENT"), Some("CR"));
        assert_eq!(street_type_abbreviation("boulevard"), Some("BV"));
        assert_eq!(street_type_abbreviation("Nowhere"), None);
    }

    #[test]
    fn test_normalize_without_quadrant() {
        assert_eq!(normalize_address("100 Main Street"), "100 MAIN ST");
    }

    #[test]
    fn test_normalize_keeps_unit() {
        assert_eq!(
            normalize_address("#7V 20 country hills view nw"),
            "#7V 20 COUNTRY HILLS VW NW"
        );
    }

    #[test]
    fn test_normalize_leaves_name_words() {
        // "Park" inside the street name is not the street type.
        assert_eq!(
            normalize_address("5 Park Ridge Drive SE"),
            "5 PARK RIDGE DR SE"
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_address("   "), "");
    }
}
