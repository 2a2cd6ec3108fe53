//! Impact-factor estimation for journals missing from a specialty's ranking list.

use crate::fallback::fallback_table;
use regex::Regex;
use std::sync::LazyLock;

/// General journals whose impact factor is known regardless of specialty.
const HIGH_IMPACT_JOURNALS: &[(&str, f64)] = &[
    ("Science", 47.7),
    ("Nature", 49.9),
    ("Cell", 38.6),
    ("PNAS", 11.2),
    ("PLoS Medicine", 10.5),
    ("JAMA Internal Medicine", 18.7),
    ("BMJ", 39.9),
    ("NEJM", 91.2),
    ("Nature Medicine", 53.4),
    ("Lancet", 79.3),
];

/// Checked in order; the first match wins.
const GENERIC_PATTERNS: &[(&str, f64)] = &[
    (r"^(new england journal of medicine|nejm)$", 91.2),
    (r"^(lancet|the lancet)$", 79.3),
    (r"^(journal of the american medical association|jama)$", 56.3),
    (r"^(nature medicine)$", 53.4),
    (r"^(bmj|british medical journal)$", 39.9),
    (r"^(nature reviews \w+)$", 30.0),
    (r"^(annual review of \w+)$", 20.0),
    (r"^(cell \w+)$", 15.0),
    (r"^(advances in \w+)$", 10.0),
    (r"^(journal of \w+ and \w+)$", 8.5),
    (r"^(international journal of \w+)$", 7.0),
    (r"^(journal of \w+)$", 6.0),
    (r"^(european journal of \w+)$", 5.5),
    (r"^(american journal of \w+)$", 5.0),
    (r"^(british journal of \w+)$", 4.5),
    (r"^(current \w+)$", 4.0),
    (r"^(\w+ journal)$", 3.5),
    (r"^(\w+ research)$", 3.0),
    (r"^(\w+ reviews)$", 2.5),
    (r"^(\w+ practice)$", 2.0),
    (r"^(\w+ proceedings)$", 1.5),
    (r"^(\w+ communications)$", 1.0),
];

static COMPILED_PATTERNS: LazyLock<Vec<(Regex, f64)>> = LazyLock::new(|| {
    GENERIC_PATTERNS
        .iter()
        .filter_map(|(pattern, impact)| Regex::new(pattern).ok().map(|re| (re, *impact)))
        .collect()
});

const PRESTIGE_WORDS: &[&str] = &[
    "nature", "cell", "lancet", "jama", "nejm", "bmj", "science", "elsevier", "wiley", "oxford",
    "cambridge", "american", "european", "international", "world", "royal", "society",
];

const HIGH_IMPACT_TYPES: &[&str] = &["review", "advances", "trends", "progress", "annual", "current"];

const HEURISTIC_CAP: f64 = 15.0;

/// Best-effort impact factor for `journal` within `specialty`.
///
/// Lookup order: well-known general journals, the specialty's built-in table
/// (exact, case-insensitive, then close partial match), generic name patterns,
/// and finally a name heuristic. Blank names get 1.0.
pub fn estimate_impact_factor(specialty: &str, journal: &str) -> f64 {
    let name = journal.trim();
    if name.is_empty() {
        return 1.0;
    }
    let lower = name.to_lowercase();
    let specialty_lower = specialty.trim().to_lowercase();

    for (known, impact) in HIGH_IMPACT_JOURNALS {
        let known = known.to_lowercase();
        if lower == known || lower.contains(&known) {
            return *impact;
        }
    }

    if let Some(impact) = table_lookup(specialty, name, &lower) {
        return impact;
    }

    for (re, impact) in COMPILED_PATTERNS.iter() {
        if re.is_match(&lower) {
            if !specialty_lower.is_empty() && lower.contains(&specialty_lower) {
                return impact * 1.2;
            }
            return *impact;
        }
    }

    estimate_from_name(&lower, &specialty_lower)
}

fn table_lookup(specialty: &str, name: &str, lower: &str) -> Option<f64> {
    let table = fallback_table(specialty)?;

    if let Some((_, impact)) = table.iter().find(|(key, _)| *key == name) {
        return Some(*impact);
    }
    if let Some((_, impact)) = table.iter().find(|(key, _)| key.to_lowercase() == lower) {
        return Some(*impact);
    }

    // Partial match only when one name contains the other and the two are
    // close in length, so "Eye" does not claim "Experimental Eye Research".
    table.iter().find_map(|(key, impact)| {
        let key = key.to_lowercase();
        let contained = key.contains(lower) || lower.contains(&key);
        let (short, long) = if key.len() < lower.len() {
            (key.len(), lower.len())
        } else {
            (lower.len(), key.len())
        };
        (contained && short > 5 && short as f64 / long as f64 > 0.7).then_some(*impact)
    })
}

fn estimate_from_name(lower: &str, specialty_lower: &str) -> f64 {
    let mut impact = 1.0_f64;

    if PRESTIGE_WORDS.iter().any(|w| lower.contains(w)) {
        impact *= 1.5;
    }
    if HIGH_IMPACT_TYPES.iter().any(|w| lower.contains(w)) {
        impact *= 1.3;
    }
    if !specialty_lower.is_empty() && lower.contains(specialty_lower) {
        impact *= 1.2;
    }

    (impact.min(HEURISTIC_CAP) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_high_impact_substring() {
        assert!(approx(estimate_impact_factor("Cardiology", "The Lancet"), 79.3));
        assert!(approx(estimate_impact_factor("Cardiology", "Nature Medicine"), 49.9));
    }

    #[test]
    fn test_table_exact_and_case_insensitive() {
        assert!(approx(estimate_impact_factor("Ophthalmology", "Cornea"), 2.6));
        assert!(approx(estimate_impact_factor("Ophthalmology", "jama ophthalmology"), 7.9));
    }

    #[test]
    fn test_table_partial_match() {
        // "Survey of Ophthalmology." vs "Survey of Ophthalmology"
        assert!(approx(estimate_impact_factor("Ophthalmology", "Survey of Ophthalmology."), 5.9));
    }

    #[test]
    fn test_generic_pattern_with_specialty_boost() {
        assert!(approx(estimate_impact_factor("Cardiology", "Journal of Hypertension"), 6.0));
        assert!(approx(estimate_impact_factor("Cardiology", "Journal of Cardiology"), 6.0 * 1.2));
    }

    #[test]
    fn test_name_heuristic() {
        // prestige ×1.5, type ×1.3, specialty ×1.2 → 2.34 → 2.3
        assert!(approx(
            estimate_impact_factor("Cardiology", "European Heart Reviews in Cardiology Today"),
            2.3
        ));
        assert!(approx(estimate_impact_factor("Urology", "Urologic Oncology Seminars Weekly"), 1.0));
        assert!(approx(estimate_impact_factor("Urology", "  "), 1.0));
    }
}
