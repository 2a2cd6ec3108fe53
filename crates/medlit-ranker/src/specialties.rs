//! Clinical specialties offered in the specialty picker.

use std::collections::BTreeSet;

pub const KNOWN_SPECIALTIES: &[&str] = &[
    "Allergy", "Andrology", "Anesthesiology", "Cardiology", "Dermatology",
    "Emergency Medicine", "Endocrinology", "Gastroenterology", "Geriatrics",
    "Gynecology", "Hematology", "Immunology", "Infectious Diseases",
    "Internal Medicine", "Nephrology", "Neurology", "Neurosurgery",
    "Obstetrics", "Oncology", "Ophthalmology", "Orthopedics",
    "Otolaryngology", "Pathology", "Pediatrics", "Physical Medicine",
    "Plastic Surgery", "Psychiatry", "Pulmonology", "Radiology",
    "Rheumatology", "Sports Medicine", "Surgery", "Toxicology",
    "Transplantation", "Urology", "Vascular Medicine",
];

/// Sorted, de-duplicated union of the built-in list and whatever has been cached.
pub fn available_specialties<I, S>(cached: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    KNOWN_SPECIALTIES
        .iter()
        .map(|s| s.to_string())
        .chain(cached.into_iter().map(|s| s.as_ref().to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_is_sorted_and_deduplicated() {
        let all = available_specialties(["Ophthalmology", "Clinical Neurology"]);
        assert_eq!(all.len(), KNOWN_SPECIALTIES.len() + 1);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert!(all.contains(&"Clinical Neurology".to_string()));
    }
}
