//! Built-in ranking tables served when the live OOIR fetch fails.

use medlit_common::{normalize_specialty, rank_journals, JournalRanking};

pub const ALLERGY: &[(&str, f64)] = &[
    ("Allergy", 12.6),
    ("Journal of Allergy and Clinical Immunology", 11.4),
    ("Clinical Reviews in Allergy & Immunology", 8.4),
    ("Journal of Allergy and Clinical Immunology-In Practice", 8.2),
    ("Clinical and Experimental Allergy", 6.3),
    ("Allergology International", 6.2),
    ("Journal of Investigational Allergology and Clinical Immunology", 6.1),
    ("Annals of Allergy Asthma & Immunology", 5.8),
    ("Current Allergy and Asthma Reports", 5.4),
    ("Contact Dermatitis", 4.8),
    ("Clinical and Translational Allergy", 4.6),
    ("Pediatric Allergy and Immunology", 4.3),
    ("Allergy Asthma & Immunology Research", 4.1),
    ("World Allergy Organization Journal", 3.9),
    ("Journal of Asthma and Allergy", 3.7),
    ("Current Opinion in Allergy and Clinical Immunology", 3.0),
    ("Immunology and Allergy Clinics of North America", 2.7),
    ("Allergy Asthma and Clinical Immunology", 2.6),
    ("Allergy and Asthma Proceedings", 2.6),
    ("Allergologia et Immunopathologia", 2.5),
    ("International Archives of Allergy and Immunology", 2.5),
    ("Asian Pacific Journal of Allergy and Immunology", 2.3),
    ("Journal of Asthma", 1.7),
    ("Allergologie", 1.4),
    ("Postepy Dermatologii i Alergologii", 1.4),
    ("Iranian Journal of Allergy Asthma and Immunology", 1.2),
    ("Pediatric Allergy Immunology and Pulmonology", 1.1),
    ("Revue Francaise d'Allergologie", 0.5),
];

pub const OPHTHALMOLOGY: &[(&str, f64)] = &[
    ("Progress in Retinal and Eye Research", 14.7),
    ("Ophthalmology", 9.2),
    ("JAMA Ophthalmology", 7.9),
    ("Ocular Surface", 7.5),
    ("Survey of Ophthalmology", 5.9),
    ("Annual Review of Vision Science", 5.5),
    ("Clinical and Experimental Ophthalmology", 3.8),
    ("American Journal of Ophthalmology", 5.6),
    ("Contact Lens & Anterior Eye", 3.2),
    ("British Journal of Ophthalmology", 4.6),
    ("Asia-Pacific Journal of Ophthalmology", 2.8),
    ("Canadian Journal of Ophthalmology-Journal Canadien d'Ophtalmologie", 2.5),
    ("Acta Ophthalmologica", 3.5),
    ("Experimental Eye Research", 3.5),
    ("Current Opinion in Ophthalmology", 3.1),
    ("Journal of Refractive Surgery", 2.9),
    ("Eye", 2.8),
    ("Ophthalmic and Physiological Optics", 2.7),
    ("Translational Vision Science & Technology", 2.5),
    ("Ophthalmology and Therapy", 2.4),
    ("Journal of Cataract and Refractive Surgery", 4.1),
    ("Documenta Ophthalmologica", 2.0),
    ("Ocular Immunology and Inflammation", 2.2),
    ("Graefes Archive for Clinical and Experimental Ophthalmology", 3.3),
    ("Retina-The Journal of Retinal and Vitreous Diseases", 4.3),
    ("Indian Journal of Ophthalmology", 1.8),
    ("Ophthalmologica", 2.2),
    ("Japanese Journal of Ophthalmology", 1.9),
    ("Eye & Contact Lens-Science and Clinical Practice", 2.3),
    ("Journal of Vision", 2.1),
    ("Ophthalmic Research", 2.0),
    ("Journal of Glaucoma", 2.4),
    ("Journal of Neuro-Ophthalmology", 2.2),
    ("Cornea", 2.6),
    ("International Journal of Ophthalmology", 1.6),
    ("Journal of Ocular Pharmacology and Therapeutics", 1.9),
    ("Seminars in Ophthalmology", 1.5),
    ("Journal of Ophthalmology", 1.7),
    ("BMC Ophthalmology", 1.8),
    ("Ophthalmic Epidemiology", 1.9),
    ("Current Eye Research", 2.0),
];

pub const DERMATOLOGY: &[(&str, f64)] = &[
    ("Journal of Dermatological Science", 3.8),
    ("Dermatologic Therapy", 3.7),
    ("Clinical and Experimental Dermatology", 3.7),
    ("Experimental Dermatology", 3.5),
    ("Acta Dermato-Venereologica", 3.5),
    ("Dermatology and Therapy", 3.5),
    ("International Journal of Dermatology", 3.5),
    ("Burns", 3.2),
    ("Indian Journal of Dermatology Venereology & Leprology", 3.2),
    ("Journal of Cutaneous Medicine and Surgery", 3.1),
    ("Annales de Dermatologie et de Venereologie", 3.1),
    ("Dermatology", 3.0),
    ("Journal of Dermatology", 2.9),
    ("Journal of Dermatological Treatment", 2.9),
    ("Skin Pharmacology and Physiology", 2.8),
    ("International Journal of Cosmetic Science", 2.7),
    ("International Wound Journal", 2.6),
    ("Anais Brasileiros de Dermatologia", 2.6),
    ("Dermatologic Surgery", 2.5),
    ("Dermatology Practical & Conceptual", 2.5),
    ("Photodermatology Photoimmunology & Photomedicine", 2.5),
    ("Journal of Tissue Viability", 2.4),
    ("Journal of Cosmetic Dermatology", 2.3),
    ("Clinics in Dermatology", 2.3),
    ("Dermatologica Sinica", 2.3),
    ("Lasers in Surgery and Medicine", 2.2),
    ("Australasian Journal of Dermatology", 2.2),
    ("Dermatologica Clinica", 2.2),
    ("European Journal of Dermatology", 2.0),
    ("Skin Research and Technology", 2.0),
    ("Veterinary Dermatology", 1.9),
    ("Clinical Cosmetic and Investigational Dermatology", 1.9),
    ("Archives of Dermatological Research", 1.8),
    ("Advances in Skin & Wound Care", 1.7),
    ("Journal of Cutaneous Pathology", 1.6),
    ("International Journal of Lower Extremity Wounds", 1.5),
    ("Annals of Dermatology", 1.5),
    ("Melanoma Research", 1.5),
    ("Journal of Wound Care", 1.5),
    ("Journal of Burn Care & Research", 1.5),
    ("Postepy Dermatologii (Alergologii)", 1.4),
    ("Journal of Cosmetic and Laser Therapy", 1.2),
    ("Journal of Investigative Dermatology", 8.6),
    ("JAMA Dermatology", 9.3),
    ("British Journal of Dermatology", 9.0),
];

/// The raw table for a specialty, matched after normalisation.
pub fn fallback_table(specialty: &str) -> Option<&'static [(&'static str, f64)]> {
    match normalize_specialty(specialty).as_str() {
        "Allergy" => Some(ALLERGY),
        "Ophthalmology" => Some(OPHTHALMOLOGY),
        "Dermatology" => Some(DERMATOLOGY),
        _ => None,
    }
}

/// The fallback table as a ranked list, highest impact factor first.
pub fn fallback_rankings(specialty: &str) -> Option<Vec<JournalRanking>> {
    let specialty = normalize_specialty(specialty);
    fallback_table(&specialty).map(|table| rank_journals(&specialty, table.iter().copied()))
}

pub fn has_fallback(specialty: &str) -> bool {
    fallback_table(specialty).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_tables_are_ranked() {
        for specialty in ["Allergy", "Ophthalmology", "Dermatology"] {
            let ranked = fallback_rankings(specialty).unwrap();
            assert!(!ranked.is_empty());
            assert!(ranked.windows(2).all(|w| w[0].impact_factor >= w[1].impact_factor));
            assert_eq!(ranked[0].rank, 1);
            assert_eq!(ranked.last().unwrap().rank as usize, ranked.len());
        }
    }

    #[test]
    fn test_dermatology_top_journal() {
        let ranked = fallback_rankings("Dermatology").unwrap();
        assert_eq!(ranked[0].journal_name, "JAMA Dermatology");
        assert_eq!(ranked.len(), 45);
    }

    #[test]
    fn test_table_lookup_by_specialty() {
        assert!(fallback_rankings("Cardiology").is_none());
        assert!(has_fallback(" ophthalmology "));
    }
}
