//! Deterministic sample articles, used when PubMed is not configured or the
//! caller asks for demo data.

use medlit_common::Article;

pub const DEFAULT_DEMO_JOURNALS: &[&str] = &["Demo Journal Alpha", "Demo Journal Beta", "Demo Journal Charlie"];
pub const DEFAULT_DEMO_MESH: &[&str] = &["Education, Medical", "Simulation Training"];

/// Journals used when neither a selection nor rankings are available.
pub const EXAMPLE_JOURNALS: &[&str] = &["Journal of Example Medicine", "Medical Example Quarterly"];

const FIRST_DEMO_PMID: usize = 10_000_000;

/// Generate `count` articles cycling over `journals` and `mesh_terms`.
/// Empty inputs fall back to the default demo journals and terms.
pub fn demo_articles(journals: &[String], mesh_terms: &[String], count: usize) -> Vec<Article> {
    let journals: Vec<String> = if journals.is_empty() {
        DEFAULT_DEMO_JOURNALS.iter().map(|s| s.to_string()).collect()
    } else {
        journals.to_vec()
    };
    let mesh: Vec<String> = if mesh_terms.is_empty() {
        DEFAULT_DEMO_MESH.iter().map(|s| s.to_string()).collect()
    } else {
        mesh_terms.to_vec()
    };

    (0..count)
        .map(|i| {
            let journal = journals[i % journals.len()].clone();
            let mesh_count = (1 + i % 2).min(mesh.len());
            let terms: Vec<String> = mesh[..mesh_count].to_vec();
            let pmid = (FIRST_DEMO_PMID + i).to_string();

            Article {
                url: Article::pubmed_url(&pmid),
                pubmed_id: pmid,
                title: format!("Demo Study on {} - Vol. {}", mesh[0], i + 1),
                journal,
                publication_date: format!("2023-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
                authors: vec!["Dr. Demo One".to_string(), "Dr. Demo Two".to_string()],
                abstract_text: format!(
                    "This is a sample abstract for a demo article concerning {}. \
                     This study explores various aspects and concludes with key findings. \
                     Demo abstract part {}.",
                    terms.join(", "),
                    i + 1
                ),
                mesh_terms: terms,
                impact_factor: 0.0,
            }
        })
        .collect()
}
