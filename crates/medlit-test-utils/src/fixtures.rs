//! Canned upstream payloads and sample records.

use chrono::Utc;
use medlit_common::{Article, Bookmark};

/// An OOIR journals page for Ophthalmology: one unrelated table, then the
/// ranking table with an anchor-wrapped name, a `ca.` value and a dash.
pub const OOIR_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Ophthalmology journals - OOIR</title></head>
<body>
  <table class="nav"><tr><th>Menu</th></tr><tr><td>Home</td></tr></table>
  <table class="table">
    <thead>
      <tr><th>Rank</th><th>Journal</th><th>Impact Factor</th></tr>
    </thead>
    <tbody>
      <tr><td>2</td><td><a href="/j.php?id=2">American Journal of Ophthalmology</a></td><td>4.2</td></tr>
      <tr><td>1</td><td><a href="/j.php?id=1">Progress in Retinal and Eye Research</a></td><td>ca. 17.8</td></tr>
      <tr><td>3</td><td>Ophthalmology</td><td>13.7</td></tr>
      <tr><td>4</td><td>Acta Ophthalmologica</td><td>-</td></tr>
      <tr><td colspan="3">Advertisement</td></tr>
    </tbody>
  </table>
</body>
</html>"#;

/// A page that loads but carries no ranking table.
pub const OOIR_EMPTY_HTML: &str =
    "<html><body><p>No journals found for this category.</p></body></html>";

pub const ESEARCH_JSON: &str = r#"{
  "header": {"type": "esearch", "version": "0.3"},
  "esearchresult": {
    "count": "2",
    "retmax": "2",
    "retstart": "0",
    "idlist": ["38000001", "38000002"],
    "querytranslation": "diabetes[All Fields]"
  }
}"#;

pub const EFETCH_XML: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">38000001</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2024</Year><Month>Feb</Month></PubDate>
          </JournalIssue>
          <Title>The Lancet</Title>
        </Journal>
        <ArticleTitle>Glycaemic control in type 2 diabetes.</ArticleTitle>
        <Abstract>
          <AbstractText>Tight control reduced complications.</AbstractText>
        </Abstract>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y"><LastName>Garcia</LastName><ForeName>Maria</ForeName><Initials>M</Initials></Author>
        </AuthorList>
      </Article>
      <MeshHeadingList>
        <MeshHeading><DescriptorName UI="D003924" MajorTopicYN="Y">Diabetes Mellitus, Type 2</DescriptorName></MeshHeading>
      </MeshHeadingList>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">38000002</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2023</Year><Month>12</Month><Day>15</Day></PubDate>
          </JournalIssue>
          <Title>The Lancet</Title>
        </Journal>
        <ArticleTitle>Insulin pumps in adolescents.</ArticleTitle>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

/// A small article with the given id, journal and MeSH headings.
pub fn sample_article(pmid: &str, journal: &str, mesh: &[&str]) -> Article {
    Article {
        pubmed_id: pmid.to_string(),
        title: format!("Sample study {}", pmid),
        journal: journal.to_string(),
        publication_date: "2024-01-15".to_string(),
        authors: vec!["Jane Smith".to_string(), "Ravi Patel".to_string()],
        mesh_terms: mesh.iter().map(|m| m.to_string()).collect(),
        abstract_text: format!("Abstract of study {}.", pmid),
        url: Article::pubmed_url(pmid),
        impact_factor: 0.0,
    }
}

/// Articles 1..=n spread across two journals.
pub fn sample_articles(n: usize) -> Vec<Article> {
    (1..=n)
        .map(|i| {
            let journal = if i % 2 == 0 { "Cornea" } else { "Ophthalmology" };
            let mut a = sample_article(&format!("{}", 30_000_000 + i), journal, &["Education, Medical"]);
            a.publication_date = format!("2024-{:02}-01", (i % 12) + 1);
            a
        })
        .collect()
}

pub fn sample_bookmark(pmid: &str) -> Bookmark {
    Bookmark {
        pmid: pmid.to_string(),
        title: format!("Bookmarked study {}", pmid),
        authors: "Jane Smith, Ravi Patel".to_string(),
        journal: "Cornea".to_string(),
        pub_date: "2024-01-15".to_string(),
        abstract_text: "An abstract.".to_string(),
        timestamp: Utc::now(),
    }
}

