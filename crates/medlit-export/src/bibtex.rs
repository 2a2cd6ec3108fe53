use medlit_common::Article;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Escape characters that are special in BibTeX field values.
pub fn escape_bibtex(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '%' | '&' | '$' | '#' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Year and abbreviated month from `YYYY-MM-DD`, `YYYY-MM`, `YYYY` or a
/// MedlineDate such as `2022 Nov-Dec` or `2019 Spring`.
fn year_month(date: &str) -> (Option<&str>, Option<&'static str>) {
    let date = date.trim();
    let digits = date.bytes().take_while(u8::is_ascii_digit).count();
    if digits != 4 {
        return (None, None);
    }
    let (year, rest) = date.split_at(4);

    let month = if let Some(numeric) = rest.strip_prefix('-') {
        numeric
            .split('-')
            .next()
            .and_then(|m| m.trim().parse::<usize>().ok())
            .filter(|m| (1..=12).contains(m))
            .map(|m| MONTHS[m - 1])
    } else {
        let word: String = rest.trim_start().chars().take(3).collect();
        MONTHS.iter().copied().find(|m| m.eq_ignore_ascii_case(&word))
    };
    (Some(year), month)
}

fn citation_key(pmid: &str) -> String {
    let key: String = pmid.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("pubmed_{}", key)
}

/// One `@article` entry.
pub fn bibtex_entry(article: &Article) -> String {
    let mut fields: Vec<(&str, String)> = Vec::new();

    if !article.title.is_empty() {
        fields.push(("title", escape_bibtex(&article.title)));
    }
    if !article.authors.is_empty() {
        fields.push(("author", escape_bibtex(&article.authors.join(" and "))));
    }
    if !article.journal.is_empty() {
        fields.push(("journal", escape_bibtex(&article.journal)));
    }
    let (year, month) = year_month(&article.publication_date);
    if let Some(year) = year {
        fields.push(("year", year.to_string()));
    }
    if let Some(month) = month {
        fields.push(("month", month.to_string()));
    }
    if !article.pubmed_id.is_empty() {
        fields.push(("note", format!("PMID: {}", article.pubmed_id)));
    }
    if !article.url.is_empty() {
        fields.push(("url", article.url.clone()));
    }
    if article.has_abstract() {
        fields.push(("abstract", escape_bibtex(&article.abstract_text)));
    }

    let body = fields
        .iter()
        .map(|(name, value)| format!("  {} = {{{}}}", name, value))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("@article{{{},\n{}\n}}", citation_key(&article.pubmed_id), body)
}

/// Entries separated by blank lines.
pub fn to_bibtex(articles: &[Article]) -> Vec<u8> {
    let mut out = articles.iter().map(bibtex_entry).collect::<Vec<_>>().join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medlit_common::NO_ABSTRACT;
    use pretty_assertions::assert_eq;

    fn article() -> Article {
        Article {
            pubmed_id: "38000001".into(),
            title: "50% of {cases} & C_1 costs $5 #1".into(),
            journal: "Eye".into(),
            publication_date: "2023-03-07".into(),
            authors: vec!["Jane Smith".into(), "KH Lee".into()],
            mesh_terms: vec![],
            abstract_text: NO_ABSTRACT.into(),
            url: Article::pubmed_url("38000001"),
            impact_factor: 0.0,
        }
    }

    #[test]
    fn test_entry_layout() {
        assert_eq!(
            bibtex_entry(&article()),
            "@article{pubmed_38000001,\n\
             \x20 title = {50\\% of \\{cases\\} \\& C\\_1 costs \\$5 \\#1},\n\
             \x20 author = {Jane Smith and KH Lee},\n\
             \x20 journal = {Eye},\n\
             \x20 year = {2023},\n\
             \x20 month = {Mar},\n\
             \x20 note = {PMID: 38000001},\n\
             \x20 url = {https://pubmed.ncbi.nlm.nih.gov/38000001/}\n\
             }"
        );
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(escape_bibtex("a\\b"), "a\\textbackslash{}b");
    }

    #[test]
    fn test_year_month_variants() {
        assert_eq!(year_month("2021"), (Some("2021"), None));
        assert_eq!(year_month("2021-13-01"), (Some("2021"), None));
        assert_eq!(year_month("2019 Spring"), (Some("2019"), None));
        assert_eq!(year_month("2022 Nov-Dec"), (Some("2022"), Some("Nov")));
        assert_eq!(year_month("20211"), (None, None));
        assert_eq!(year_month("Spring 2019"), (None, None));
    }

    #[test]
    fn test_medline_date_keeps_year() {
        let mut a = article();
        a.publication_date = "2022 Nov-Dec".into();
        let entry = bibtex_entry(&a);
        assert!(entry.contains("  year = {2022},"));
        assert!(entry.contains("  month = {Nov},"));
    }

    #[test]
    fn test_abstract_included_when_present() {
        let mut a = article();
        a.abstract_text = "Real abstract.".into();
        assert!(bibtex_entry(&a).contains("  abstract = {Real abstract.}"));
    }
}
