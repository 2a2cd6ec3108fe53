//! PubMed E-utilities client.
//!
//! Endpoints used:
//!   esearch: {base}/esearch.fcgi  (retmode=json)
//!   efetch:  {base}/efetch.fcgi   (retmode=xml)
//!
//! NCBI allows 10 requests/s with an API key and 3 without; requests from one
//! client are spaced accordingly.

use async_trait::async_trait;
use chrono::NaiveDate;
use medlit_common::sandbox::SandboxClient as Client;
use medlit_common::{Article, EntrezCredentials, MedlitError, Result, NO_ABSTRACT};
use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::{ArticleSource, EsearchRequest, EsearchResult};

pub const DEFAULT_EUTILS_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

const SPACING_WITH_KEY: Duration = Duration::from_millis(105);
const SPACING_WITHOUT_KEY: Duration = Duration::from_millis(400);

pub struct PubMedClient {
    client: Client,
    esearch_url: String,
    efetch_url: String,
    tool: String,
    last_request: Mutex<Option<Instant>>,
}

impl PubMedClient {
    pub fn new(base_url: &str, tool: &str) -> Result<Self> {
        let mut client = Client::new()?;
        client.allow_url_host(base_url)?;
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            esearch_url: format!("{}/esearch.fcgi", base),
            efetch_url: format!("{}/efetch.fcgi", base),
            tool: tool.to_string(),
            last_request: Mutex::new(None),
        })
    }

    fn base_params(&self, creds: &EntrezCredentials) -> Vec<(&'static str, String)> {
        let mut params = vec![("db", "pubmed".to_string()), ("tool", self.tool.clone())];
        if let Some(email) = &creds.email {
            params.push(("email", email.clone()));
        }
        if let Some(key) = creds.api_key_str() {
            params.push(("api_key", key.to_string()));
        }
        params
    }

    /// Wait until enough time has passed since the previous request.
    async fn throttle(&self, has_key: bool) {
        let spacing = if has_key { SPACING_WITH_KEY } else { SPACING_WITHOUT_KEY };
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < spacing {
                tokio::time::sleep(spacing - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_text(&self, url: &str, params: &[(&'static str, String)], has_key: bool) -> Result<String> {
        self.throttle(has_key).await;

        let resp = self
            .client
            .get(url)?
            .query(params)
            .send()
            .await
            .map_err(|e| MedlitError::UpstreamUnavailable(format!("PubMed request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MedlitError::UpstreamUnavailable(format!("PubMed returned {}", status)));
        }

        resp.text()
            .await
            .map_err(|e| MedlitError::UpstreamUnavailable(format!("Reading PubMed response: {}", e)))
    }
}

#[async_trait]
impl ArticleSource for PubMedClient {
    #[instrument(skip(self, creds))]
    async fn esearch(&self, creds: &EntrezCredentials, request: &EsearchRequest) -> Result<EsearchResult> {
        let mut params = self.base_params(creds);
        params.push(("term", request.term.clone()));
        params.push(("retmode", "json".to_string()));
        params.push(("retstart", request.retstart.to_string()));
        params.push(("retmax", request.retmax.to_string()));
        if let Some(sort) = &request.sort {
            params.push(("sort", sort.clone()));
        }

        let body = self.get_text(&self.esearch_url, &params, creds.has_api_key()).await?;
        let result = parse_esearch_json(&body)?;
        debug!(count = result.count, returned = result.ids.len(), "PubMed esearch");
        Ok(result)
    }

    #[instrument(skip(self, creds, pmids), fields(n = pmids.len()))]
    async fn efetch(&self, creds: &EntrezCredentials, pmids: &[String]) -> Result<Vec<Article>> {
        if pmids.is_empty() {
            return Ok(vec![]);
        }

        let mut params = self.base_params(creds);
        params.push(("id", pmids.join(",")));
        params.push(("rettype", "abstract".to_string()));
        params.push(("retmode", "xml".to_string()));

        let xml = self.get_text(&self.efetch_url, &params, creds.has_api_key()).await?;
        parse_pubmed_xml(&xml)
    }
}

/// Parse an esearch `retmode=json` body.
pub fn parse_esearch_json(body: &str) -> Result<EsearchResult> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
        return Err(MedlitError::UpstreamUnavailable(format!("PubMed error: {}", err)));
    }

    let result = &value["esearchresult"];
    if let Some(err) = result.get("ERROR").and_then(|e| e.as_str()) {
        return Err(MedlitError::UpstreamUnavailable(format!("PubMed error: {}", err)));
    }

    let count = match &result["count"] {
        serde_json::Value::String(s) => s.parse().unwrap_or(0),
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    };

    let ids = result["idlist"]
        .as_array()
        .map(|ids| ids.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    Ok(EsearchResult { count, ids })
}

#[derive(Default)]
struct ArticleBuilder {
    pmid: Option<String>,
    title: String,
    journal: String,
    year: String,
    month: String,
    day: String,
    medline_date: String,
    authors: Vec<String>,
    abstract_sections: Vec<String>,
    mesh_terms: Vec<String>,
}

#[derive(Default)]
struct AuthorBuilder {
    last: String,
    fore: String,
    initials: String,
}

impl AuthorBuilder {
    fn display_name(&self) -> Option<String> {
        let last = self.last.trim();
        if last.is_empty() {
            return None;
        }
        let first = if !self.fore.trim().is_empty() { self.fore.trim() } else { self.initials.trim() };
        Some(format!("{} {}", first, last).trim().to_string())
    }
}

impl ArticleBuilder {
    fn build(self) -> Option<Article> {
        let pmid = self.pmid.filter(|p| !p.is_empty())?;
        let title = collapse_whitespace(&self.title);
        let journal = collapse_whitespace(&self.journal);
        let abstract_text = self
            .abstract_sections
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Some(Article {
            url: Article::pubmed_url(&pmid),
            publication_date: format_pub_date(&self.year, &self.month, &self.day, &self.medline_date),
            pubmed_id: pmid,
            title: if title.is_empty() { "No title available".to_string() } else { title },
            journal: if journal.is_empty() { "N/A".to_string() } else { journal },
            authors: self.authors,
            mesh_terms: self.mesh_terms,
            abstract_text: if abstract_text.is_empty() { NO_ABSTRACT.to_string() } else { abstract_text },
            impact_factor: 0.0,
        })
    }
}

/// Which text field the parser is currently collecting.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Pmid,
    Title,
    Journal,
    Year,
    Month,
    Day,
    MedlineDate,
    LastName,
    ForeName,
    Initials,
    Abstract,
    Descriptor,
}

/// Parse an efetch XML document (`<PubmedArticleSet>`) into articles.
///
/// Inline markup inside titles and abstracts (`<i>`, `<sup>`, ...) contributes
/// its text. Records without a PMID are skipped.
pub fn parse_pubmed_xml(xml: &str) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    let mut reader = Reader::from_str(xml);

    let mut path: Vec<String> = Vec::new();
    let mut current: Option<ArticleBuilder> = None;
    let mut author: Option<AuthorBuilder> = None;
    let mut field = Field::None;
    // Depth at which the current field element was opened.
    let mut field_depth = 0usize;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                path.push(name);
                let depth = path.len();

                if field != Field::None {
                    // Inline markup inside a text field; keep collecting.
                    buf.clear();
                    continue;
                }

                let parent = path.iter().rev().nth(1).map(String::as_str).unwrap_or("");
                match path[depth - 1].as_str() {
                    "PubmedArticle" => current = Some(ArticleBuilder::default()),
                    "Author" if parent == "AuthorList" => author = Some(AuthorBuilder::default()),
                    other => {
                        let next = match (parent, other) {
                            ("MedlineCitation", "PMID") => Field::Pmid,
                            ("Article", "ArticleTitle") => Field::Title,
                            ("Journal", "Title") => Field::Journal,
                            ("PubDate", "Year") => Field::Year,
                            ("PubDate", "Month") => Field::Month,
                            ("PubDate", "Day") => Field::Day,
                            ("PubDate", "MedlineDate") => Field::MedlineDate,
                            ("Author", "LastName") => Field::LastName,
                            ("Author", "ForeName") => Field::ForeName,
                            ("Author", "Initials") => Field::Initials,
                            ("Abstract", "AbstractText") => Field::Abstract,
                            ("MeshHeading", "DescriptorName") => Field::Descriptor,
                            _ => Field::None,
                        };
                        if next != Field::None && current.is_some() {
                            field = next;
                            field_depth = depth;
                            if let Some(article) = current.as_mut() {
                                match next {
                                    Field::Abstract => article.abstract_sections.push(String::new()),
                                    Field::Descriptor => article.mesh_terms.push(String::new()),
                                    _ => {}
                                }
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if field != Field::None {
                    let text = decode_text(e);
                    append_text(current.as_mut(), author.as_mut(), field, &text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if field != Field::None {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    append_text(current.as_mut(), author.as_mut(), field, &text);
                }
            }
            Ok(Event::End(_)) => {
                let depth = path.len();
                let name = path.pop().unwrap_or_default();

                if field != Field::None && depth == field_depth {
                    field = Field::None;
                    continue_after_field(current.as_mut());
                }

                match name.as_str() {
                    "Author" => {
                        if let (Some(a), Some(article)) = (author.take(), current.as_mut()) {
                            if let Some(display) = a.display_name() {
                                article.authors.push(display);
                            }
                        }
                    }
                    "PubmedArticle" => {
                        if let Some(builder) = current.take() {
                            match builder.build() {
                                Some(article) => articles.push(article),
                                None => warn!("Skipping PubMed record without PMID"),
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MedlitError::Xml(format!(
                    "PubMed XML error at position {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(articles)
}

fn decode_text(e: &BytesText) -> String {
    // PubMed occasionally uses entities quick-xml does not know; keep the raw text then.
    e.unescape()
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned())
}

fn append_text(article: Option<&mut ArticleBuilder>, author: Option<&mut AuthorBuilder>, field: Field, text: &str) {
    if let Some(a) = author {
        match field {
            Field::LastName => return a.last.push_str(text),
            Field::ForeName => return a.fore.push_str(text),
            Field::Initials => return a.initials.push_str(text),
            _ => {}
        }
    }
    let Some(article) = article else { return };
    match field {
        Field::Pmid => {
            // Only the first PMID of a citation counts.
            if article.pmid.is_none() {
                article.pmid = Some(String::new());
            }
            if let Some(p) = article.pmid.as_mut() {
                p.push_str(text.trim());
            }
        }
        Field::Title => article.title.push_str(text),
        Field::Journal => article.journal.push_str(text),
        Field::Year => article.year.push_str(text.trim()),
        Field::Month => article.month.push_str(text.trim()),
        Field::Day => article.day.push_str(text.trim()),
        Field::MedlineDate => article.medline_date.push_str(text),
        Field::Abstract => {
            if let Some(section) = article.abstract_sections.last_mut() {
                section.push_str(text);
            }
        }
        Field::Descriptor => {
            if let Some(term) = article.mesh_terms.last_mut() {
                term.push_str(text);
            }
        }
        _ => {}
    }
}

/// Tidies the value a field just closed on.
fn continue_after_field(article: Option<&mut ArticleBuilder>) {
    if let Some(article) = article {
        if let Some(term) = article.mesh_terms.last_mut() {
            *term = collapse_whitespace(term);
        }
        article.mesh_terms.retain(|t| !t.is_empty());
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn month_number(month: &str) -> Option<u32> {
    if let Ok(n) = month.parse::<u32>() {
        return Some(n);
    }
    const NAMES: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = month.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    NAMES
        .iter()
        .position(|abbr| lower.starts_with(abbr))
        .map(|i| i as u32 + 1)
}

/// `YYYY-MM-DD` from PubDate parts. Missing month/day default to January/1st.
/// Unparseable combinations are echoed back as `year-month-day`; without a year
/// the MedlineDate (e.g. "2023 Jan-Feb") is used, else "Unknown".
pub fn format_pub_date(year: &str, month: &str, day: &str, medline_date: &str) -> String {
    let year = year.trim();
    if year.is_empty() {
        let medline = collapse_whitespace(medline_date);
        return if medline.is_empty() { "Unknown".to_string() } else { medline };
    }

    let month = if month.trim().is_empty() { "Jan" } else { month.trim() };
    let day = if day.trim().is_empty() { "01" } else { day.trim() };

    let parsed = year.parse::<i32>().ok().and_then(|y| {
        let m = month_number(month)?;
        let d = day.parse::<u32>().unwrap_or(1);
        NaiveDate::from_ymd_opt(y, m, d)
    });

    match parsed {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => format!("{}-{}-{}", year, month, day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const XML: &str = r#"<?xml version="1.0"?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE">
      <PMID Version="1">38000001</PMID>
      <Article>
        <Journal>
          <JournalIssue>
            <PubDate><Year>2023</Year><Month>Mar</Month><Day>7</Day></PubDate>
          </JournalIssue>
          <Title>JAMA Ophthalmology</Title>
        </Journal>
        <ArticleTitle>Effect of <i>atropine</i> on myopia &amp; progression</ArticleTitle>
        <Abstract>
          <AbstractText Label="BACKGROUND">Myopia is common.</AbstractText>
          <AbstractText Label="RESULTS">Atropine slowed progression.</AbstractText>
        </Abstract>
        <AuthorList>
          <Author><LastName>Smith</LastName><ForeName>Jane</ForeName><Initials>J</Initials></Author>
          <Author><LastName>Lee</LastName><Initials>KH</Initials></Author>
          <Author><CollectiveName>Atropine Study Group</CollectiveName></Author>
        </AuthorList>
      </Article>
      <MeshHeadingList>
        <MeshHeading><DescriptorName UI="D009216" MajorTopicYN="Y">Myopia</DescriptorName></MeshHeading>
        <MeshHeading><DescriptorName UI="D001285">Atropine</DescriptorName><QualifierName>therapeutic use</QualifierName></MeshHeading>
      </MeshHeadingList>
      <CommentsCorrectionsList>
        <CommentsCorrections><PMID>11111111</PMID></CommentsCorrections>
      </CommentsCorrectionsList>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>38000002</PMID>
      <Article>
        <Journal>
          <JournalIssue><PubDate><MedlineDate>2022 Nov-Dec</MedlineDate></PubDate></JournalIssue>
          <Title>Cornea</Title>
        </Journal>
        <ArticleTitle>Corneal cross-linking outcomes</ArticleTitle>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_parse_full_record() {
        let articles = parse_pubmed_xml(XML).unwrap();
        assert_eq!(articles.len(), 2);

        let a = &articles[0];
        assert_eq!(a.pubmed_id, "38000001");
        assert_eq!(a.title, "Effect of atropine on myopia & progression");
        assert_eq!(a.journal, "JAMA Ophthalmology");
        assert_eq!(a.publication_date, "2023-03-07");
        assert_eq!(a.authors, vec!["Jane Smith", "KH Lee"]);
        assert_eq!(a.abstract_text, "Myopia is common.\nAtropine slowed progression.");
        assert_eq!(a.mesh_terms, vec!["Myopia", "Atropine"]);
        assert_eq!(a.url, "https://pubmed.ncbi.nlm.nih.gov/38000001/");
        assert_eq!(a.impact_factor, 0.0);
    }

    #[test]
    fn test_parse_sparse_record() {
        let articles = parse_pubmed_xml(XML).unwrap();
        let b = &articles[1];
        assert_eq!(b.publication_date, "2022 Nov-Dec");
        assert_eq!(b.abstract_text, NO_ABSTRACT);
        assert!(b.authors.is_empty());
        assert!(b.mesh_terms.is_empty());
    }

    #[test]
    fn test_empty_set() {
        assert!(parse_pubmed_xml("<PubmedArticleSet></PubmedArticleSet>").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let err = parse_pubmed_xml("<PubmedArticleSet><PubmedArticle></Oops>").unwrap_err();
        assert!(matches!(err, MedlitError::Xml(_)));
    }

    #[test]
    fn test_format_pub_date() {
        assert_eq!(format_pub_date("2021", "", "", ""), "2021-01-01");
        assert_eq!(format_pub_date("2021", "11", "", ""), "2021-11-01");
        assert_eq!(format_pub_date("2021", "September", "30", ""), "2021-09-30");
        assert_eq!(format_pub_date("2021", "Feb", "30", ""), "2021-Feb-30");
        assert_eq!(format_pub_date("", "", "", "2019 Spring"), "2019 Spring");
        assert_eq!(format_pub_date("", "", "", ""), "Unknown");
    }

    #[test]
    fn test_parse_esearch_json() {
        let body = r#"{"header":{},"esearchresult":{"count":"1234","retmax":"2","retstart":"0","idlist":["1","2"]}}"#;
        let result = parse_esearch_json(body).unwrap();
        assert_eq!(result.count, 1234);
        assert_eq!(result.ids, vec!["1", "2"]);
    }

    #[test]
    fn test_esearch_error_payload() {
        let err = parse_esearch_json(r#"{"error":"API rate limit exceeded"}"#).unwrap_err();
        assert!(matches!(err, MedlitError::UpstreamUnavailable(_)));
    }
}
