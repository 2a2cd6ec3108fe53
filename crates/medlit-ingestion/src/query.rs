//! PubMed query composition.
//!
//! Everything here is pure: no I/O, and `today` is passed in by the caller.

use chrono::NaiveDate;
use medlit_common::{MedlitError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

const EARLIEST_DATE: (i32, u32, u32) = (1900, 1, 1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Relevance,
    Date,
}

impl SortOrder {
    /// Lenient parse: anything other than "date" (case-insensitive) is relevance.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("date") | Some("pub_date") => SortOrder::Date,
            _ => SortOrder::Relevance,
        }
    }

    /// Value of the esearch `sort` parameter.
    pub fn esearch_key(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Date => "pub_date",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Parse optional `YYYY-MM-DD` / `YYYY/MM/DD` bounds. Blank strings count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: parse_optional_date(start)?,
            end: parse_optional_date(end)?,
        })
    }
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_date(v).map(Some),
        None => Ok(None),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .map_err(|_| MedlitError::InvalidInput(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

/// Parameters of an interactive search, after clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: String,
    pub journals: Vec<String>,
    pub mesh_terms: Vec<String>,
    pub date_range: DateRange,
    pub page: u32,
    pub per_page: u32,
    pub sort: SortOrder,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            journals: Vec::new(),
            mesh_terms: Vec::new(),
            date_range: DateRange::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            sort: SortOrder::Relevance,
        }
    }

    pub fn journals(mut self, journals: Vec<String>) -> Self {
        self.journals = journals;
        self
    }

    pub fn mesh_terms(mut self, terms: Vec<String>) -> Self {
        self.mesh_terms = terms;
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Set the page window; `page` is clamped to ≥ 1 and `per_page` to 1..=100.
    pub fn paginate(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.clamp(1, u32::MAX as i64) as u32;
        self.per_page = per_page.clamp(1, MAX_PER_PAGE as i64) as u32;
        self
    }

    pub fn retstart(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }
}

/// Strip double quotes so a value can sit inside a quoted PubMed phrase.
fn clean_phrase(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}

fn or_group(values: &[String], tag: &str) -> Option<String> {
    let parts: Vec<String> = values
        .iter()
        .map(|v| clean_phrase(v))
        .filter(|v| !v.is_empty())
        .map(|v| format!("\"{}\"[{}]", v, tag))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(format!("({})", parts.join(" OR ")))
    }
}

fn date_clause(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "(\"{}\"[Date - Publication] : \"{}\"[Date - Publication])",
        start.format("%Y/%m/%d"),
        end.format("%Y/%m/%d")
    )
}

/// Build the esearch term for an interactive search.
///
/// Fails with `EmptyQuery` when both the query text and the MeSH terms are
/// blank; journals alone are not a query.
pub fn compose_query(
    query: &str,
    journals: &[String],
    mesh_terms: &[String],
    range: &DateRange,
    today: NaiveDate,
) -> Result<String> {
    let query = query.trim();
    let mesh_part = or_group(mesh_terms, "MeSH Major Topic");

    if query.is_empty() && mesh_part.is_none() {
        return Err(MedlitError::EmptyQuery);
    }

    let mut parts = Vec::new();
    if !query.is_empty() {
        parts.push(format!("({})", query));
    }
    if !range.is_empty() {
        let (y, m, d) = EARLIEST_DATE;
        let start = range.start.or_else(|| NaiveDate::from_ymd_opt(y, m, d)).unwrap_or(today);
        let end = range.end.unwrap_or(today);
        parts.push(date_clause(start, end));
    }
    if let Some(journal_part) = or_group(journals, "Journal") {
        parts.push(journal_part);
    }
    if let Some(mesh_part) = mesh_part {
        parts.push(mesh_part);
    }

    Ok(parts.join(" AND "))
}

/// Term for one journal within a publication-date window.
pub fn journal_window_query(journal: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "(\"{}\"[Journal]) AND ({})",
        clean_phrase(journal),
        date_clause(start, end)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_query_only() {
        let q = compose_query("diabetes", &[], &[], &DateRange::default(), today()).unwrap();
        assert_eq!(q, "(diabetes)");
    }

    #[test]
    fn test_all_parts() {
        let range = DateRange::parse(Some("2020-01-01"), Some("2020/12/31")).unwrap();
        let q = compose_query(
            "  glaucoma ",
            &s(&["Ophthalmology", "JAMA \"Ophthalmology\""]),
            &s(&["Education, Medical", ""]),
            &range,
            today(),
        )
        .unwrap();
        assert_eq!(
            q,
            "(glaucoma) AND (\"2020/01/01\"[Date - Publication] : \"2020/12/31\"[Date - Publication]) \
             AND (\"Ophthalmology\"[Journal] OR \"JAMA Ophthalmology\"[Journal]) \
             AND (\"Education, Medical\"[MeSH Major Topic])"
        );
    }

    #[test]
    fn test_open_ended_ranges() {
        let start_only = DateRange::parse(Some("2023-05-01"), None).unwrap();
        let q = compose_query("x", &[], &[], &start_only, today()).unwrap();
        assert!(q.ends_with("(\"2023/05/01\"[Date - Publication] : \"2024/06/30\"[Date - Publication])"));

        let end_only = DateRange::parse(Some(""), Some("2010-02-03")).unwrap();
        let q = compose_query("x", &[], &[], &end_only, today()).unwrap();
        assert!(q.contains("\"1900/01/01\"[Date - Publication] : \"2010/02/03\""));
    }

    #[test]
    fn test_mesh_only_is_a_query() {
        let q = compose_query("", &[], &s(&["Simulation Training"]), &DateRange::default(), today()).unwrap();
        assert_eq!(q, "(\"Simulation Training\"[MeSH Major Topic])");
    }

    #[test]
    fn test_empty_query() {
        let err = compose_query("  ", &s(&["Lancet"]), &s(&[" "]), &DateRange::default(), today()).unwrap_err();
        assert!(matches!(err, MedlitError::EmptyQuery));
    }

    #[test]
    fn test_invalid_date() {
        assert!(matches!(parse_date("30-06-2024"), Err(MedlitError::InvalidInput(_))));
    }

    #[test]
    fn test_pagination_clamping() {
        let p = SearchParams::new("x").paginate(0, 500);
        assert_eq!((p.page, p.per_page), (1, 100));
        let p = SearchParams::new("x").paginate(3, 0);
        assert_eq!((p.page, p.per_page, p.retstart()), (3, 1, 2));
        let p = SearchParams::new("x").paginate(2, 25);
        assert_eq!(p.retstart(), 25);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(SortOrder::parse(Some("DATE")), SortOrder::Date);
        assert_eq!(SortOrder::parse(Some("whatever")), SortOrder::Relevance);
        assert_eq!(SortOrder::parse(None).esearch_key(), "relevance");
        assert_eq!(SortOrder::Date.esearch_key(), "pub_date");
    }

    #[test]
    fn test_journal_window_query() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            journal_window_query("Cornea", start, end),
            "(\"Cornea\"[Journal]) AND ((\"2024/01/01\"[Date - Publication] : \"2024/03/31\"[Date - Publication]))"
        );
    }
}
