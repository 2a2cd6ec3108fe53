//! MEDLINE tagged format (`.nbib`), as read by reference managers.

use chrono::NaiveDate;
use medlit_common::Article;

const LINE_WIDTH: usize = 80;
const CONTINUATION: &str = "      ";

/// Append `TAG - value`, folding newlines and wrapping long values onto
/// six-space continuation lines.
fn push_field(out: &mut String, tag: &str, value: &str) {
    let words: Vec<&str> = value.split_whitespace().collect();
    if words.is_empty() {
        return;
    }

    let mut line = format!("{:<4}- ", tag);
    let mut line_has_word = false;
    for word in words {
        if line_has_word && line.len() + 1 + word.len() > LINE_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line = CONTINUATION.to_string();
            line_has_word = false;
        }
        if line_has_word {
            line.push(' ');
        }
        line.push_str(word);
        line_has_word = true;
    }
    out.push_str(&line);
    out.push('\n');
}

/// "Jane Smith" → ("Smith, Jane", "Smith J"); a single word is used as-is.
fn author_names(display: &str) -> (String, String) {
    let display = display.trim();
    match display.rsplit_once(' ') {
        Some((fore, last)) => {
            let initials: String = fore
                .split(|c: char| c.is_whitespace() || c == '-')
                .filter_map(|w| w.chars().next())
                .filter(|c| c.is_alphabetic())
                .flat_map(char::to_uppercase)
                .collect();
            let short = if initials.is_empty() {
                last.to_string()
            } else {
                format!("{} {}", last, initials)
            };
            (format!("{}, {}", last, fore.trim()), short)
        }
        None => (display.to_string(), display.to_string()),
    }
}

/// `2023-03-07` → `2023 Mar 07`; anything else passes through.
fn date_published(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%Y %b %d").to_string())
        .unwrap_or_else(|_| date.to_string())
}

pub fn to_nbib(article: &Article) -> String {
    let mut out = String::new();
    push_field(&mut out, "PMID", &article.pubmed_id);
    push_field(&mut out, "TI", &article.title);
    if article.has_abstract() {
        push_field(&mut out, "AB", &article.abstract_text);
    }
    for author in &article.authors {
        let (full, short) = author_names(author);
        push_field(&mut out, "FAU", &full);
        push_field(&mut out, "AU", &short);
    }
    push_field(&mut out, "JT", &article.journal);
    push_field(&mut out, "DP", &date_published(&article.publication_date));
    for term in &article.mesh_terms {
        push_field(&mut out, "MH", term);
    }
    push_field(&mut out, "LID", &format!("{} [pmid]", article.pubmed_id));
    out
}
