//! Table definitions and seed data.

pub const TABLE_MESH_TERMS: &str = "mesh_terms";
pub const TABLE_BOOKMARKS: &str = "bookmarks";
pub const TABLE_SEARCH_HISTORY: &str = "search_history";

/// DDL applied by [`crate::Database::initialize`]. Every statement is idempotent.
pub(crate) const MIGRATIONS: &[&str] = &[
    // term_key holds the trimmed, lowercased term; the UNIQUE constraint is
    // what makes concurrent duplicate adds fail cleanly.
    "CREATE TABLE IF NOT EXISTS mesh_terms (
        id         TEXT PRIMARY KEY,
        term       TEXT NOT NULL,
        term_key   TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS bookmarks (
        pmid      TEXT PRIMARY KEY,
        title     TEXT NOT NULL DEFAULT '',
        authors   TEXT NOT NULL DEFAULT '',
        journal   TEXT NOT NULL DEFAULT '',
        pub_date  TEXT NOT NULL DEFAULT '',
        abstract  TEXT NOT NULL DEFAULT '',
        timestamp TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS config (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS search_history (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        query        TEXT NOT NULL,
        result_count INTEGER NOT NULL,
        timestamp    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS preferences (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
];

/// Medical-education MeSH headings seeded into an empty term table.
pub const DEFAULT_MESH_TERMS: &[&str] = &[
    "Education, Medical",
    "Education, Medical, Graduate",
    "Education, Medical, Undergraduate",
    "Education, Medical, Continuing",
    "Internship and Residency",
    "Clinical Competence",
    "Curriculum",
    "Competency-Based Education",
    "Teaching",
    "Educational Measurement",
    "Schools, Medical",
    "Simulation Training",
    "Patient Simulation",
    "Problem-Based Learning",
    "Teaching Materials",
    "Faculty, Medical",
    "Mentors",
    "Educational Technology",
    "Program Development",
    "Program Evaluation",
    "Certification",
    "Attitude of Health Personnel",
    "Specialty Boards",
    "Fellowships and Scholarships",
];

/// Normalised uniqueness key for a MeSH term.
pub fn term_key(term: &str) -> String {
    term.trim().to_lowercase()
}
