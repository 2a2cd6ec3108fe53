//! medlit-ranker: Journal impact rankings per clinical specialty.
//!
//! Live rankings are scraped from OOIR and held in a TTL cache. When a fetch
//! fails the service serves stale cache, then a built-in table, before
//! reporting an error.

pub mod cache;
pub mod estimate;
pub mod fallback;
pub mod ooir;
pub mod service;
pub mod specialties;

pub use cache::{Clock, ManualClock, RankingCache, SystemClock, DEFAULT_TTL};
pub use estimate::estimate_impact_factor;
pub use fallback::{fallback_rankings, has_fallback};
pub use ooir::{parse_rankings, OoirScraper, RankingSource, ScrapeError};
pub use service::{ImpactFactorIndex, RankingOrigin, RankingService, Rankings};
pub use specialties::{available_specialties, KNOWN_SPECIALTIES};
