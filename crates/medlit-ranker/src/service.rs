//! Ranking lookups with cache, stale-cache and built-in fallbacks.

use crate::cache::RankingCache;
use crate::estimate::estimate_impact_factor;
use crate::fallback::fallback_rankings;
use crate::ooir::{RankingSource, ScrapeError};
use crate::specialties::available_specialties;
use medlit_common::{normalize_specialty, JournalRanking, MedlitError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Where a ranking list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOrigin {
    Live,
    Cache,
    StaleCache,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Rankings {
    pub specialty: String,
    pub rankings: Vec<JournalRanking>,
    pub origin: RankingOrigin,
}

impl Rankings {
    /// Human-readable note for degraded results, `None` for live or cached data.
    pub fn message(&self) -> Option<String> {
        match self.origin {
            RankingOrigin::Live | RankingOrigin::Cache => None,
            RankingOrigin::StaleCache => Some(format!(
                "Live rankings for {} are unavailable; showing previously fetched data",
                self.specialty
            )),
            RankingOrigin::Fallback => Some(format!(
                "Live rankings for {} are unavailable; showing built-in reference data",
                self.specialty
            )),
        }
    }

    /// The first `limit` journal names.
    pub fn top_journals(&self, limit: usize) -> Vec<String> {
        self.rankings.iter().take(limit).map(|r| r.journal_name.clone()).collect()
    }
}

#[derive(Clone)]
pub struct RankingService {
    source: Arc<dyn RankingSource>,
    cache: Arc<RankingCache>,
}

impl RankingService {
    pub fn new(source: Arc<dyn RankingSource>, cache: Arc<RankingCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &Arc<RankingCache> {
        &self.cache
    }

    #[instrument(skip(self))]
    pub async fn get_rankings(&self, specialty: &str, force_refresh: bool) -> Result<Rankings> {
        let specialty = normalize_specialty(specialty);
        if specialty.is_empty() {
            return Err(MedlitError::InvalidInput("Specialty must not be empty".to_string()));
        }

        if !force_refresh {
            if let Some(rankings) = self.cache.get_fresh(&specialty).await {
                return Ok(Rankings { specialty, rankings, origin: RankingOrigin::Cache });
            }
        }

        let ticket = self.cache.begin_refresh();
        let result = match self.source.fetch_rankings(&specialty).await {
            Ok(list) if list.is_empty() => Err(ScrapeError::NoRankings(specialty.clone())),
            other => other,
        };

        match result {
            Ok(rankings) => {
                self.cache.store(&specialty, rankings.clone(), ticket).await;
                Ok(Rankings { specialty, rankings, origin: RankingOrigin::Live })
            }
            Err(err) => {
                warn!(%specialty, error = %err, "Live ranking fetch failed");
                self.degrade(specialty, err).await
            }
        }
    }

    async fn degrade(&self, specialty: String, err: ScrapeError) -> Result<Rankings> {
        if let Some(stale) = self.cache.lookup(&specialty).await {
            info!(%specialty, age_secs = stale.age.as_secs(), "Serving cached rankings after failed refresh");
            return Ok(Rankings {
                specialty,
                rankings: stale.rankings,
                origin: RankingOrigin::StaleCache,
            });
        }
        if let Some(rankings) = fallback_rankings(&specialty) {
            info!(%specialty, "Serving built-in rankings");
            return Ok(Rankings { specialty, rankings, origin: RankingOrigin::Fallback });
        }
        Err(err.into())
    }

    pub async fn available_specialties(&self) -> Vec<String> {
        available_specialties(self.cache.cached_specialties().await)
    }
}

/// Case-insensitive journal → impact factor lookup built from a ranking list,
/// estimating journals the list does not cover.
#[derive(Debug, Clone, Default)]
pub struct ImpactFactorIndex {
    specialty: String,
    by_name: HashMap<String, f64>,
}

impl ImpactFactorIndex {
    pub fn new(specialty: &str, rankings: &[JournalRanking]) -> Self {
        Self {
            specialty: specialty.to_string(),
            by_name: rankings
                .iter()
                .map(|r| (r.journal_name.trim().to_lowercase(), r.impact_factor))
                .collect(),
        }
    }

    pub fn impact_factor(&self, journal: &str) -> f64 {
        self.by_name
            .get(&journal.trim().to_lowercase())
            .copied()
            .unwrap_or_else(|| estimate_impact_factor(&self.specialty, journal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medlit_common::rank_journals;

    #[test]
    fn test_index_prefers_ranked_value() {
        let rankings = rank_journals("Ophthalmology", vec![("Eye", 3.1), ("Cornea", 2.6)]);
        let index = ImpactFactorIndex::new("Ophthalmology", &rankings);
        assert_eq!(index.impact_factor("EYE"), 3.1);
        assert_eq!(index.impact_factor("JAMA Ophthalmology"), 7.9);
    }

    #[test]
    fn test_message_only_for_degraded_origins() {
        let mut r = Rankings {
            specialty: "Allergy".into(),
            rankings: vec![],
            origin: RankingOrigin::Live,
        };
        assert!(r.message().is_none());
        r.origin = RankingOrigin::Fallback;
        assert!(r.message().unwrap().contains("Allergy"));
    }
}
