use crate::ai::{rank_listings, SuitabilityRanker, MIN_SUITABILITY_SCORE};
use crate::error::Result;
use crate::models::{Listing, RankedListing, SuitabilityResult};
use tracing::{debug, info, warn};

/// Narrowing applied to the land list before analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandFilter {
    pub soil_type: Option<String>,
    pub water_source: Option<bool>,
    pub location: Option<String>,
}

impl LandFilter {
    pub fn is_empty(&self) -> bool {
        self == &LandFilter::default()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(soil) = &self.soil_type {
            let listing_soil = listing.soil_type.as_deref().unwrap_or_default();
            if !listing_soil.eq_ignore_ascii_case(soil) {
                return false;
            }
        }
        if let Some(water) = self.water_source {
            if listing.water_source != Some(water) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            if !listing.location.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Snapshot of what was submitted for one analysis
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub query: String,
    pub listings: Vec<Listing>,
    epoch: u64,
}

/// Rent-land screen state: filters, query and the current ranking.
///
/// Results only describe the listing set they were computed for, so any
/// filter or query change clears them and bumps the epoch. A reply for an
/// older epoch is dropped; among replies for the same epoch the last applied
/// wins.
#[derive(Debug, Clone)]
pub struct LandSearch {
    listings: Vec<Listing>,
    filter: LandFilter,
    query: String,
    results: Option<Vec<SuitabilityResult>>,
    notice: Option<String>,
    epoch: u64,
}

impl LandSearch {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: listings.into_iter().filter(Listing::is_land).collect(),
            filter: LandFilter::default(),
            query: String::new(),
            results: None,
            notice: None,
            epoch: 0,
        }
    }

    pub fn visible(&self) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| self.filter.matches(l))
            .collect()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> &LandFilter {
        &self.filter
    }

    pub fn results(&self) -> Option<&[SuitabilityResult]> {
        self.results.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.invalidate();
        }
    }

    pub fn set_filter(&mut self, filter: LandFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.invalidate();
        }
    }

    pub fn reset_filters(&mut self) {
        self.filter = LandFilter::default();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        if self.results.take().is_some() {
            debug!("Cleared stale suitability results");
        }
        self.epoch += 1;
    }

    /// Snapshot the visible listings for analysis; `None` for a blank query
    pub fn begin_analysis(&self) -> Option<AnalysisRequest> {
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }
        Some(AnalysisRequest {
            query: query.to_string(),
            listings: self.visible().into_iter().cloned().collect(),
            epoch: self.epoch,
        })
    }

    /// Apply an analysis outcome. Returns whether the results changed.
    /// A failure sets the notice and keeps the previous results.
    pub fn finish_analysis(
        &mut self,
        request: AnalysisRequest,
        outcome: Result<Vec<SuitabilityResult>>,
    ) -> bool {
        if request.epoch != self.epoch {
            debug!(
                request_epoch = request.epoch,
                current_epoch = self.epoch,
                "Dropping analysis for outdated filters"
            );
            return false;
        }

        match outcome {
            Ok(results) => {
                info!(
                    query = %request.query,
                    results = results.len(),
                    "Applied suitability results"
                );
                self.results = Some(results);
                self.notice = None;
                true
            }
            Err(e) => {
                warn!(error = %e, "Suitability analysis failed");
                self.notice = Some(e.notice().to_string());
                false
            }
        }
    }

    /// Run one analysis round trip for the current query
    pub async fn analyze(&mut self, ranker: &SuitabilityRanker) -> bool {
        let Some(request) = self.begin_analysis() else {
            return false;
        };
        let outcome = ranker.rank(&request.query, &request.listings).await;
        self.finish_analysis(request, outcome)
    }

    /// Ranked cards for the current results, or `None` before any analysis
    pub fn enriched(&self) -> Option<Vec<RankedListing>> {
        let results = self.results.as_ref()?;
        let visible: Vec<Listing> = self.visible().into_iter().cloned().collect();
        Some(rank_listings(&visible, results, MIN_SUITABILITY_SCORE))
    }
}
