// Duplicate-Content Check
// Exact-phrase web search for sentences long enough to be distinctive

use crate::models::{round1, DuplicateMatch};
use crate::services::config_store::RiskConfig;
use crate::services::text_processor::split_sentences;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::scoring::{guarded, ExactSearch};

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateReport {
    /// Number of sentences that were long enough to search.
    pub checked: usize,
    pub matched: Vec<DuplicateMatch>,
    /// Share of checked sentences with a match, 0-100.
    pub duplicate_percentage: f64,
}

pub struct DuplicateChecker {
    search: Arc<dyn ExactSearch>,
    min_chars: usize,
    timeout_secs: u64,
    max_concurrency: usize,
}

impl DuplicateChecker {
    pub fn new(search: Arc<dyn ExactSearch>, config: &RiskConfig) -> Self {
        Self {
            search,
            min_chars: config.duplicate_min_chars,
            timeout_secs: config.call_timeout_secs,
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    pub async fn check(&self, content: &str) -> DuplicateReport {
        let candidates: Vec<(usize, String)> = split_sentences(content)
            .into_iter()
            .filter(|s| s.chars().count() >= self.min_chars)
            .enumerate()
            .collect();
        let checked = candidates.len();

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut join_set = JoinSet::new();
        for (idx, sentence) in candidates {
            let search = self.search.clone();
            let semaphore = semaphore.clone();
            let timeout_secs = self.timeout_secs;
            join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return (idx, sentence, None);
                };
                let hit = match guarded(timeout_secs, search.search_exact(&sentence)).await {
                    Ok(hit) => hit,
                    Err(e) => {
                        warn!("[DUPLICATE] Search unavailable for sentence {}: {}", idx, e);
                        None
                    }
                };
                (idx, sentence, hit)
            });
        }

        let mut found: Vec<(usize, DuplicateMatch)> = Vec::new();
        while let Some(res) = join_set.join_next().await {
            match res {
                Ok((idx, sentence, Some(hit))) => found.push((
                    idx,
                    DuplicateMatch {
                        sentence,
                        url: hit.url,
                        title: hit.title,
                    },
                )),
                Ok(_) => {}
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => warn!("[DUPLICATE] Search task cancelled: {}", e),
            }
        }
        found.sort_by_key(|(idx, _)| *idx);

        let matched: Vec<DuplicateMatch> = found.into_iter().map(|(_, m)| m).collect();
        let duplicate_percentage = if checked == 0 {
            0.0
        } else {
            round1(matched.len() as f64 / checked as f64 * 100.0)
        };
        info!(
            "[DUPLICATE] checked={} matched={} ({:.1}%)",
            checked,
            matched.len(),
            duplicate_percentage
        );

        DuplicateReport {
            checked,
            matched,
            duplicate_percentage,
        }
    }
}
