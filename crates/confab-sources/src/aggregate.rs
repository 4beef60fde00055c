//! Concurrent multi-source aggregation.
//!
//! One tokio task per source runs the fetch + normalize pipeline and owns
//! its own accumulation; nothing is shared between tasks. The handles are
//! awaited in configuration order, so the concatenated collection is
//! deterministic and the stable sort keeps arrival order for equal start
//! times.

use confab_core::config::SourceRef;
use confab_core::EventRecord;

use crate::client::SourceClient;
use crate::error::SourceError;
use crate::normalize::normalize_entry;

/// A source that contributed zero events, with the reason.
#[derive(Debug, Clone)]
pub struct FailedSource {
    pub source: String,
    pub error: String,
}

/// Everything one aggregation run produced.
///
/// Partial failure is data, not an error: callers decide that an entirely
/// empty run is fatal.
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    /// Merged collection, sorted ascending by `start_at`
    pub events: Vec<EventRecord>,
    /// Sources whose fetch exhausted its retry budget or otherwise failed
    pub failed_sources: Vec<FailedSource>,
    /// Records dropped by the normalizer (missing/invalid start timestamp)
    pub dropped_records: usize,
}

impl AggregateOutcome {
    /// True when no source produced any event.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Fetch and normalize every configured source concurrently, then merge.
pub async fn aggregate(client: &SourceClient, sources: &[SourceRef]) -> AggregateOutcome {
    let mut handles = Vec::with_capacity(sources.len());

    for source in sources {
        let client = client.clone();
        let source = source.clone();
        let label = source.label().to_string();

        let handle = tokio::spawn(async move {
            let raw = client.fetch_source(&source).await?;
            let fetched = raw.len();
            let events: Vec<EventRecord> = raw
                .iter()
                .filter_map(|entry| normalize_entry(entry, &source))
                .collect();
            Ok::<_, SourceError>((events, fetched))
        });

        handles.push((label, handle));
    }

    let mut outcome = AggregateOutcome::default();

    // Join barrier: every task finishes (or definitively fails) before the
    // merge; awaiting in spawn order keeps concatenation deterministic.
    for (label, handle) in handles {
        match handle.await {
            Ok(Ok((events, fetched))) => {
                outcome.dropped_records += fetched - events.len();
                tracing::info!(source = %label, events = events.len(), "Source collected");
                outcome.events.extend(events);
            }
            Ok(Err(error)) => {
                tracing::warn!(source = %label, error = %error, "Source failed; continuing without it");
                outcome.failed_sources.push(FailedSource {
                    source: label,
                    error: error.to_string(),
                });
            }
            Err(join_error) => {
                tracing::warn!(source = %label, error = %join_error, "Source task aborted");
                outcome.failed_sources.push(FailedSource {
                    source: label,
                    error: join_error.to_string(),
                });
            }
        }
    }

    // Stable: equal timestamps keep their arrival order.
    outcome.events.sort_by_key(|event| event.start_at);

    outcome
}
