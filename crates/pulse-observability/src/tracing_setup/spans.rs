//! Span definitions per operation: analysis, confidence update, cache, recommendation.

/// Span around a batch analysis run.
#[macro_export]
macro_rules! analysis_span {
    ($outcome_count:expr) => {
        tracing::info_span!("pulse.analysis", outcome_count = $outcome_count)
    };
}

/// Span around recording one outcome and updating matching patterns.
#[macro_export]
macro_rules! update_span {
    ($client_id:expr) => {
        tracing::info_span!("pulse.update", client_id = %$client_id)
    };
}

/// Span around a cache operation.
#[macro_export]
macro_rules! cache_span {
    ($operation:expr) => {
        tracing::debug_span!("pulse.cache", operation = %$operation)
    };
}

/// Span around a recommendation refresh for one client.
#[macro_export]
macro_rules! recommend_span {
    ($client_id:expr) => {
        tracing::debug_span!("pulse.recommend", client_id = %$client_id)
    };
}

