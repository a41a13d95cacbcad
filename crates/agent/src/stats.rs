//! Latency and throughput statistics for streamed responses.
//!
//! Token counts are an approximation: whitespace-delimited words over the
//! concatenated stream. A word split across two fragments counts once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use steward_config::StatsScope;

/// Frozen statistics for one completed inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub token_count: usize,
    pub elapsed_seconds: f64,
    pub throughput: f64,
}

impl Stats {
    pub fn new(token_count: usize, elapsed_seconds: f64) -> Self {
        let throughput = if elapsed_seconds > 0.0 {
            token_count as f64 / elapsed_seconds
        } else {
            0.0
        };
        Self {
            token_count,
            elapsed_seconds,
            throughput,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tokens: {}, Time: {:.2}s, TPS: {:.2}",
            self.token_count, self.elapsed_seconds, self.throughput
        )
    }
}

/// Accumulates word counts and timing while a response streams in.
///
/// With [`StatsScope::PerInference`] every [`begin`](Self::begin) starts
/// from zero. With [`StatsScope::Session`] the clock and the count carry
/// over until [`reset`](Self::reset).
#[derive(Debug)]
pub struct StatsCalculator {
    scope: StatsScope,
    started_at: Option<Instant>,
    token_count: usize,
    in_word: bool,
}

impl StatsCalculator {
    pub fn new(scope: StatsScope) -> Self {
        Self {
            scope,
            started_at: None,
            token_count: 0,
            in_word: false,
        }
    }

    pub fn scope(&self) -> StatsScope {
        self.scope
    }

    /// Mark the start of a new inference call.
    pub fn begin(&mut self) {
        if self.scope == StatsScope::PerInference {
            self.started_at = None;
            self.token_count = 0;
        }
        // Words never join across separate responses.
        self.in_word = false;
    }

    /// Forget everything, including session totals.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.token_count = 0;
        self.in_word = false;
    }

    pub fn observe(&mut self, fragment: &str) {
        self.observe_at(fragment, Instant::now());
    }

    /// Record a fragment received at `now`. The clock starts at the first
    /// non-empty fragment.
    pub fn observe_at(&mut self, fragment: &str, now: Instant) {
        if fragment.is_empty() {
            return;
        }
        self.started_at.get_or_insert(now);

        for c in fragment.chars() {
            if c.is_whitespace() {
                self.in_word = false;
            } else if !self.in_word {
                self.in_word = true;
                self.token_count += 1;
            }
        }
    }

    pub fn finish(&self) -> Stats {
        self.finish_at(Instant::now())
    }

    /// Snapshot the statistics as of `now`.
    pub fn finish_at(&self, now: Instant) -> Stats {
        let elapsed = self
            .started_at
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0);
        Stats::new(self.token_count, elapsed)
    }
}
