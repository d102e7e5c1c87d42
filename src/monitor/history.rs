//! Bounded per-token signal history

use crate::signal::TradingSignal;
use std::collections::VecDeque;

/// Default number of signals kept per token
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// FIFO of the most recent signals for one token, oldest first
#[derive(Debug, Clone)]
pub struct SignalHistory {
    signals: VecDeque<TradingSignal>,
    limit: usize,
}

impl SignalHistory {
    /// Create an empty history holding at most `limit` signals (minimum 1)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            signals: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            limit,
        }
    }

    /// Append a signal, evicting the oldest once over the limit
    pub fn push(&mut self, signal: TradingSignal) {
        self.signals.push_back(signal);
        while self.signals.len() > self.limit {
            self.signals.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Most recent signal
    pub fn latest(&self) -> Option<&TradingSignal> {
        self.signals.back()
    }

    /// Snapshot, oldest first
    pub fn to_vec(&self) -> Vec<TradingSignal> {
        self.signals.iter().cloned().collect()
    }
}

impl Default for SignalHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
