//! Monitor events

use crate::signal::{SignalKind, TradingSignal};

/// Notifications published by [`TokenMonitor`](super::TokenMonitor)
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Run flag switched on
    Started,
    /// Run flag switched off and all timers cancelled
    Stopped,
    /// A cycle produced a BUY
    BuySignal(TradingSignal),
    /// A cycle produced a SELL
    SellSignal(TradingSignal),
}

impl MonitorEvent {
    /// Wrap an actionable signal; HOLD produces no event
    pub fn from_signal(signal: TradingSignal) -> Option<Self> {
        match signal.kind {
            SignalKind::Buy => Some(MonitorEvent::BuySignal(signal)),
            SignalKind::Sell => Some(MonitorEvent::SellSignal(signal)),
            SignalKind::Hold => None,
        }
    }

    /// Event name
    pub fn name(&self) -> &'static str {
        match self {
            MonitorEvent::Started => "started",
            MonitorEvent::Stopped => "stopped",
            MonitorEvent::BuySignal(_) => "buySignal",
            MonitorEvent::SellSignal(_) => "sellSignal",
        }
    }

    /// Signal payload, if any
    pub fn signal(&self) -> Option<&TradingSignal> {
        match self {
            MonitorEvent::BuySignal(signal) | MonitorEvent::SellSignal(signal) => Some(signal),
            MonitorEvent::Started | MonitorEvent::Stopped => None,
        }
    }
}
