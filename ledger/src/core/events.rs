use std::sync::{Arc, Mutex};

use log::info;
use spkz_common::event::LedgerEvent;

/// Receives events of committed calls, in commit order.
pub trait EventSink {
    fn emit(&mut self, event: LedgerEvent);
}

/// In-memory event log.
///
/// Clones share the same underlying list so a caller can keep a handle while
/// the ledger owns the sink.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<LedgerEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: LedgerEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Writes each notification through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: LedgerEvent) {
        info!("notify {}", event.to_notification());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spkz_common::config::DEPLOYER;

    #[test]
    fn test_clones_share_events() {
        let log = EventLog::new();
        let mut sink = log.clone();
        sink.emit(LedgerEvent::Transfer {
            from: None,
            to: DEPLOYER,
            amount: 1,
        });
        LogSink.emit(LedgerEvent::Transfer {
            from: Some(DEPLOYER),
            to: DEPLOYER,
            amount: 1,
        });
        assert_eq!(log.len(), 1);
    }
}
