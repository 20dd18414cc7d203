//! Debouncer
//!
//! Timer-agnostic: each `push` returns a ticket, the caller sleeps for the
//! debounce window and then calls `take`. Only the latest ticket yields the
//! value, so a burst of input produces exactly one delivery.

#[derive(Debug, Clone, Default)]
pub struct Debouncer<V> {
    latest: u64,
    pending: Option<V>,
}

impl<V> Debouncer<V> {
    pub fn new() -> Self {
        Self {
            latest: 0,
            pending: None,
        }
    }

    pub fn push(&mut self, value: V) -> u64 {
        self.latest += 1;
        self.pending = Some(value);
        self.latest
    }

    /// Value for `ticket` if no newer push happened since.
    pub fn take(&mut self, ticket: u64) -> Option<V> {
        if ticket == self.latest {
            self.pending.take()
        } else {
            None
        }
    }

    /// Drop the pending value (unmount, explicit clear).
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_delivers_last_value_once() {
        let mut debouncer = Debouncer::new();
        let tickets: Vec<u64> = ["a", "ac", "acm", "acme"]
            .iter()
            .map(|v| debouncer.push(v.to_string()))
            .collect();

        let delivered: Vec<String> = tickets
            .iter()
            .filter_map(|t| debouncer.take(*t))
            .collect();
        assert_eq!(delivered, vec!["acme".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_ticket_fires_once() {
        let mut debouncer = Debouncer::new();
        let t = debouncer.push(1);
        assert_eq!(debouncer.take(t), Some(1));
        assert_eq!(debouncer.take(t), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::new();
        let t = debouncer.push("x");
        debouncer.cancel();
        assert_eq!(debouncer.take(t), None);
    }
}
