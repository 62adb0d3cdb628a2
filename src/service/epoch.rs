//! Per-stream request epochs
//!
//! Every request takes the next epoch for its stream. A response is only
//! delivered if its epoch is still the newest when it is ready, so a slow
//! earlier request can never overwrite a faster later one.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::types::DataStream;

#[derive(Debug, Default)]
pub struct StreamEpochs {
    latest: [AtomicU64; DataStream::ALL.len()],
}

impl StreamEpochs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request on `stream`, superseding all earlier ones
    pub fn issue(&self, stream: DataStream) -> u64 {
        self.latest[stream.index()].fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, stream: DataStream, epoch: u64) -> bool {
        self.latest[stream.index()].load(Ordering::SeqCst) == epoch
    }

    pub fn latest(&self, stream: DataStream) -> u64 {
        self.latest[stream.index()].load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_epoch_supersedes() {
        let epochs = StreamEpochs::new();
        let first = epochs.issue(DataStream::Kpi);
        assert!(epochs.is_current(DataStream::Kpi, first));

        let second = epochs.issue(DataStream::Kpi);
        assert!(!epochs.is_current(DataStream::Kpi, first));
        assert!(epochs.is_current(DataStream::Kpi, second));
    }

    #[test]
    fn test_streams_are_independent() {
        let epochs = StreamEpochs::new();
        let kpi = epochs.issue(DataStream::Kpi);
        epochs.issue(DataStream::Risk);
        epochs.issue(DataStream::Risk);
        assert!(epochs.is_current(DataStream::Kpi, kpi));
        assert_eq!(epochs.latest(DataStream::Risk), 2);
        assert_eq!(epochs.latest(DataStream::Budget), 0);
    }
}
