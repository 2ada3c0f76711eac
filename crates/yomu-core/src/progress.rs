use kanal::{AsyncReceiver, AsyncSender};

use yomu_types::ProgressEvent;

/// Push half of the status channel.
///
/// Emission is fire-and-forget: a closed or full channel (popup not open,
/// listener lagging) drops the event. The current state is always
/// recoverable through `Processor::state`, so nothing is queued or retried.
#[derive(Clone)]
pub struct ProgressSender {
    tx: AsyncSender<ProgressEvent>,
}

impl ProgressSender {
    pub fn emit(&self, event: ProgressEvent) {
        let _ = self.tx.try_send(event);
    }
}

pub fn progress_channel(capacity: usize) -> (ProgressSender, AsyncReceiver<ProgressEvent>) {
    let (tx, rx) = kanal::bounded_async(capacity);
    (ProgressSender { tx }, rx)
}
