//! Background panel polling

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::types::DataStream;
use crate::generators::{BudgetData, CashFlowData, InsightData, KpiData, RiskData};

const UPDATE_BUFFER: usize = 8;

/// One refresh of a polled panel
#[derive(Debug, Clone)]
pub enum PanelUpdate {
    Kpi(Vec<KpiData>),
    CashFlow(Vec<CashFlowData>),
    Budget(Vec<BudgetData>),
    Risk(Vec<RiskData>),
    Insights(Vec<InsightData>),
    /// The panel keeps its previous data and shows `message`
    Failed { stream: DataStream, message: String },
}

impl PanelUpdate {
    pub fn stream(&self) -> DataStream {
        match self {
            PanelUpdate::Kpi(_) => DataStream::Kpi,
            PanelUpdate::CashFlow(_) => DataStream::CashFlow,
            PanelUpdate::Budget(_) => DataStream::Budget,
            PanelUpdate::Risk(_) => DataStream::Risk,
            PanelUpdate::Insights(_) => DataStream::Insights,
            PanelUpdate::Failed { stream, .. } => *stream,
        }
    }
}

/// Handle to a polling task; the task stops on `cancel()` or when dropped
pub struct Poller {
    stream: DataStream,
    handle: JoinHandle<()>,
    updates: mpsc::Receiver<PanelUpdate>,
}

impl Poller {
    pub(crate) fn channel() -> (mpsc::Sender<PanelUpdate>, mpsc::Receiver<PanelUpdate>) {
        mpsc::channel(UPDATE_BUFFER)
    }

    pub(crate) fn new(stream: DataStream, handle: JoinHandle<()>, updates: mpsc::Receiver<PanelUpdate>) -> Self {
        Self { stream, handle, updates }
    }

    pub fn stream(&self) -> DataStream {
        self.stream
    }

    /// Next update; `None` once the task has stopped
    pub async fn recv(&mut self) -> Option<PanelUpdate> {
        self.updates.recv().await
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            tracing::debug!(stream = %self.stream, "polling cancelled");
            self.handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
