//! Ingestion & automation controller.
//!
//! Listens on the view end of the bridge and starts one [`AutomationRun`]
//! per delivered record.  Each run is its own tokio task, so a second
//! delivery arriving while the first run is still sleeping is processed
//! independently.  The two runs are not coordinated; whichever injects last
//! wins the input field.

use std::sync::Arc;

use chess_analyzer_core::{GameRecord, ViewReceiver};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::application::automation::{AutomationRun, AutomationSettings, RunReport};
use crate::application::document::Document;

/// Spawns automation runs against one document.
#[derive(Clone)]
pub struct Controller {
    document: Arc<dyn Document>,
    settings: Arc<AutomationSettings>,
    reports: Option<UnboundedSender<RunReport>>,
}

impl Controller {
    pub fn new(document: Arc<dyn Document>, settings: AutomationSettings) -> Self {
        Self {
            document,
            settings: Arc::new(settings),
            reports: None,
        }
    }

    /// Publishes every finished run's report on `reports`.
    pub fn with_reports(mut self, reports: UnboundedSender<RunReport>) -> Self {
        self.reports = Some(reports);
        self
    }

    /// Starts a run for `record` on the current runtime.
    pub fn spawn_run(&self, record: GameRecord) -> JoinHandle<RunReport> {
        let document = Arc::clone(&self.document);
        let settings = Arc::clone(&self.settings);
        let reports = self.reports.clone();

        tokio::spawn(async move {
            let report = AutomationRun::new(record)
                .drive(document.as_ref(), &settings)
                .await;
            if let Some(tx) = reports {
                // Receiver gone just means nobody is watching.
                let _ = tx.send(report.clone());
            }
            report
        })
    }

    /// Consumes deliveries until the host end of the bridge closes.
    ///
    /// Returns the number of runs started.  Runs still in flight when this
    /// returns keep going on their own tasks.
    pub async fn serve(self, mut deliveries: ViewReceiver) -> usize {
        let mut started = 0;
        while let Some(record) = deliveries.recv().await {
            debug!("controller: delivery of {} bytes", record.len());
            self.spawn_run(record);
            started += 1;
        }
        info!("controller: bridge closed after {started} deliveries");
        started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RunState;
    use crate::infrastructure::document::mock::MockDocument;

    #[tokio::test(start_paused = true)]
    async fn test_spawn_run_publishes_report() {
        // Arrange
        let doc = Arc::new(MockDocument::report_page());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let controller =
            Controller::new(doc.clone(), AutomationSettings::default()).with_reports(tx);

        // Act
        let handle = controller.spawn_run(GameRecord::from_cli("1. e4 *"));
        let returned = handle.await.unwrap();
        let published = rx.recv().await.unwrap();

        // Assert
        assert_eq!(returned, published);
        assert_eq!(*published.outcome(), RunState::Submitted);
        assert_eq!(doc.clicks(), vec!["review".to_string()]);
    }
}
