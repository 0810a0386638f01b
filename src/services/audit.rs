use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{AuditAction, AuditEntry};
use crate::store::AuditSink;

/// Queues audit entries for a background writer so that a slow or failing
/// log table never fails the request that produced the entry.
#[derive(Clone)]
pub struct AuditRecorder {
    tx: mpsc::Sender<AuditEntry>,
}

impl AuditRecorder {
    /// Starts the writer task. It exits once every recorder clone is dropped
    /// and the queue is drained.
    pub fn spawn(
        sink: Arc<dyn AuditSink>,
        capacity: usize,
        max_retries: u32,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_writer(rx, sink, max_retries));
        (Self { tx }, handle)
    }

    pub fn record(
        &self,
        action: AuditAction,
        table_name: &'static str,
        record_id: i64,
        actor_id: Option<i64>,
    ) {
        if actor_id.is_none() {
            tracing::warn!(
                table = table_name,
                record_id,
                action = action.as_str(),
                "audit entry has no acting user"
            );
        }

        let entry = AuditEntry {
            action,
            table_name,
            record_id,
            actor_id,
            created_at: Utc::now().naive_utc(),
        };

        match self.tx.try_send(entry) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(entry)) => {
                tracing::warn!(
                    table = entry.table_name,
                    record_id = entry.record_id,
                    "audit queue full, entry dropped"
                );
            }
            Err(mpsc::error::TrySendError::Closed(entry)) => {
                tracing::warn!(
                    table = entry.table_name,
                    record_id = entry.record_id,
                    "audit writer stopped, entry dropped"
                );
            }
        }
    }
}

async fn run_writer(
    mut rx: mpsc::Receiver<AuditEntry>,
    sink: Arc<dyn AuditSink>,
    max_retries: u32,
) {
    while let Some(entry) = rx.recv().await {
        let mut attempt = 0;
        loop {
            match sink.append(&entry).await {
                Ok(()) => break,
                Err(e) if attempt < max_retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "audit append failed, retrying");
                    tokio::time::sleep(Duration::from_millis(25 << attempt.min(6))).await;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        table = entry.table_name,
                        record_id = entry.record_id,
                        action = entry.action.as_str(),
                        "audit entry lost after retries"
                    );
                    break;
                }
            }
        }
    }
    tracing::debug!("audit writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryAuditSink;

    #[tokio::test]
    async fn test_entries_reach_sink_in_order() {
        let sink = Arc::new(MemoryAuditSink::default());
        let (recorder, handle) = AuditRecorder::spawn(sink.clone(), 8, 0);

        recorder.record(AuditAction::Create, "bookings", 1, Some(7));
        recorder.record(AuditAction::Delete, "bookings", 1, None);
        drop(recorder);
        handle.await.unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::Create);
        assert_eq!(entries[0].actor_id, Some(7));
        assert_eq!(entries[1].actor_id, None);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let sink = Arc::new(MemoryAuditSink::failing_first(2));
        let (recorder, handle) = AuditRecorder::spawn(sink.clone(), 8, 3);

        recorder.record(AuditAction::Update, "bookings", 4, Some(1));
        drop(recorder);
        handle.await.unwrap();

        assert_eq!(sink.entries().len(), 1);
        assert_eq!(sink.attempts(), 3);
    }

    #[tokio::test]
    async fn test_entry_abandoned_after_max_retries() {
        let sink = Arc::new(MemoryAuditSink::failing_first(10));
        let (recorder, handle) = AuditRecorder::spawn(sink.clone(), 8, 1);

        recorder.record(AuditAction::Update, "bookings", 4, Some(1));
        drop(recorder);
        handle.await.unwrap();

        assert!(sink.entries().is_empty());
        assert_eq!(sink.attempts(), 2);
    }
}
