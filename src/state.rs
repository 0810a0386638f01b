use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::services::audit::AuditRecorder;
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;
use crate::services::orchestrator::BookingPaymentOrchestrator;
use crate::services::payment::PaymentService;
use crate::services::summary::SummaryService;

pub struct AppState {
    pub db: SqliteStore,
    pub config: AppConfig,
    pub bookings: BookingService,
    pub orchestrator: BookingPaymentOrchestrator,
    pub payments: PaymentService,
    pub availability: AvailabilityService,
    pub summaries: SummaryService,
}

impl AppState {
    /// Wires every service to the one SQLite store.
    pub fn new(config: AppConfig, db: SqliteStore, audit: AuditRecorder) -> Self {
        let store = Arc::new(db.clone());

        Self {
            bookings: BookingService::new(store.clone(), audit.clone()),
            orchestrator: BookingPaymentOrchestrator::new(store.clone(), store.clone(), audit.clone()),
            payments: PaymentService::new(store.clone(), audit.clone()),
            availability: AvailabilityService::new(store.clone()),
            summaries: SummaryService::new(store.clone(), store, config.summary.clone(), audit),
            db,
            config,
        }
    }
}
