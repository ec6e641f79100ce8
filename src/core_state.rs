//! Shared application state.
//!
//! `CoreState` owns one dispatch queue per workflow view (scheduling
//! release, receivable payment request) plus the notification feed.
//! Shared via `Arc` between the HTTP handlers and the shutdown path.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::dispatch::{
    DispatchError, NotificationFeed, QueueConfig, SequentialDispatchQueue, WebhookExecutor,
    WorkflowKind,
};
use crate::models::{Appointment, ReceivablePaymentRequest};

pub struct CoreState {
    pub config: AppConfig,
    pub feed: Arc<NotificationFeed>,
    pub scheduling: SequentialDispatchQueue<Appointment>,
    pub receivables: SequentialDispatchQueue<ReceivablePaymentRequest>,
}

impl CoreState {
    /// Build the production wiring. Must be called inside a tokio runtime.
    pub fn new(config: AppConfig) -> Result<Self, DispatchError> {
        let backend = BackendClient::new(
            config.backend_url.as_deref(),
            config.backend_token.as_deref(),
            config.http_timeout,
        )
        .map_err(|e| DispatchError::Config(format!("HTTP client: {e}")))?;

        let feed = Arc::new(NotificationFeed::new());

        let scheduling: SequentialDispatchQueue<Appointment> = SequentialDispatchQueue::spawn(
            WebhookExecutor::<Appointment, _>::new(config.scheduling.clone(), backend.clone(), config.http_timeout)?,
            feed.clone(),
            QueueConfig::new(WorkflowKind::SchedulingRelease).with_spacing(config.spacing),
        );
        let receivables: SequentialDispatchQueue<ReceivablePaymentRequest> = SequentialDispatchQueue::spawn(
            WebhookExecutor::<ReceivablePaymentRequest, _>::new(config.receivables.clone(), backend, config.http_timeout)?,
            feed.clone(),
            QueueConfig::new(WorkflowKind::ReceivablePayment).with_spacing(config.spacing),
        );

        if config.scheduling.configured_url().is_none() {
            tracing::warn!("CLINIC_SCHEDULING_WEBHOOK_URL not set; scheduling releases are disabled");
        }
        if config.receivables.configured_url().is_none() {
            tracing::warn!("CLINIC_RECEIVABLE_WEBHOOK_URL not set; payment requests are disabled");
        }
        if config.backend_url.is_none() {
            tracing::warn!("CLINIC_BACKEND_URL not set; status updates will fail");
        }

        Ok(Self {
            config,
            feed,
            scheduling,
            receivables,
        })
    }

    /// Assemble from pre-built queues (tests, alternative executors).
    pub fn from_parts(
        config: AppConfig,
        feed: Arc<NotificationFeed>,
        scheduling: SequentialDispatchQueue<Appointment>,
        receivables: SequentialDispatchQueue<ReceivablePaymentRequest>,
    ) -> Self {
        Self {
            config,
            feed,
            scheduling,
            receivables,
        }
    }

    pub fn is_configured(&self, workflow: WorkflowKind) -> bool {
        let target = match workflow {
            WorkflowKind::SchedulingRelease => &self.config.scheduling,
            WorkflowKind::ReceivablePayment => &self.config.receivables,
        };
        target.configured_url().is_some()
    }

    /// Tear down both queues. Pending requests are discarded.
    pub fn shutdown(&self) {
        self.scheduling.shutdown();
        self.receivables.shutdown();
        tracing::info!("Dispatch queues stopped");
    }
}
