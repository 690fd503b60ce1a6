//! Bill notifications
//!
//! `EmailNotifier` talks to the external mail relay over HTTP.
//! `BillNotifier` formats bill emails and dispatches them in the background;
//! a failed delivery is logged and otherwise ignored.

use ampere_core::{
    config::NotificationConfig, models::BillSummary, traits::NotificationSender, AppError,
    AppResult,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::constants::{BILL_EMAIL_GREETING, BILL_EMAIL_SUBJECT};

/// Payload accepted by the mail relay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequest<'a> {
    to_email: &'a str,
    body: &'a str,
    subject: &'a str,
}

/// HTTP client for the mail relay
pub struct EmailNotifier {
    http_client: Client,
    endpoint: String,
}

impl EmailNotifier {
    /// Create a notifier posting to `endpoint`
    pub fn new(endpoint: &str, timeout_ms: u64) -> AppResult<Self> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| AppError::Notification(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Create a notifier from the `notification` config section
    pub fn from_config(config: &NotificationConfig) -> AppResult<Self> {
        Self::new(&config.email_service_url, config.timeout_ms)
    }
}

#[async_trait]
impl NotificationSender for EmailNotifier {
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let request = EmailRequest {
            to_email: to,
            body,
            subject,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Notification(format!("Mail relay timed out: {}", e))
                } else {
                    AppError::Notification(format!("Mail relay unreachable: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notification(format!(
                "Mail relay answered with status {}",
                status.as_u16()
            )));
        }

        debug!(to, "Email accepted by relay");
        Ok(())
    }
}

/// Background dispatcher for bill emails
#[derive(Clone, Default)]
pub struct BillNotifier {
    sender: Option<Arc<dyn NotificationSender>>,
}

impl BillNotifier {
    /// Notifier delivering through `sender`
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Notifier that drops every message
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build from config; a disabled section yields a no-op notifier
    pub fn from_config(config: &NotificationConfig) -> AppResult<Self> {
        if !config.enabled {
            info!("Bill notifications disabled");
            return Ok(Self::disabled());
        }
        Ok(Self::new(Arc::new(EmailNotifier::from_config(config)?)))
    }

    /// Whether messages are delivered at all
    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Email body for a bill
    pub fn body_for(summary: &BillSummary) -> String {
        format!("{}{}", BILL_EMAIL_GREETING, summary)
    }

    /// Deliver the bill email, returning whether a message went out.
    ///
    /// Nothing is sent when the customer has no email or the notifier is
    /// disabled. Delivery errors are logged and swallowed.
    #[instrument(skip(self, summary), fields(customer_id = summary.customer_id))]
    pub async fn notify(&self, email: Option<&str>, summary: &BillSummary) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        let Some(to) = email.filter(|e| !e.trim().is_empty()) else {
            debug!("Customer has no email, skipping bill notification");
            return false;
        };

        match sender
            .send(to, BILL_EMAIL_SUBJECT, &Self::body_for(summary))
            .await
        {
            Ok(()) => {
                info!(to, "Bill notification sent");
                true
            }
            Err(e) => {
                warn!(to, error = %e, "Bill notification failed");
                false
            }
        }
    }

    /// Run [`notify`](Self::notify) on the runtime without waiting for it
    pub fn spawn_notify(&self, email: Option<String>, summary: BillSummary) -> JoinHandle<bool> {
        let notifier = self.clone();
        tokio::spawn(async move { notifier.notify(email.as_deref(), &summary).await })
    }
}
