//! Failover e-mail service implementation
//!
//! Sends through a primary provider and switches to a backup when the
//! primary fails. The primary is retried once `failover_timeout` has passed
//! since its last failure.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::email_service::EmailService;
use crate::InfrastructureError;

#[derive(Debug, Clone, Default)]
struct FailoverState {
    using_backup: bool,
    last_primary_failure: Option<Instant>,
    primary_failure_count: u32,
}

/// E-mail service with automatic failover
pub struct FailoverEmailService {
    primary: Box<dyn EmailService>,
    backup: Box<dyn EmailService>,
    state: RwLock<FailoverState>,
    failover_timeout: Duration,
}

impl FailoverEmailService {
    /// Create a new failover e-mail service
    ///
    /// # Arguments
    ///
    /// * `primary` - Provider tried first
    /// * `backup` - Provider used while the primary is considered down
    /// * `failover_timeout` - How long to stay on the backup after a primary failure
    pub fn new(
        primary: Box<dyn EmailService>,
        backup: Box<dyn EmailService>,
        failover_timeout: Duration,
    ) -> Self {
        info!(
            primary = primary.provider_name(),
            backup = backup.provider_name(),
            "Initializing failover e-mail service"
        );

        Self {
            primary,
            backup,
            state: RwLock::new(FailoverState::default()),
            failover_timeout,
        }
    }

    /// Whether the next send should go to the primary
    async fn should_try_primary(&self) -> bool {
        let state = self.state.read().await;
        if !state.using_backup {
            return true;
        }
        state
            .last_primary_failure
            .map(|at| at.elapsed() > self.failover_timeout)
            .unwrap_or(true)
    }

    async fn record_primary_failure(&self) {
        let mut state = self.state.write().await;
        state.primary_failure_count += 1;
        state.last_primary_failure = Some(Instant::now());

        if !state.using_backup {
            warn!(
                primary = self.primary.provider_name(),
                backup = self.backup.provider_name(),
                failures = state.primary_failure_count,
                "Primary e-mail provider failed, switching to backup"
            );
            state.using_backup = true;
        }
    }

    async fn record_primary_success(&self) {
        let mut state = self.state.write().await;
        if state.using_backup {
            info!(
                primary = self.primary.provider_name(),
                "Primary e-mail provider recovered"
            );
        }
        *state = FailoverState::default();
    }

    /// Whether sends are currently routed to the backup
    pub async fn is_using_backup(&self) -> bool {
        self.state.read().await.using_backup
    }
}

#[async_trait]
impl EmailService for FailoverEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        if self.should_try_primary().await {
            match self.primary.send_email(to, subject, body).await {
                Ok(message_id) => {
                    self.record_primary_success().await;
                    return Ok(message_id);
                }
                Err(e) => {
                    error!(
                        provider = self.primary.provider_name(),
                        error = %e,
                        "Primary e-mail provider failed"
                    );
                    self.record_primary_failure().await;
                }
            }
        }

        match self.backup.send_email(to, subject, body).await {
            Ok(message_id) => Ok(message_id),
            Err(e) => {
                error!(
                    provider = self.backup.provider_name(),
                    error = %e,
                    "Backup e-mail provider also failed"
                );
                Err(InfrastructureError::Email(format!(
                    "Both primary ({}) and backup ({}) e-mail providers failed",
                    self.primary.provider_name(),
                    self.backup.provider_name()
                )))
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Failover"
    }

    async fn is_available(&self) -> bool {
        self.primary.is_available().await || self.backup.is_available().await
    }
}
