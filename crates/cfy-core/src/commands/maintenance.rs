//! Maintenance-mode command implementation.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::rest::{Execution, MaintenanceStatus, ManagerApi};

/// Interval between status polls while waiting for activation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Options for `maintenance-mode activate`
#[derive(Debug, Clone, Default)]
pub struct ActivateOptions {
    /// Block until maintenance mode is fully active
    pub wait: bool,
    /// Seconds to wait; 0 waits without limit
    pub timeout_secs: u64,
}

impl ActivateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// One remaining execution row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRow {
    pub id: String,
    pub deployment_id: String,
    pub workflow_id: String,
    pub status: String,
}

impl From<&Execution> for ExecutionRow {
    fn from(execution: &Execution) -> Self {
        Self {
            id: execution.id.clone(),
            deployment_id: execution.deployment_id.clone().unwrap_or_default(),
            workflow_id: execution.workflow_id.clone().unwrap_or_default(),
            status: execution.status.clone().unwrap_or_default(),
        }
    }
}

/// Output of `maintenance-mode status`
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceReport {
    pub status: String,
    pub activated_at: Option<String>,
    pub activation_requested_at: Option<String>,
    pub requested_by: Option<String>,
    pub remaining_executions: Vec<ExecutionRow>,
    pub active: bool,
}

impl From<MaintenanceStatus> for MaintenanceReport {
    fn from(status: MaintenanceStatus) -> Self {
        Self {
            active: status.is_active(),
            remaining_executions: status
                .remaining_executions
                .iter()
                .map(ExecutionRow::from)
                .collect(),
            status: status.status,
            activated_at: status.activated_at,
            activation_requested_at: status.activation_requested_at,
            requested_by: status.requested_by,
        }
    }
}

#[derive(Debug)]
pub struct MaintenanceCommand {
    poll_interval: Duration,
}

impl Default for MaintenanceCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl MaintenanceCommand {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn status(&self, api: &dyn ManagerApi) -> anyhow::Result<MaintenanceReport> {
        let status = api.maintenance_status()?;
        let remaining = status.remaining_executions.len();
        if remaining > 0 {
            tracing::info!(
                "Manager currently has {remaining} running or pending execution(s). \
                 Waiting for them to finish before entering maintenance mode."
            );
        }
        Ok(status.into())
    }

    /// Request maintenance mode, optionally waiting for it to take effect.
    pub fn activate(
        &self,
        api: &dyn ManagerApi,
        options: &ActivateOptions,
    ) -> anyhow::Result<MaintenanceReport> {
        if options.timeout_secs > 0 && !options.wait {
            anyhow::bail!(
                "'--timeout' was used without '--wait'. \
                 Add the '--wait' flag to the command in order to wait."
            );
        }

        tracing::info!("Entering maintenance mode...");
        let status = api.activate_maintenance()?;
        if !options.wait {
            tracing::info!("Run 'cfy maintenance-mode status' to check the maintenance mode's status.");
            return Ok(status.into());
        }

        tracing::info!(
            "Manager will enter maintenance mode once there are no running or pending executions..."
        );
        // A timeout too large to represent as an instant waits without limit.
        let deadline = (options.timeout_secs > 0)
            .then(|| Instant::now().checked_add(Duration::from_secs(options.timeout_secs)))
            .flatten();

        loop {
            if deadline.is_some_and(|d| Instant::now() > d) {
                anyhow::bail!(
                    "Timed out while entering maintenance mode. Note that the manager is still \
                     entering maintenance mode in the background. You can run \
                     'cfy maintenance-mode status' to check the status."
                );
            }

            let status = api.maintenance_status()?;
            if status.is_active() {
                tracing::info!("Manager is in maintenance mode. Most requests will be blocked.");
                return Ok(status.into());
            }
            tracing::debug!(status = %status.status, "maintenance mode not active yet");
            std::thread::sleep(self.poll_interval);
        }
    }

    pub fn deactivate(&self, api: &dyn ManagerApi) -> anyhow::Result<MaintenanceReport> {
        tracing::info!("Turning off maintenance mode...");
        let status = api.deactivate_maintenance()?;
        tracing::info!("Maintenance mode is off.");
        Ok(status.into())
    }
}
