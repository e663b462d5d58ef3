//! Instances
//!
//! A provisioned virtual machine and the display gating of its lifecycle
//! actions. The gating table only decides which controls are offered; the
//! authoritative transitions happen server-side and the client reconciles by
//! refetching after each action.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the instance endpoints.
///
/// Statuses the server adds later deserialize as [`InstanceStatus::Unknown`]
/// rather than failing the whole payload; unknown statuses offer no actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Provisioning,
    Configuring,
    WaitForUserUpdateSshKey,
    Starting,
    Running,
    Stopping,
    Stopped,
    Restarting,
    Suspending,
    Suspended,
    Error,
    /// A status string this client does not know.
    #[serde(other)]
    Unknown,
}

/// A lifecycle action the storefront can request for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceAction {
    Start,
    Stop,
    Restart,
    Suspend,
    /// Open a remote console session.
    Console,
}

impl InstanceAction {
    /// The path segment used by the lifecycle endpoints.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Suspend => "suspend",
            Self::Console => "console",
        }
    }
}

impl InstanceStatus {
    /// The actions offered to the user in this status.
    #[must_use]
    pub fn allowed_actions(self) -> &'static [InstanceAction] {
        match self {
            Self::Running => &[
                InstanceAction::Stop,
                InstanceAction::Restart,
                InstanceAction::Suspend,
                InstanceAction::Console,
            ],
            Self::Stopped | Self::Suspended => &[InstanceAction::Start],
            _ => &[],
        }
    }

    /// Whether the given action is offered in this status.
    #[must_use]
    pub fn permits(self, action: InstanceAction) -> bool {
        self.allowed_actions().contains(&action)
    }

    /// Whether the instance is between stable states.
    ///
    /// Transitional statuses offer no actions; readiness polling keeps
    /// watching until the instance settles.
    #[must_use]
    pub fn is_transitional(self) -> bool {
        matches!(
            self,
            Self::Provisioning
                | Self::Configuring
                | Self::Starting
                | Self::Stopping
                | Self::Restarting
                | Self::Suspending
        )
    }

    /// Whether the instance is up and serving.
    #[must_use]
    pub fn is_ready(self) -> bool {
        self == Self::Running
    }
}

/// A provisioned virtual machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Storefront-side instance id.
    pub instance_id: i64,
    /// Identifier of the VM on the hypervisor side.
    #[serde(default)]
    pub external_vm_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub status: InstanceStatus,
    /// Port the VNC console listens on, when provisioned.
    #[serde(default)]
    pub vnc_port: Option<u16>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}
