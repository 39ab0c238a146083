//! The closed role set and the capability table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Access level of a terminal user. Stored as lowercase text in user rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    Restocker,
    Technician,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Admin, Self::Seller, Self::Restocker, Self::Technician];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Seller => "seller",
            Self::Restocker => "restocker",
            Self::Technician => "technician",
        }
    }

    /// Single permission check every operation funnels through.
    ///
    /// The drawer rows of this table:
    ///
    /// | Role       | open | close |
    /// |------------|------|-------|
    /// | Admin      | yes  | yes   |
    /// | Seller     | yes  | no    |
    /// | Restocker  | no   | yes   |
    /// | Technician | no   | no    |
    #[must_use]
    pub const fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::OpenDrawer => matches!(self, Self::Admin | Self::Seller),
            Capability::CloseDrawer => matches!(self, Self::Admin | Self::Restocker),
            Capability::ArmBlockTimer => matches!(self, Self::Admin | Self::Seller),
            Capability::ClearBlockTimer
            | Capability::ConfigureBlockTimer
            | Capability::ManageUsers => matches!(self, Self::Admin),
        }
    }

    /// Capability required for a drawer transition in the requested direction.
    #[must_use]
    pub const fn drawer_capability(action: DrawerAction) -> Capability {
        match action {
            DrawerAction::Open => Capability::OpenDrawer,
            DrawerAction::Close => Capability::CloseDrawer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "seller" => Ok(Self::Seller),
            "restocker" => Ok(Self::Restocker),
            "technician" => Ok(Self::Technician),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Things a role may be permitted to do. Checked via [`Role::allows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    OpenDrawer,
    CloseDrawer,
    ArmBlockTimer,
    ClearBlockTimer,
    ConfigureBlockTimer,
    ManageUsers,
}

impl Capability {
    /// Role that minimally satisfies this capability, for error messages.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::OpenDrawer | Self::ArmBlockTimer => Role::Seller,
            Self::CloseDrawer => Role::Restocker,
            Self::ClearBlockTimer | Self::ConfigureBlockTimer | Self::ManageUsers => Role::Admin,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenDrawer => "open-drawer",
            Self::CloseDrawer => "close-drawer",
            Self::ArmBlockTimer => "arm-block-timer",
            Self::ClearBlockTimer => "clear-block-timer",
            Self::ConfigureBlockTimer => "configure-block-timer",
            Self::ManageUsers => "manage-users",
        };
        f.write_str(name)
    }
}

/// Direction of a drawer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerAction {
    Open,
    Close,
}

impl DrawerAction {
    /// History row label, also used as the audit action suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "opened",
            Self::Close => "closed",
        }
    }

    #[must_use]
    pub const fn from_requested_state(open: bool) -> Self {
        if open { Self::Open } else { Self::Close }
    }
}
