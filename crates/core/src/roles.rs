//! Mine roles and the permission matrix derived from them.
//!
//! Role names must match the CHECK constraint on `users.role`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Operator,
    TeamLeader,
    Supervisor,
    Maintenance,
    Engineer,
    OverseerMiner,
    ShiftBoss,
    MineCaptain,
    MineManager,
    Admin,
}

impl UserRole {
    pub const ALL: &'static [UserRole] = &[
        UserRole::Operator,
        UserRole::TeamLeader,
        UserRole::Supervisor,
        UserRole::Maintenance,
        UserRole::Engineer,
        UserRole::OverseerMiner,
        UserRole::ShiftBoss,
        UserRole::MineCaptain,
        UserRole::MineManager,
        UserRole::Admin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Operator => "operator",
            UserRole::TeamLeader => "team_leader",
            UserRole::Supervisor => "supervisor",
            UserRole::Maintenance => "maintenance",
            UserRole::Engineer => "engineer",
            UserRole::OverseerMiner => "overseer_miner",
            UserRole::ShiftBoss => "shift_boss",
            UserRole::MineCaptain => "mine_captain",
            UserRole::MineManager => "mine_manager",
            UserRole::Admin => "admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UserRole::Operator => "Operator",
            UserRole::TeamLeader => "Team Leader",
            UserRole::Supervisor => "Supervisor",
            UserRole::Maintenance => "Maintenance Team",
            UserRole::Engineer => "Engineer",
            UserRole::OverseerMiner => "Overseer Miner",
            UserRole::ShiftBoss => "Shift Boss",
            UserRole::MineCaptain => "Mine Captain",
            UserRole::MineManager => "Mine Manager",
            UserRole::Admin => "Admin",
        }
    }

    pub fn from_str_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.as_str() == name)
    }

    pub fn access(self) -> RoleAccess {
        RoleAccess::for_role(self)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a role wire name, returning the parsed role.
pub fn parse_role(role: &str) -> Result<UserRole, CoreError> {
    UserRole::from_str_name(role)
        .ok_or_else(|| CoreError::Validation(format!("Unknown role '{role}'")))
}

/// What a role is allowed to see and do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleAccess {
    pub can_view_dashboard: bool,
    pub can_view_equipment: bool,
    pub can_report_downtime: bool,
    pub can_view_downtimes: bool,
    pub can_start_repair: bool,
    pub can_close_downtime: bool,
    pub can_manage_equipment: bool,
    pub can_manage_users: bool,
}

/// A single permission flag, used by the RBAC extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewDashboard,
    ViewEquipment,
    ReportDowntime,
    ViewDowntimes,
    StartRepair,
    CloseDowntime,
    ManageEquipment,
    ManageUsers,
}

impl Permission {
    pub fn describe(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view the dashboard",
            Permission::ViewEquipment => "view equipment",
            Permission::ReportDowntime => "report downtime",
            Permission::ViewDowntimes => "view downtimes",
            Permission::StartRepair => "start repairs",
            Permission::CloseDowntime => "close downtimes",
            Permission::ManageEquipment => "manage equipment",
            Permission::ManageUsers => "manage users",
        }
    }
}

impl RoleAccess {
    /// No access at all (anonymous).
    pub const fn none() -> Self {
        Self {
            can_view_dashboard: false,
            can_view_equipment: false,
            can_report_downtime: false,
            can_view_downtimes: false,
            can_start_repair: false,
            can_close_downtime: false,
            can_manage_equipment: false,
            can_manage_users: false,
        }
    }

    pub fn for_role(role: UserRole) -> Self {
        // Every signed-in role can see equipment and report a breakdown.
        let base = Self {
            can_view_equipment: true,
            can_report_downtime: true,
            ..Self::none()
        };
        match role {
            UserRole::Operator => base,
            UserRole::TeamLeader | UserRole::Supervisor | UserRole::ShiftBoss => Self {
                can_view_dashboard: true,
                ..base
            },
            UserRole::Maintenance | UserRole::Engineer => Self {
                can_view_dashboard: true,
                can_view_downtimes: true,
                can_start_repair: true,
                can_close_downtime: true,
                ..base
            },
            UserRole::OverseerMiner => Self {
                can_view_dashboard: true,
                can_view_downtimes: true,
                ..base
            },
            UserRole::MineCaptain => Self {
                can_view_dashboard: true,
                can_view_downtimes: true,
                can_manage_equipment: true,
                ..base
            },
            UserRole::MineManager => Self {
                can_view_dashboard: true,
                can_view_downtimes: true,
                can_manage_equipment: true,
                can_manage_users: true,
                ..base
            },
            UserRole::Admin => Self {
                can_view_dashboard: true,
                can_view_equipment: true,
                can_report_downtime: true,
                can_view_downtimes: true,
                can_start_repair: true,
                can_close_downtime: true,
                can_manage_equipment: true,
                can_manage_users: true,
            },
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::ViewDashboard => self.can_view_dashboard,
            Permission::ViewEquipment => self.can_view_equipment,
            Permission::ReportDowntime => self.can_report_downtime,
            Permission::ViewDowntimes => self.can_view_downtimes,
            Permission::StartRepair => self.can_start_repair,
            Permission::CloseDowntime => self.can_close_downtime,
            Permission::ManageEquipment => self.can_manage_equipment,
            Permission::ManageUsers => self.can_manage_users,
        }
    }
}
