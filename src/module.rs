//! Closed enumerations of functional areas and actions.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Coarse functional area of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SystemModule {
    Faculty,
    Teacher,
    Hr,
    Admin,
    Formations,
    Reservations,
    Statistics,
    Timetable,
    Scholarships,
    Planning,
    Workload,
    Academic,
    Administrative,
}

impl SystemModule {
    const ALL: [SystemModule; 13] = [
        SystemModule::Faculty,
        SystemModule::Teacher,
        SystemModule::Hr,
        SystemModule::Admin,
        SystemModule::Formations,
        SystemModule::Reservations,
        SystemModule::Statistics,
        SystemModule::Timetable,
        SystemModule::Scholarships,
        SystemModule::Planning,
        SystemModule::Workload,
        SystemModule::Academic,
        SystemModule::Administrative,
    ];

    /// Returns every module in navigation order.
    pub fn all() -> &'static [SystemModule] {
        &Self::ALL
    }

    /// Returns the wire identifier of the module.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemModule::Faculty => "faculty",
            SystemModule::Teacher => "teacher",
            SystemModule::Hr => "hr",
            SystemModule::Admin => "admin",
            SystemModule::Formations => "formations",
            SystemModule::Reservations => "reservations",
            SystemModule::Statistics => "statistics",
            SystemModule::Timetable => "timetable",
            SystemModule::Scholarships => "scholarships",
            SystemModule::Planning => "planning",
            SystemModule::Workload => "workload",
            SystemModule::Academic => "academic",
            SystemModule::Administrative => "administrative",
        }
    }

    /// Returns the human readable module name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SystemModule::Faculty => "Faculty",
            SystemModule::Teacher => "Teacher Space",
            SystemModule::Hr => "Human Resources",
            SystemModule::Admin => "Administration",
            SystemModule::Formations => "Formations",
            SystemModule::Reservations => "Reservations",
            SystemModule::Statistics => "Statistics",
            SystemModule::Timetable => "Timetable",
            SystemModule::Scholarships => "Scholarships",
            SystemModule::Planning => "Planning",
            SystemModule::Workload => "Workload",
            SystemModule::Academic => "Academic Affairs",
            SystemModule::Administrative => "Administrative Affairs",
        }
    }

    /// Parses a module identifier, returning `None` when it is unknown.
    pub fn try_parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|module| module.as_str() == value)
    }
}

impl fmt::Display for SystemModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemModule {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::try_parse(&normalized).ok_or_else(|| Error::UnknownModule(value.to_string()))
    }
}

/// Independent capability on a module. No action implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PermissionAction {
    Read,
    Write,
    Delete,
    Approve,
    Export,
}

impl PermissionAction {
    const ALL: [PermissionAction; 5] = [
        PermissionAction::Read,
        PermissionAction::Write,
        PermissionAction::Delete,
        PermissionAction::Approve,
        PermissionAction::Export,
    ];

    /// Returns every action.
    pub fn all() -> &'static [PermissionAction] {
        &Self::ALL
    }

    /// Returns the wire identifier of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::Read => "read",
            PermissionAction::Write => "write",
            PermissionAction::Delete => "delete",
            PermissionAction::Approve => "approve",
            PermissionAction::Export => "export",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| Error::UnknownAction(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_from_str_should_normalize_case() {
        let module: SystemModule = " HR ".parse().unwrap();
        assert_eq!(module, SystemModule::Hr);
    }

    #[test]
    fn module_from_str_should_reject_unknown_module() {
        let result = "library".parse::<SystemModule>();
        assert!(matches!(result, Err(Error::UnknownModule(name)) if name == "library"));
    }

    #[test]
    fn every_module_round_trips_through_its_identifier() {
        for module in SystemModule::all() {
            assert_eq!(SystemModule::try_parse(module.as_str()), Some(*module));
        }
    }

    #[test]
    fn action_from_str_should_reject_unknown_action() {
        let result = "publish".parse::<PermissionAction>();
        assert!(matches!(result, Err(Error::UnknownAction(_))));
    }
}
