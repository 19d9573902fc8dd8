use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role asserted for a caller inside its tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Supervisor,
    #[serde(rename = "siteadmin")]
    SiteAdmin,
}

impl Role {
    /// Wire name of the role, as carried in token claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Supervisor => "supervisor",
            Self::SiteAdmin => "siteadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role claim carried a value outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "supervisor" => Ok(Self::Supervisor),
            "siteadmin" => Ok(Self::SiteAdmin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("student".parse::<Role>(), Ok(Role::Student));
        assert_eq!("supervisor".parse::<Role>(), Ok(Role::Supervisor));
        assert_eq!("siteadmin".parse::<Role>(), Ok(Role::SiteAdmin));
    }

    #[test]
    fn rejects_unknown_and_case_variants() {
        assert_eq!(
            "Supervisor".parse::<Role>(),
            Err(UnknownRole("Supervisor".to_owned()))
        );
        assert!("admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::SiteAdmin).unwrap();
        assert_eq!(json, "\"siteadmin\"");
        let role: Role = serde_json::from_str("\"supervisor\"").unwrap();
        assert_eq!(role, Role::Supervisor);
    }
}
