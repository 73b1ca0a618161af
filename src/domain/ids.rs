//! Domain identifier types
//!
//! Newtype wrappers around [`Uuid`] so organization, actor and schedule
//! identifiers cannot be mixed up. The nil UUID is representable (it is what
//! an unset identifier deserializes to) but is rejected wherever an
//! identifier is required; see [`OrganizationId::is_nil`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wraps an existing UUID (the nil UUID is allowed here)
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generates a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// The nil (all-zero) identifier
            pub fn nil() -> Self {
                Self(Uuid::nil())
            }

            /// Returns true for the nil (all-zero) identifier
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// Returns the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Human-readable label used in error messages
            pub fn label() -> &'static str {
                $label
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|e| format!("Invalid {}: {e}", $label))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(
    /// Identifier of the hospital / organization a schedule belongs to
    OrganizationId,
    "organization ID"
);

uuid_id!(
    /// Identifier of the user performing an import, kept for audit trails
    ActorId,
    "actor ID"
);

uuid_id!(
    /// Identifier of a versioned schedule snapshot
    ScheduleVersionId,
    "schedule version ID"
);

uuid_id!(
    /// Identifier of a staff member
    PersonId,
    "person ID"
);

uuid_id!(
    /// Identifier of a concrete shift occurrence
    ShiftInstanceId,
    "shift instance ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_not_nil() {
        assert!(!OrganizationId::generate().is_nil());
        assert!(!ActorId::generate().is_nil());
    }

    #[test]
    fn test_nil_detection() {
        assert!(OrganizationId::nil().is_nil());
        assert!(ActorId::new(Uuid::nil()).is_nil());
    }

    #[test]
    fn test_from_str_round_trip() {
        let id = OrganizationId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
        assert_eq!(id.to_string(), "7d44b88c-4199-4bad-97dc-d78268e01398");
    }

    #[test]
    fn test_from_str_invalid() {
        let err = ActorId::from_str("not-a-uuid").unwrap_err();
        assert!(err.contains("actor ID"));
    }

    #[test]
    fn test_serde_transparent() {
        let id = ScheduleVersionId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
