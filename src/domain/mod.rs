//! Domain models and types for ShiftSync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrganizationId`], [`ActorId`], [`ScheduleVersionId`])
//! - **Domain models** ([`ScheduleVersion`], [`Assignment`], [`CoverageMetrics`])
//! - **Diagnostics** ([`ValidationResult`], [`ValidationMessage`], [`ErrorSeverity`])
//! - **Error types** ([`ShiftSyncError`], [`Warnable`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are UUID newtypes so they cannot be mixed up:
//!
//! ```rust
//! use shiftsync::domain::{ActorId, OrganizationId};
//!
//! let org = OrganizationId::generate();
//! let actor = ActorId::generate();
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: OrganizationId = actor;
//! assert!(!org.is_nil() && !actor.is_nil());
//! ```

pub mod coverage;
pub mod errors;
pub mod ids;
pub mod result;
pub mod schedule;
pub mod validation;

// Re-export commonly used types for convenience
pub use coverage::CoverageMetrics;
pub use errors::{ShiftSyncError, Warnable};
pub use ids::{ActorId, OrganizationId, PersonId, ScheduleVersionId, ShiftInstanceId};
pub use result::Result;
pub use schedule::{
    Assignment, AssignmentSource, ScheduleVersion, ScheduleVersionBuilder, VersionStatus,
};
pub use validation::{
    Disposition, ErrorSeverity, MessageCode, Severity, ValidationMessage, ValidationResult,
    PHASES_WITH_ERRORS_KEY,
};
