//! Schedule domain models
//!
//! [`ScheduleVersion`] is the entity produced by the import phase; the scrape
//! phase produces [`Assignment`] records linking staff to shift instances.

use super::ids::{ActorId, OrganizationId, PersonId, ScheduleVersionId, ShiftInstanceId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a schedule version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Freshly imported, not yet published
    #[default]
    Draft,
    /// Visible to staff
    Published,
    /// Superseded by a newer version
    Archived,
    /// No longer valid
    Deprecated,
}

/// A versioned snapshot of an organization's schedule
///
/// Each import creates a new version so schedule changes can be tracked over
/// time.
///
/// # Examples
///
/// ```
/// use shiftsync::domain::schedule::ScheduleVersion;
/// use shiftsync::domain::ids::{ActorId, OrganizationId};
/// use chrono::NaiveDate;
///
/// let version = ScheduleVersion::builder()
///     .organization_id(OrganizationId::generate())
///     .created_by(ActorId::generate())
///     .period(
///         NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
///     )
///     .build()
///     .unwrap();
/// assert_eq!(version.version, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleVersion {
    /// Unique identifier of this version
    pub id: ScheduleVersionId,

    /// Organization the schedule belongs to
    pub organization_id: OrganizationId,

    /// Monotonic version number within the organization
    pub version: u32,

    /// Lifecycle status
    pub status: VersionStatus,

    /// First day covered by the schedule
    pub start_date: NaiveDate,

    /// Last day covered by the schedule
    pub end_date: NaiveDate,

    /// Where the schedule came from (e.g. "ods_file", "manual")
    pub source: String,

    /// When the version was created
    pub created_at: DateTime<Utc>,

    /// Who created the version
    pub created_by: ActorId,
}

impl ScheduleVersion {
    /// Creates a new builder for constructing a ScheduleVersion
    pub fn builder() -> ScheduleVersionBuilder {
        ScheduleVersionBuilder::default()
    }

    /// Number of calendar days covered, inclusive of both ends
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Builder for [`ScheduleVersion`]
#[derive(Debug, Default)]
pub struct ScheduleVersionBuilder {
    id: Option<ScheduleVersionId>,
    organization_id: Option<OrganizationId>,
    version: Option<u32>,
    status: Option<VersionStatus>,
    period: Option<(NaiveDate, NaiveDate)>,
    source: Option<String>,
    created_by: Option<ActorId>,
}

impl ScheduleVersionBuilder {
    /// Sets an explicit identifier (generated otherwise)
    pub fn id(mut self, id: ScheduleVersionId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the owning organization
    pub fn organization_id(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Sets the version number (defaults to 1)
    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the status (defaults to draft)
    pub fn status(mut self, status: VersionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the covered period
    pub fn period(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.period = Some((start_date, end_date));
        self
    }

    /// Sets the source label (defaults to "ods_file")
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the creating actor
    pub fn created_by(mut self, created_by: ActorId) -> Self {
        self.created_by = Some(created_by);
        self
    }

    /// Builds the ScheduleVersion
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the period is inverted
    pub fn build(self) -> Result<ScheduleVersion, String> {
        let (start_date, end_date) = self.period.ok_or("period is required")?;
        if end_date < start_date {
            return Err(format!(
                "end_date {end_date} is before start_date {start_date}"
            ));
        }

        Ok(ScheduleVersion {
            id: self.id.unwrap_or_else(ScheduleVersionId::generate),
            organization_id: self.organization_id.ok_or("organization_id is required")?,
            version: self.version.unwrap_or(1),
            status: self.status.unwrap_or_default(),
            start_date,
            end_date,
            source: self.source.unwrap_or_else(|| "ods_file".to_string()),
            created_at: Utc::now(),
            created_by: self.created_by.ok_or("created_by is required")?,
        })
    }
}

/// Origin of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentSource {
    /// Scraped from the external Amion schedule
    Amion,
    /// Entered by hand
    Manual,
    /// Manual override of an imported assignment
    Override,
}

/// A staff member assigned to a shift instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Staff member
    pub person_id: PersonId,

    /// Shift instance being covered
    pub shift_instance_id: ShiftInstanceId,

    /// Date the assignment applies to
    pub schedule_date: NaiveDate,

    /// Shift name as it appeared in the source (e.g. "Technologist")
    pub original_shift_type: String,

    /// Where the assignment came from
    pub source: AssignmentSource,

    /// Who recorded the assignment
    pub created_by: ActorId,
}

impl Assignment {
    /// Creates a new assignment
    pub fn new(
        person_id: PersonId,
        shift_instance_id: ShiftInstanceId,
        schedule_date: NaiveDate,
        original_shift_type: impl Into<String>,
        source: AssignmentSource,
        created_by: ActorId,
    ) -> Self {
        Self {
            person_id,
            shift_instance_id,
            schedule_date,
            original_shift_type: original_shift_type.into(),
            source,
            created_by,
        }
    }

    /// Returns true if every required reference is set
    pub fn is_valid(&self) -> bool {
        !self.person_id.is_nil() && !self.shift_instance_id.is_nil() && !self.created_by.is_nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let version = ScheduleVersion::builder()
            .organization_id(OrganizationId::generate())
            .created_by(ActorId::generate())
            .period(date(2025, 1, 1), date(2025, 1, 31))
            .build()
            .unwrap();

        assert_eq!(version.version, 1);
        assert_eq!(version.status, VersionStatus::Draft);
        assert_eq!(version.source, "ods_file");
        assert_eq!(version.span_days(), 31);
    }

    #[test]
    fn test_builder_missing_fields() {
        let result = ScheduleVersion::builder()
            .period(date(2025, 1, 1), date(2025, 1, 31))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_inverted_period() {
        let result = ScheduleVersion::builder()
            .organization_id(OrganizationId::generate())
            .created_by(ActorId::generate())
            .period(date(2025, 2, 1), date(2025, 1, 1))
            .build();
        assert!(result.unwrap_err().contains("before"));
    }

    #[test]
    fn test_assignment_validity() {
        let assignment = Assignment::new(
            PersonId::generate(),
            ShiftInstanceId::generate(),
            date(2025, 1, 5),
            "Technologist",
            AssignmentSource::Amion,
            ActorId::generate(),
        );
        assert!(assignment.is_valid());

        let orphan = Assignment {
            person_id: PersonId::nil(),
            ..assignment
        };
        assert!(!orphan.is_valid());
    }

    #[test]
    fn test_assignment_source_serde() {
        let json = serde_json::to_string(&AssignmentSource::Amion).unwrap();
        assert_eq!(json, "\"AMION\"");
    }
}
