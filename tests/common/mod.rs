//! Shared test doubles for the integration tests
//!
//! Collaborators are driven by a behavior enum and count their calls; the
//! recording database logs every begin, commit and rollback in order.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use shiftsync::adapters::database::{
    IsolationLevel, Transaction, TransactionBeginner, TransactionOptions,
};
use shiftsync::core::context::RunContext;
use shiftsync::core::orchestrator::{
    CoverageCalculator, ScheduleImportService, ScheduleOrchestrator, ScheduleScrapeService,
    ServiceOutcome, TransactionManager,
};
use shiftsync::domain::{
    ActorId, Assignment, AssignmentSource, CoverageMetrics, OrganizationId, PersonId, Result,
    ScheduleVersion, ScheduleVersionId, ShiftInstanceId, ShiftSyncError, ValidationResult,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn schedule_version(organization_id: OrganizationId, actor_id: ActorId) -> ScheduleVersion {
    ScheduleVersion::builder()
        .organization_id(organization_id)
        .created_by(actor_id)
        .period(date(2025, 1, 1), date(2025, 3, 31))
        .build()
        .unwrap()
}

pub fn assignments(count: usize, actor_id: ActorId) -> Vec<Assignment> {
    (0..count)
        .map(|i| {
            Assignment::new(
                PersonId::generate(),
                ShiftInstanceId::generate(),
                date(2025, 1, 1) + chrono::Duration::days(i as i64),
                "Day",
                AssignmentSource::Amion,
                actor_id,
            )
        })
        .collect()
}

/// What the mock importer returns
#[derive(Clone)]
pub enum ImportBehavior {
    Success,
    Partial(String),
    Fail(String),
    Empty,
    Diagnostics(ValidationResult),
}

pub struct MockImporter {
    behavior: ImportBehavior,
    delay: Duration,
    pub calls: AtomicUsize,
}

impl MockImporter {
    pub fn new(behavior: ImportBehavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleImportService for MockImporter {
    async fn import_schedule(
        &self,
        _ctx: &RunContext,
        _file_path: &Path,
        organization_id: &OrganizationId,
        actor_id: &ActorId,
    ) -> ServiceOutcome<ScheduleVersion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let version = schedule_version(*organization_id, *actor_id);
        match &self.behavior {
            ImportBehavior::Success => ServiceOutcome::success(version, ValidationResult::new()),
            ImportBehavior::Partial(msg) => {
                let mut vr = ValidationResult::new();
                vr.add_warning("row 14", "unknown shift code skipped");
                ServiceOutcome::partial(version, vr, ShiftSyncError::Import(msg.clone()))
            }
            ImportBehavior::Fail(msg) => ServiceOutcome::failure(
                Some(ValidationResult::new()),
                ShiftSyncError::Import(msg.clone()),
            ),
            ImportBehavior::Empty => ServiceOutcome::empty(Some(ValidationResult::new())),
            ImportBehavior::Diagnostics(vr) => ServiceOutcome::success(version, vr.clone()),
        }
    }
}

/// What the mock scraper returns
#[derive(Clone)]
pub enum ScrapeBehavior {
    Records(usize),
    Fail(String),
    Partial(usize, String),
    Diagnostics(usize, ValidationResult),
}

pub struct MockScraper {
    behavior: ScrapeBehavior,
    pub windows: Mutex<Vec<(NaiveDate, u32)>>,
}

impl MockScraper {
    pub fn new(behavior: ScrapeBehavior) -> Self {
        Self {
            behavior,
            windows: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}

#[async_trait]
impl ScheduleScrapeService for MockScraper {
    async fn scrape_schedule(
        &self,
        _ctx: &RunContext,
        start_date: NaiveDate,
        month_count: u32,
        _organization_id: &OrganizationId,
        actor_id: &ActorId,
    ) -> ServiceOutcome<Vec<Assignment>> {
        self.windows.lock().unwrap().push((start_date, month_count));

        match &self.behavior {
            ScrapeBehavior::Records(n) => {
                ServiceOutcome::success(assignments(*n, *actor_id), ValidationResult::new())
            }
            ScrapeBehavior::Fail(msg) => ServiceOutcome::failure(
                Some(ValidationResult::new()),
                ShiftSyncError::Scrape(msg.clone()),
            ),
            ScrapeBehavior::Partial(n, msg) => ServiceOutcome::partial(
                assignments(*n, *actor_id),
                ValidationResult::new(),
                ShiftSyncError::Scrape(msg.clone()),
            ),
            ScrapeBehavior::Diagnostics(n, vr) => {
                ServiceOutcome::success(assignments(*n, *actor_id), vr.clone())
            }
        }
    }
}

pub struct MockCoverage {
    failure: Option<String>,
    pub calls: AtomicUsize,
}

impl MockCoverage {
    pub fn succeeding() -> Self {
        Self {
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            failure: Some(msg.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoverageCalculator for MockCoverage {
    async fn calculate(
        &self,
        _ctx: &RunContext,
        schedule_version_id: &ScheduleVersionId,
    ) -> Result<CoverageMetrics> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(msg) => Err(ShiftSyncError::Coverage(msg.clone())),
            None => Ok(CoverageMetrics::from_counts(*schedule_version_id, 45, 50)),
        }
    }
}

/// Database double that records transaction events in order
#[derive(Default)]
pub struct RecordingDb {
    pub events: Arc<Mutex<Vec<String>>>,
    pub isolations: Arc<Mutex<Vec<IsolationLevel>>>,
    pub fail_begin: bool,
    pub fail_commit: bool,
}

impl RecordingDb {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }
}

struct RecordingTx {
    events: Arc<Mutex<Vec<String>>>,
    fail_commit: bool,
}

#[async_trait]
impl Transaction for RecordingTx {
    async fn commit(&mut self) -> Result<()> {
        self.events.lock().unwrap().push("commit".to_string());
        if self.fail_commit {
            return Err(ShiftSyncError::Database("serialization failure".to_string()));
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.events.lock().unwrap().push("rollback".to_string());
        Ok(())
    }
}

#[async_trait]
impl TransactionBeginner for RecordingDb {
    async fn begin(
        &self,
        _ctx: &RunContext,
        options: TransactionOptions,
    ) -> Result<Box<dyn Transaction>> {
        self.events.lock().unwrap().push("begin".to_string());
        self.isolations.lock().unwrap().push(options.isolation);
        if self.fail_begin {
            return Err(ShiftSyncError::Database("too many connections".to_string()));
        }
        Ok(Box::new(RecordingTx {
            events: self.events.clone(),
            fail_commit: self.fail_commit,
        }))
    }
}

/// Orchestrator plus handles on its collaborators
pub struct Harness {
    pub importer: Arc<MockImporter>,
    pub scraper: Arc<MockScraper>,
    pub coverage: Arc<MockCoverage>,
    pub db: Arc<RecordingDb>,
    pub orchestrator: ScheduleOrchestrator,
}

impl Harness {
    pub fn new(import: ImportBehavior, scrape: ScrapeBehavior, coverage: MockCoverage) -> Self {
        Self::with_db(import, scrape, coverage, RecordingDb::default())
    }

    pub fn with_db(
        import: ImportBehavior,
        scrape: ScrapeBehavior,
        coverage: MockCoverage,
        db: RecordingDb,
    ) -> Self {
        let importer = Arc::new(MockImporter::new(import));
        let scraper = Arc::new(MockScraper::new(scrape));
        let coverage = Arc::new(coverage);
        let db = Arc::new(db);

        let orchestrator =
            ScheduleOrchestrator::new(importer.clone(), scraper.clone(), coverage.clone())
                .with_transactions(Arc::new(TransactionManager::new(db.clone())));

        Self {
            importer,
            scraper,
            coverage,
            db,
            orchestrator,
        }
    }

    pub fn happy() -> Self {
        Self::new(
            ImportBehavior::Success,
            ScrapeBehavior::Records(3),
            MockCoverage::succeeding(),
        )
    }
}
