//! Walks the upstream identifier space and collects heroes from one publisher.

use log::{debug, error, info, warn, Level};

use crate::client::{FetchOutcome, HeroSource};
use crate::logging::{LogConfig, CLIENT_TARGET};
use crate::model::HeroRecord;

/// Publisher the report is built for.
pub const TARGET_PUBLISHER: &str = "DC Comics";

/// Number of heroes placed in the report.
pub const TARGET_COUNT: usize = 10;

/// Highest identifier probed unless configured otherwise.
pub const DEFAULT_MAX_ID: u32 = 1000;

/// Result of a fetch run.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Matching heroes in identifier order.
    pub heroes: Vec<HeroRecord>,
    /// Last identifier that was probed.
    pub last_id: u32,
    /// Identifiers skipped because of transient or permanent failures.
    pub failed_ids: Vec<u32>,
}

impl FetchReport {
    /// Returns whether fewer heroes than requested were found.
    pub fn is_short(&self, target: usize) -> bool {
        self.heroes.len() < target
    }
}

/// Collects heroes whose publisher matches a target value.
pub struct Fetcher<S> {
    source: S,
    publisher: String,
    target: usize,
    max_id: u32,
    log: LogConfig,
}

impl<S: HeroSource> Fetcher<S> {
    /// Creates a fetcher for [`TARGET_PUBLISHER`] and [`TARGET_COUNT`].
    pub fn new(source: S, log: LogConfig) -> Self {
        Self {
            source,
            publisher: TARGET_PUBLISHER.to_string(),
            target: TARGET_COUNT,
            max_id: DEFAULT_MAX_ID,
            log,
        }
    }

    /// Overrides the publisher heroes are matched against.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    /// Overrides the number of heroes to collect.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    /// Sets the highest identifier probed before giving up.
    pub fn with_max_id(mut self, max_id: u32) -> Self {
        self.max_id = max_id;
        self
    }

    /// Returns the underlying data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Probes identifiers `1..=max_id` in order until enough heroes were collected.
    ///
    /// Failures never abort the loop; the identifier is recorded in
    /// [`FetchReport::failed_ids`] and skipped.
    pub fn run(&self) -> FetchReport {
        let mut report = FetchReport::default();

        let mut hero_id = 0;
        while report.heroes.len() < self.target {
            if hero_id >= self.max_id {
                warn!(
                    target: CLIENT_TARGET,
                    "Reached identifier ceiling {} with {} of {} heroes",
                    self.max_id,
                    report.heroes.len(),
                    self.target
                );
                break;
            }
            hero_id += 1;
            report.last_id = hero_id;

            let biography = match self.source.biography(hero_id) {
                FetchOutcome::Found(biography) => biography,
                outcome => {
                    self.skip(hero_id, outcome, &mut report.failed_ids);
                    continue;
                }
            };

            if biography.publisher.as_deref() != Some(self.publisher.as_str()) {
                continue;
            }

            match self.source.hero(hero_id) {
                FetchOutcome::Found(hero) => {
                    info!(
                        target: CLIENT_TARGET,
                        "Collected {} ({}/{})",
                        hero.full_name(),
                        report.heroes.len() + 1,
                        self.target
                    );
                    report.heroes.push(hero);
                }
                outcome => self.skip(hero_id, outcome, &mut report.failed_ids),
            }
        }

        report
    }

    fn skip<T>(&self, hero_id: u32, outcome: FetchOutcome<T>, failed: &mut Vec<u32>) {
        match outcome {
            FetchOutcome::Found(_) => {}
            FetchOutcome::NotFound => {
                if self.log.enabled(Level::Debug) {
                    debug!(target: CLIENT_TARGET, "Skipping hero {hero_id}: not found");
                }
            }
            FetchOutcome::TransientFailure { status, attempts } => {
                error!(
                    target: CLIENT_TARGET,
                    "Skipping hero {hero_id}: still failing after {attempts} attempts (status {})",
                    status.map_or_else(|| "n/a".to_string(), |code| code.to_string())
                );
                failed.push(hero_id);
            }
            FetchOutcome::PermanentFailure(err) => {
                error!(target: CLIENT_TARGET, "Skipping hero {hero_id}: {err}");
                failed.push(hero_id);
            }
        }
    }
}
