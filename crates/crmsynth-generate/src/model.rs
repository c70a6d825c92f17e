use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Minimum width of the business-date window; deals and child campaigns are
/// created no later than 30 days before its end.
pub const MIN_WINDOW_DAYS: i64 = 30;

/// Target number of records per entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityCounts {
    pub users: usize,
    pub accounts: usize,
    /// Optional cap on contacts. Without it the count is derived from account size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<usize>,
    pub leads: usize,
    pub campaigns: usize,
    pub products: usize,
    pub opportunities: usize,
    pub activities: usize,
}

impl Default for EntityCounts {
    fn default() -> Self {
        Self {
            users: 25,
            accounts: 200,
            contacts: None,
            leads: 300,
            campaigns: 50,
            products: 10,
            opportunities: 800,
            activities: 2000,
        }
    }
}

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed for the single RNG threaded through every generator.
    pub seed: u64,
    /// First day of generated business dates.
    pub start_date: NaiveDate,
    /// Last day of generated business dates.
    pub end_date: NaiveDate,
    /// Reference "today" for deal age, campaign status and forward close dates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub counts: EntityCounts,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default(),
            as_of: None,
            counts: EntityCounts::default(),
        }
    }
}

impl GenerationConfig {
    pub fn as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or(self.end_date)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.start_date > self.end_date {
            return Err(GenerationError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        let counts = &self.counts;
        if counts.users == 0 {
            return Err(GenerationError::InvalidConfig(
                "at least one user is required to own records".to_string(),
            ));
        }
        let needs_window = counts.opportunities > 0 || counts.campaigns > 0;
        if needs_window && (self.end_date - self.start_date).num_days() < MIN_WINDOW_DAYS {
            return Err(GenerationError::InvalidConfig(format!(
                "date window must span at least {MIN_WINDOW_DAYS} days"
            )));
        }
        let needs_accounts = counts.opportunities > 0
            || counts.activities > 0
            || counts.contacts.is_some_and(|cap| cap > 0);
        if counts.accounts == 0 && needs_accounts {
            return Err(GenerationError::InvalidConfig(
                "contacts, opportunities and activities require at least one account".to_string(),
            ));
        }
        if counts.products == 0 && counts.opportunities > 0 {
            return Err(GenerationError::InvalidConfig(
                "opportunities require at least one product".to_string(),
            ));
        }
        Ok(())
    }
}

/// Record count for one generated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCount {
    pub collection: String,
    pub records: u64,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub entity: String,
    pub message: String,
}

impl GenerationIssue {
    pub fn warning(code: &str, entity: &str, message: impl Into<String>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            entity: entity.to_string(),
            message: message.into(),
        }
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub as_of: NaiveDate,
    pub counts: Vec<CollectionCount>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub duration_ms: u64,
    /// SHA-256 over the serialized dataset.
    pub fingerprint: String,
}

impl GenerationReport {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            seed: config.seed,
            start_date: config.start_date,
            end_date: config.end_date,
            as_of: config.as_of(),
            counts: Vec::new(),
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            duration_ms: 0,
            fingerprint: String::new(),
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    pub fn count_for(&self, collection: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|count| count.collection == collection)
            .map(|count| count.records)
    }
}
