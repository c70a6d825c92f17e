//! One generator per entity type. Each takes its upstream collections, a target
//! count and the shared [`GenerationContext`], and returns new records only.

use chrono::{NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::errors::GenerationError;
use crate::model::{GenerationConfig, GenerationIssue};
use crate::records::User;

pub mod accounts;
pub mod activities;
pub mod campaign_members;
pub mod campaigns;
pub mod contacts;
pub mod leads;
pub mod opportunities;
pub mod products;
pub mod users;

pub const INSUFFICIENT_POOL: &str = "insufficient_pool";

/// State threaded through every generator call, in call order.
pub struct GenerationContext {
    pub rng: ChaCha8Rng,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub as_of: NaiveDate,
    issues: Vec<GenerationIssue>,
}

impl GenerationContext {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            start_date: config.start_date,
            end_date: config.end_date,
            as_of: config.as_of(),
            issues: Vec::new(),
        }
    }

    /// Cap a sampling request to the available pool, recording a warning when
    /// the pool is too small.
    pub fn cap_to_pool(&mut self, entity: &str, requested: usize, available: usize) -> usize {
        if requested <= available {
            return requested;
        }
        warn!(entity, requested, available, "request capped to pool size");
        self.issues.push(GenerationIssue::warning(
            INSUFFICIENT_POOL,
            entity,
            format!("requested {requested} but only {available} available"),
        ));
        available
    }

    pub fn take_issues(&mut self) -> Vec<GenerationIssue> {
        std::mem::take(&mut self.issues)
    }
}

/// Users that may own new records.
pub fn active_users(users: &[User]) -> Result<Vec<&User>, GenerationError> {
    let active: Vec<&User> = users.iter().filter(|user| user.is_active).collect();
    if active.is_empty() {
        return Err(GenerationError::InvalidConfig(
            "no active user available to own records".to_string(),
        ));
    }
    Ok(active)
}

/// Uniform pick from a non-empty slice.
pub fn pick<'a, T>(items: &'a [T], rng: &mut ChaCha8Rng) -> Result<&'a T, GenerationError> {
    items.choose(rng).ok_or_else(|| {
        GenerationError::InvalidDistribution("cannot pick from an empty pool".to_string())
    })
}

/// Midnight timestamp for a generated business date.
pub fn at_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
