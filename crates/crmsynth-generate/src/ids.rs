use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 15;

pub const USER_PREFIX: &str = "005";
pub const USER_ROLE_PREFIX: &str = "00E";
pub const ACCOUNT_PREFIX: &str = "001";
pub const CONTACT_PREFIX: &str = "003";
pub const PRODUCT_PREFIX: &str = "01t";
pub const PRICEBOOK_ENTRY_PREFIX: &str = "01u";
pub const OPPORTUNITY_PREFIX: &str = "006";
pub const LINE_ITEM_PREFIX: &str = "00k";
pub const TASK_PREFIX: &str = "00T";
pub const CAMPAIGN_PREFIX: &str = "701";
pub const CAMPAIGN_MEMBER_PREFIX: &str = "00v";
pub const LEAD_PREFIX: &str = "00Q";

/// Salesforce-style record identifier: a key prefix followed by a fixed-length
/// alphanumeric suffix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prefix(&self) -> &str {
        &self.0[..self.0.len().saturating_sub(ID_SUFFIX_LEN)]
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allocate a new identifier for the given key prefix.
///
/// Uniqueness is probabilistic: 62^15 suffixes make collisions negligible at
/// the volumes this engine produces, so callers never deduplicate.
pub fn allocate(prefix: &str, rng: &mut impl Rng) -> RecordId {
    let mut id = String::with_capacity(prefix.len() + ID_SUFFIX_LEN);
    id.push_str(prefix);
    for _ in 0..ID_SUFFIX_LEN {
        let idx = rng.random_range(0..ID_CHARSET.len());
        id.push(ID_CHARSET[idx] as char);
    }
    RecordId(id)
}
