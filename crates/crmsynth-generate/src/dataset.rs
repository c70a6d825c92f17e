use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::GenerationError;
use crate::model::CollectionCount;
use crate::records::{
    Account, Campaign, CampaignMember, Contact, Lead, Opportunity, OpportunityLineItem,
    PricebookEntry, Product, Record, Task, User, to_record,
};

pub const USERS: &str = "users";
pub const ACCOUNTS: &str = "accounts";
pub const CONTACTS: &str = "contacts";
pub const LEADS: &str = "leads";
pub const CAMPAIGNS: &str = "campaigns";
pub const CAMPAIGN_MEMBERS: &str = "campaign_members";
pub const PRODUCTS: &str = "products";
pub const PRICEBOOK_ENTRIES: &str = "pricebook_entries";
pub const OPPORTUNITIES: &str = "opportunities";
pub const OPPORTUNITY_LINE_ITEMS: &str = "opportunity_line_items";
pub const TASKS: &str = "tasks";

/// One named, ordered collection of flat records.
#[derive(Debug, Clone)]
pub struct Collection {
    pub name: &'static str,
    pub records: Vec<Record>,
}

/// Every entity collection produced by one generation run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub accounts: Vec<Account>,
    pub contacts: Vec<Contact>,
    pub leads: Vec<Lead>,
    pub campaigns: Vec<Campaign>,
    pub campaign_members: Vec<CampaignMember>,
    pub products: Vec<Product>,
    pub pricebook_entries: Vec<PricebookEntry>,
    pub opportunities: Vec<Opportunity>,
    pub opportunity_line_items: Vec<OpportunityLineItem>,
    pub tasks: Vec<Task>,
}

impl Dataset {
    /// Record counts per collection, in emission order.
    pub fn summary(&self) -> Vec<CollectionCount> {
        [
            (USERS, self.users.len()),
            (ACCOUNTS, self.accounts.len()),
            (CONTACTS, self.contacts.len()),
            (LEADS, self.leads.len()),
            (CAMPAIGNS, self.campaigns.len()),
            (CAMPAIGN_MEMBERS, self.campaign_members.len()),
            (PRODUCTS, self.products.len()),
            (PRICEBOOK_ENTRIES, self.pricebook_entries.len()),
            (OPPORTUNITIES, self.opportunities.len()),
            (OPPORTUNITY_LINE_ITEMS, self.opportunity_line_items.len()),
            (TASKS, self.tasks.len()),
        ]
        .into_iter()
        .map(|(collection, records)| CollectionCount {
            collection: collection.to_string(),
            records: records as u64,
        })
        .collect()
    }

    /// All collections flattened into records, in emission order.
    pub fn collections(&self) -> Result<Vec<Collection>, GenerationError> {
        Ok(vec![
            collection(USERS, &self.users)?,
            collection(ACCOUNTS, &self.accounts)?,
            collection(CONTACTS, &self.contacts)?,
            collection(LEADS, &self.leads)?,
            collection(CAMPAIGNS, &self.campaigns)?,
            collection(CAMPAIGN_MEMBERS, &self.campaign_members)?,
            collection(PRODUCTS, &self.products)?,
            collection(PRICEBOOK_ENTRIES, &self.pricebook_entries)?,
            collection(OPPORTUNITIES, &self.opportunities)?,
            collection(OPPORTUNITY_LINE_ITEMS, &self.opportunity_line_items)?,
            collection(TASKS, &self.tasks)?,
        ])
    }

    /// Hex SHA-256 over every collection's serialized records.
    pub fn fingerprint(&self) -> Result<String, GenerationError> {
        let mut hasher = Sha256::new();
        for collection in self.collections()? {
            hasher.update(collection.name.as_bytes());
            hasher.update(serde_json::to_vec(&collection.records)?);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

fn collection<T: Serialize>(
    name: &'static str,
    entities: &[T],
) -> Result<Collection, GenerationError> {
    let records = entities
        .iter()
        .map(to_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Collection { name, records })
}
