use std::collections::HashMap;

use rand::Rng;

use crate::distributions::{chance, date_in_range, day_offset};
use crate::errors::GenerationError;
use crate::faker;
use crate::generators::{GenerationContext, active_users, at_midnight, pick};
use crate::ids::{RecordId, TASK_PREFIX, allocate};
use crate::records::{Account, Contact, Opportunity, Task, User};
use crate::reference::{TASK_CALL, TASK_PRIORITIES, TASK_STATUSES, TASK_TYPES, task_subjects};

/// Share of activities logged against accounts that have open or past deals.
const DEAL_ACCOUNT_SHARE: f64 = 0.70;
const CALL_SECONDS: (u32, u32) = (60, 3_600);

/// Account-indexed lookups over upstream collections, preserving generation
/// order inside each bucket.
struct AccountIndex<'a> {
    contacts: HashMap<&'a RecordId, Vec<&'a Contact>>,
    opportunities: HashMap<&'a RecordId, Vec<&'a Opportunity>>,
    with_deals: Vec<&'a Account>,
}

impl<'a> AccountIndex<'a> {
    fn new(
        accounts: &'a [Account],
        contacts: &'a [Contact],
        opportunities: &'a [Opportunity],
    ) -> Self {
        let mut by_account: HashMap<&RecordId, Vec<&Contact>> = HashMap::new();
        for contact in contacts {
            by_account.entry(&contact.account_id).or_default().push(contact);
        }
        let mut deals: HashMap<&RecordId, Vec<&Opportunity>> = HashMap::new();
        for opportunity in opportunities {
            deals.entry(&opportunity.account_id).or_default().push(opportunity);
        }
        let with_deals = accounts
            .iter()
            .filter(|account| deals.contains_key(&account.id))
            .collect();
        Self {
            contacts: by_account,
            opportunities: deals,
            with_deals,
        }
    }
}

/// Generate tasks clustered around the deals of their account.
pub fn generate_activities(
    accounts: &[Account],
    contacts: &[Contact],
    opportunities: &[Opportunity],
    users: &[User],
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<Vec<Task>, GenerationError> {
    let owners = active_users(users)?;
    let index = AccountIndex::new(accounts, contacts, opportunities);
    let mut tasks = Vec::with_capacity(count);

    for _ in 0..count {
        let rng = &mut ctx.rng;
        let account = if chance(DEAL_ACCOUNT_SHARE, rng) && !index.with_deals.is_empty() {
            *pick(&index.with_deals, rng)?
        } else {
            pick(accounts, rng)?
        };

        let who = match index.contacts.get(&account.id) {
            Some(candidates) => Some(pick(candidates, rng)?.id.clone()),
            None => None,
        };

        let activity_date = match index.opportunities.get(&account.id) {
            Some(deals) => pick(deals, rng)?.created_date.date() + day_offset(-30, 90, rng),
            None => date_in_range(ctx.start_date, ctx.end_date, false, rng)?,
        };

        let task_type = *pick(TASK_TYPES, rng)?;
        let duration = if task_type == TASK_CALL {
            rng.random_range(CALL_SECONDS.0..=CALL_SECONDS.1)
        } else {
            0
        };

        tasks.push(Task {
            id: allocate(TASK_PREFIX, rng),
            who_id: who,
            what_id: account.id.clone(),
            owner_id: pick(&owners, rng)?.id.clone(),
            subject: *pick(task_subjects(task_type), rng)?,
            status: *pick(TASK_STATUSES, rng)?,
            priority: *pick(TASK_PRIORITIES, rng)?,
            task_type,
            activity_date,
            description: faker::sentence(rng),
            call_duration_in_seconds: duration,
            created_date: at_midnight(activity_date),
        });
    }

    Ok(tasks)
}
