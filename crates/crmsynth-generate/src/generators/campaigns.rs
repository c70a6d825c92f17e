use chrono::{Datelike, NaiveDate, TimeDelta};
use rand::Rng;

use crate::distributions::{chance, date_in_range, day_offset, pick_weighted, round_cents, uniform};
use crate::errors::GenerationError;
use crate::faker;
use crate::generators::{GenerationContext, active_users, at_midnight, pick};
use crate::ids::{CAMPAIGN_PREFIX, RecordId, allocate};
use crate::records::{Campaign, User};
use crate::reference::{
    CAMPAIGN_ABORTED, CAMPAIGN_COMPLETED, CAMPAIGN_IN_PROGRESS, CAMPAIGN_PLANNED,
    CAMPAIGN_THEMES, CAMPAIGN_TYPES,
};

const PARENT_SHARE: usize = 10;
const PARENT_LINK_RATE: f64 = 0.5;
const COMPLETED_RATE: f64 = 0.9;

/// Where a campaign sits relative to the as-of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignPhase {
    Ended,
    Upcoming,
    Running,
}

impl CampaignPhase {
    pub fn of(start: NaiveDate, end: NaiveDate, as_of: NaiveDate) -> Self {
        if end < as_of {
            CampaignPhase::Ended
        } else if start > as_of {
            CampaignPhase::Upcoming
        } else {
            CampaignPhase::Running
        }
    }
}

/// Campaign status for a phase; ended campaigns complete 90% of the time.
pub fn draw_status(phase: CampaignPhase, rng: &mut impl Rng) -> &'static str {
    match phase {
        CampaignPhase::Ended if chance(COMPLETED_RATE, rng) => CAMPAIGN_COMPLETED,
        CampaignPhase::Ended => CAMPAIGN_ABORTED,
        CampaignPhase::Upcoming => CAMPAIGN_PLANNED,
        CampaignPhase::Running => CAMPAIGN_IN_PROGRESS,
    }
}

/// Number of parent campaigns for a total of `count` campaigns.
pub fn parent_count(count: usize) -> usize {
    if count == 0 {
        0
    } else {
        (count / PARENT_SHARE).max(1)
    }
}

/// Shape parameters that differ between the two generation stages.
struct Tier {
    created_from: NaiveDate,
    created_to: NaiveDate,
    lead_days: (i64, i64),
    duration_days: (i64, i64),
    budget: (u32, u32),
    number_sent: (u32, u32),
}

/// Campaigns generated in two stages: parents first, then children that may
/// only reference an already generated parent.
pub struct CampaignHierarchy {
    pub parents: Vec<Campaign>,
    pub children: Vec<Campaign>,
}

impl CampaignHierarchy {
    pub fn into_campaigns(self) -> Vec<Campaign> {
        let mut campaigns = self.parents;
        campaigns.extend(self.children);
        campaigns
    }
}

pub fn generate_campaigns(
    users: &[User],
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<CampaignHierarchy, GenerationError> {
    let owners: Vec<RecordId> = active_users(users)?
        .into_iter()
        .map(|user| user.id.clone())
        .collect();
    let parents_total = parent_count(count);
    let parents = generate_parent_campaigns(&owners, parents_total, ctx)?;
    let children = generate_child_campaigns(&parents, &owners, count - parents_total, ctx)?;
    Ok(CampaignHierarchy { parents, children })
}

/// First stage: top-level campaigns with larger budgets and longer runs.
pub fn generate_parent_campaigns(
    owners: &[RecordId],
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<Vec<Campaign>, GenerationError> {
    let tier = Tier {
        created_from: ctx.start_date - TimeDelta::days(180),
        created_to: ctx.end_date - TimeDelta::days(90),
        lead_days: (7, 30),
        duration_days: (30, 180),
        budget: (5_000, 100_000),
        number_sent: (100, 5_000),
    };
    let mut campaigns = Vec::with_capacity(count);
    for _ in 0..count {
        let mut campaign = new_campaign(&tier, owners, ctx)?;
        let rng = &mut ctx.rng;
        let quarter = rng.random_range(1..=4);
        let theme = pick(CAMPAIGN_THEMES, rng)?;
        campaign.name = format!("Q{quarter} {} {theme}", campaign.start_date.year());
        campaigns.push(campaign);
    }
    Ok(campaigns)
}

/// Second stage: shorter campaigns, half of them rolled up under a parent.
pub fn generate_child_campaigns(
    parents: &[Campaign],
    owners: &[RecordId],
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<Vec<Campaign>, GenerationError> {
    let tier = Tier {
        created_from: ctx.start_date,
        created_to: ctx.end_date - TimeDelta::days(30),
        lead_days: (7, 30),
        duration_days: (7, 90),
        budget: (1_000, 50_000),
        number_sent: (50, 2_000),
    };
    let mut campaigns = Vec::with_capacity(count);
    for _ in 0..count {
        let mut campaign = new_campaign(&tier, owners, ctx)?;
        let rng = &mut ctx.rng;
        campaign.name = format!("{} - {}", campaign.campaign_type, faker::catch_phrase(rng));
        if !parents.is_empty() && chance(PARENT_LINK_RATE, rng) {
            campaign.parent_id = Some(pick(parents, rng)?.id.clone());
        }
        campaigns.push(campaign);
    }
    Ok(campaigns)
}

fn new_campaign(
    tier: &Tier,
    owners: &[RecordId],
    ctx: &mut GenerationContext,
) -> Result<Campaign, GenerationError> {
    let as_of = ctx.as_of;
    let rng = &mut ctx.rng;
    let created = date_in_range(tier.created_from, tier.created_to, false, rng)?;
    let start_date = created + day_offset(tier.lead_days.0, tier.lead_days.1, rng);
    let end_date = start_date + day_offset(tier.duration_days.0, tier.duration_days.1, rng);

    let phase = CampaignPhase::of(start_date, end_date, as_of);
    let status = draw_status(phase, rng);

    let budget = f64::from(rng.random_range(tier.budget.0..=tier.budget.1));
    let actual_cost = if phase == CampaignPhase::Ended {
        budget * uniform(0.7, 1.2, rng)
    } else {
        0.0
    };
    let expected_revenue = budget * uniform(2.0, 8.0, rng);
    let created_date = at_midnight(created);

    Ok(Campaign {
        id: allocate(CAMPAIGN_PREFIX, rng),
        name: String::new(),
        campaign_type: pick_weighted(CAMPAIGN_TYPES, rng)?,
        status,
        start_date,
        end_date,
        is_active: status == CAMPAIGN_IN_PROGRESS,
        description: faker::sentence(rng),
        budgeted_cost: budget,
        actual_cost: round_cents(actual_cost),
        expected_revenue: round_cents(expected_revenue),
        number_sent: rng.random_range(tier.number_sent.0..=tier.number_sent.1),
        parent_id: None,
        owner_id: pick(owners, rng)?.clone(),
        created_date,
        last_modified_date: created_date + day_offset(1, 30, rng),
        is_deleted: false,
    })
}
