use chrono::TimeDelta;
use rand::Rng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use crate::distributions::{
    bounded_lognormal, chance, date_in_range, day_offset, from_cents, pick_weighted, round_cents,
    to_cents, uniform,
};
use crate::errors::GenerationError;
use crate::generators::products::ProductCatalog;
use crate::generators::{GenerationContext, active_users, at_midnight, pick};
use crate::ids::{LINE_ITEM_PREFIX, OPPORTUNITY_PREFIX, allocate};
use crate::records::{Account, Opportunity, OpportunityLineItem, User};
use crate::reference::{
    CLOSED_LOST, CLOSED_STAGES, CLOSED_WON, EARLY_OPEN_STAGES, LATE_OPEN_STAGES, LEAD_SOURCES,
    OPEN_STAGES, OPPORTUNITY_NAME_SUFFIXES, OPPORTUNITY_TYPES, is_closed_stage, stage_probability,
};

pub const MIN_AMOUNT: f64 = 1_000.0;
pub const MAX_AMOUNT: f64 = 500_000.0;
const AMOUNT_MU: f64 = 9.0;
const AMOUNT_SIGMA: f64 = 1.2;
/// Employees per unit of deal-size multiplier.
const SIZE_SCALE: f64 = 10_000.0;
/// Closed deals above this amount risk a forced loss.
pub const HIGH_VALUE_THRESHOLD: f64 = 100_000.0;
const HIGH_VALUE_LOSS_RATE: f64 = 0.30;
/// Deals are created no later than this many days before the window end.
const CREATION_LEAD_DAYS: i64 = 30;
const FORWARD_CLOSE_DAYS: i64 = 180;
const MAX_LINE_ITEMS: usize = 3;
/// Share of the unallocated amount taken by each non-final line item.
const LINE_SHARE: (f64, f64) = (0.2, 0.5);

/// Age bucket of a deal relative to the as-of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeTier {
    /// Older than 180 days.
    Mature,
    /// Between 90 and 180 days.
    Maturing,
    /// Younger than 90 days.
    Fresh,
}

impl AgeTier {
    pub fn for_age(days_old: i64) -> Self {
        if days_old > 180 {
            AgeTier::Mature
        } else if days_old > 90 {
            AgeTier::Maturing
        } else {
            AgeTier::Fresh
        }
    }

    pub fn closed_rate(self) -> f64 {
        match self {
            AgeTier::Mature => 0.8,
            AgeTier::Maturing => 0.5,
            AgeTier::Fresh => 0.0,
        }
    }

    pub fn open_stages(self) -> &'static [&'static str] {
        match self {
            AgeTier::Mature => OPEN_STAGES,
            AgeTier::Maturing => LATE_OPEN_STAGES,
            AgeTier::Fresh => EARLY_OPEN_STAGES,
        }
    }
}

/// Stage together with the fields derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: &'static str,
    pub probability: u8,
    pub is_closed: bool,
    pub is_won: bool,
}

impl StageOutcome {
    pub fn for_stage(stage: &'static str) -> Result<Self, GenerationError> {
        let probability = stage_probability(stage).ok_or_else(|| {
            GenerationError::InvalidDistribution(format!("unknown opportunity stage '{stage}'"))
        })?;
        Ok(Self {
            stage,
            probability,
            is_closed: is_closed_stage(stage),
            is_won: stage == CLOSED_WON,
        })
    }
}

/// Pick a stage for a deal of the given age and amount.
pub fn draw_stage(
    days_old: i64,
    amount: f64,
    rng: &mut ChaCha8Rng,
) -> Result<StageOutcome, GenerationError> {
    let tier = AgeTier::for_age(days_old);
    let closed = tier.closed_rate() > 0.0 && chance(tier.closed_rate(), rng);
    let mut stage = if closed {
        *pick(CLOSED_STAGES, rng)?
    } else {
        *pick(tier.open_stages(), rng)?
    };
    if closed && amount > HIGH_VALUE_THRESHOLD && chance(HIGH_VALUE_LOSS_RATE, rng) {
        stage = CLOSED_LOST;
    }
    StageOutcome::for_stage(stage)
}

/// Split `amount_cents` into `parts` positive shares that sum to it exactly.
///
/// Every share but the last takes 20-50% of what is still unallocated; the last
/// absorbs the remainder.
pub fn split_amount(amount_cents: i64, parts: usize, rng: &mut ChaCha8Rng) -> Vec<i64> {
    let mut remaining = amount_cents;
    let mut shares = Vec::with_capacity(parts);
    for index in 0..parts {
        if index + 1 == parts {
            shares.push(remaining);
        } else {
            let fraction = uniform(LINE_SHARE.0, LINE_SHARE.1, rng);
            let share = (remaining as f64 * fraction).round() as i64;
            remaining -= share;
            shares.push(share);
        }
    }
    shares
}

/// Units needed to cover `total` at `list_price`, never less than one.
pub fn quantity_for(total: f64, list_price: f64) -> u32 {
    if list_price <= 0.0 {
        return 1;
    }
    ((total / list_price).round() as u32).max(1)
}

pub struct OpportunityBatch {
    pub opportunities: Vec<Opportunity>,
    pub line_items: Vec<OpportunityLineItem>,
}

pub fn generate_opportunities(
    accounts: &[Account],
    users: &[User],
    catalog: &ProductCatalog,
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<OpportunityBatch, GenerationError> {
    let owners = active_users(users)?;
    let mut opportunities = Vec::with_capacity(count);
    let mut line_items = Vec::new();

    for _ in 0..count {
        let rng = &mut ctx.rng;
        let account = pick(accounts, rng)?;
        let created = date_in_range(
            ctx.start_date,
            ctx.end_date - TimeDelta::days(CREATION_LEAD_DAYS),
            false,
            rng,
        )?;

        let size_multiplier = 1.0 + f64::from(account.number_of_employees) / SIZE_SCALE;
        let amount = round_cents(bounded_lognormal(
            AMOUNT_MU + size_multiplier.ln(),
            AMOUNT_SIGMA,
            MIN_AMOUNT,
            MAX_AMOUNT,
            rng,
        )?);

        let days_old = (ctx.as_of - created).num_days();
        let outcome = draw_stage(days_old, amount, rng)?;

        let close_date = if outcome.is_closed {
            created + day_offset(30, 180, rng)
        } else {
            date_in_range(
                ctx.as_of,
                ctx.as_of + TimeDelta::days(FORWARD_CLOSE_DAYS),
                true,
                rng,
            )?
        };

        let id = allocate(OPPORTUNITY_PREFIX, rng);
        let suffix = pick(OPPORTUNITY_NAME_SUFFIXES, rng)?;
        let created_date = at_midnight(created);
        let opportunity = Opportunity {
            id,
            account_id: account.id.clone(),
            name: format!("{} - {}", account.name, suffix),
            stage_name: outcome.stage,
            amount,
            probability: outcome.probability,
            close_date,
            opportunity_type: pick_weighted(OPPORTUNITY_TYPES, rng)?,
            lead_source: pick_weighted(LEAD_SOURCES, rng)?,
            owner_id: pick(&owners, rng)?.id.clone(),
            is_closed: outcome.is_closed,
            is_won: outcome.is_won,
            created_date,
            last_modified_date: created_date + day_offset(1, 60, rng),
        };

        line_items.extend(generate_line_items(&opportunity, catalog, rng)?);
        opportunities.push(opportunity);
    }

    Ok(OpportunityBatch {
        opportunities,
        line_items,
    })
}

fn generate_line_items(
    opportunity: &Opportunity,
    catalog: &ProductCatalog,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<OpportunityLineItem>, GenerationError> {
    let available = catalog.products.len();
    let wanted = rng.random_range(1..=MAX_LINE_ITEMS).min(available);
    let picked = index::sample(rng, available, wanted);
    let shares = split_amount(to_cents(opportunity.amount), picked.len(), rng);

    let mut items = Vec::with_capacity(shares.len());
    for (product_index, share) in picked.iter().zip(shares) {
        let (product, entry) = catalog.entry_for(product_index).ok_or_else(|| {
            GenerationError::InvalidConfig(format!("product {product_index} has no price entry"))
        })?;
        let total_price = from_cents(share);
        let quantity = quantity_for(total_price, entry.unit_price);
        items.push(OpportunityLineItem {
            id: allocate(LINE_ITEM_PREFIX, rng),
            opportunity_id: opportunity.id.clone(),
            product_id: product.id.clone(),
            pricebook_entry_id: entry.id.clone(),
            quantity,
            list_price: entry.unit_price,
            unit_price: round_cents(total_price / f64::from(quantity)),
            total_price,
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    const DRAWS: usize = 4_000;

    fn outcomes(days_old: i64, amount: f64, seed: u64) -> Vec<StageOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..DRAWS)
            .map(|_| draw_stage(days_old, amount, &mut rng).expect("known stage"))
            .collect()
    }

    fn share(outcomes: &[StageOutcome], keep: impl Fn(&StageOutcome) -> bool) -> f64 {
        outcomes.iter().filter(|outcome| keep(outcome)).count() as f64 / outcomes.len() as f64
    }

    #[test]
    fn age_tier_boundaries() {
        assert_eq!(AgeTier::for_age(0), AgeTier::Fresh);
        assert_eq!(AgeTier::for_age(90), AgeTier::Fresh);
        assert_eq!(AgeTier::for_age(91), AgeTier::Maturing);
        assert_eq!(AgeTier::for_age(180), AgeTier::Maturing);
        assert_eq!(AgeTier::for_age(181), AgeTier::Mature);
    }

    #[test]
    fn fresh_deals_stay_open_in_early_stages() {
        for outcome in outcomes(30, 250_000.0, 1) {
            assert!(!outcome.is_closed, "fresh deal closed as {}", outcome.stage);
            assert!(EARLY_OPEN_STAGES.contains(&outcome.stage));
        }
    }

    #[test]
    fn maturing_deals_close_half_the_time_and_stay_late_otherwise() {
        let drawn = outcomes(120, 20_000.0, 2);
        for outcome in drawn.iter().filter(|outcome| !outcome.is_closed) {
            assert!(LATE_OPEN_STAGES.contains(&outcome.stage), "{}", outcome.stage);
        }
        let closed = share(&drawn, |outcome| outcome.is_closed);
        assert!((0.45..0.55).contains(&closed), "closed share {closed}");
    }

    #[test]
    fn mature_deals_mostly_close() {
        let closed = share(&outcomes(400, 20_000.0, 3), |outcome| outcome.is_closed);
        assert!((0.75..0.85).contains(&closed), "closed share {closed}");
    }

    #[test]
    fn high_value_deals_lose_more_often() {
        let lost = |outcome: &StageOutcome| outcome.stage == CLOSED_LOST;
        let closed_only = |drawn: Vec<StageOutcome>| -> Vec<StageOutcome> {
            drawn.into_iter().filter(|outcome| outcome.is_closed).collect()
        };
        let small = share(&closed_only(outcomes(400, 50_000.0, 4)), lost);
        let large = share(&closed_only(outcomes(400, 250_000.0, 4)), lost);
        assert!((0.45..0.55).contains(&small), "small deal loss share {small}");
        assert!((0.60..0.70).contains(&large), "large deal loss share {large}");
    }

    #[test]
    fn outcome_fields_follow_stage() {
        for outcome in outcomes(400, 250_000.0, 5) {
            assert_eq!(outcome.is_won, outcome.stage == CLOSED_WON);
            assert_eq!(outcome.is_closed, is_closed_stage(outcome.stage));
            assert_eq!(Some(outcome.probability), stage_probability(outcome.stage));
        }
    }

    #[test]
    fn split_amount_sums_exactly_with_positive_shares() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for amount_cents in [100_000, 123_457, 9_999_999, 50_000_000] {
            for parts in 1..=MAX_LINE_ITEMS {
                let shares = split_amount(amount_cents, parts, &mut rng);
                assert_eq!(shares.len(), parts);
                assert_eq!(shares.iter().sum::<i64>(), amount_cents);
                assert!(shares.iter().all(|share| *share > 0), "{shares:?}");
            }
        }
    }

    #[test]
    fn quantity_is_at_least_one() {
        assert_eq!(quantity_for(1_000.0, 300.0), 3);
        assert_eq!(quantity_for(10.0, 100.0), 1);
        assert_eq!(quantity_for(500.0, 0.0), 1);
    }
}
