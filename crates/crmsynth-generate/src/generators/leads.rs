use crate::distributions::{
    bounded_lognormal, chance, date_in_range, day_offset, pick_weighted, round_cents, uniform,
};
use crate::errors::GenerationError;
use crate::faker;
use crate::generators::accounts::REVENUE_PER_EMPLOYEE;
use crate::generators::{GenerationContext, active_users, at_midnight, pick};
use crate::ids::{ACCOUNT_PREFIX, CONTACT_PREFIX, LEAD_PREFIX, OPPORTUNITY_PREFIX, allocate};
use crate::records::{ConversionState, Lead, LeadConversion, User};
use crate::reference::{
    INDUSTRIES, LEAD_CONVERTED_STATUS, LEAD_OPEN_STATUSES, LEAD_RATINGS, LEAD_SOURCES, TITLES,
};

pub const MIN_LEAD_EMPLOYEES: u32 = 10;
pub const MAX_LEAD_EMPLOYEES: u32 = 50_000;
const EMPLOYEES_MU: f64 = 4.0;
const EMPLOYEES_SIGMA: f64 = 1.5;
const CONVERSION_RATE: f64 = 0.30;
const CONVERTED_OPPORTUNITY_RATE: f64 = 0.80;

/// Generate leads, roughly 30% of them already converted.
///
/// Converted leads carry freshly allocated identifiers for the account,
/// contact and (80% of the time) opportunity they became. Those identifiers
/// are placeholders and do not match generated records.
pub fn generate_leads(
    users: &[User],
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<Vec<Lead>, GenerationError> {
    let owners = active_users(users)?;
    let mut leads = Vec::with_capacity(count);

    for _ in 0..count {
        let rng = &mut ctx.rng;
        let created = date_in_range(ctx.start_date, ctx.end_date, false, rng)?;

        let (status, conversion) = if chance(CONVERSION_RATE, rng) {
            let converted_date = created + day_offset(7, 90, rng);
            let account_id = allocate(ACCOUNT_PREFIX, rng);
            let contact_id = allocate(CONTACT_PREFIX, rng);
            let opportunity_id = chance(CONVERTED_OPPORTUNITY_RATE, rng)
                .then(|| allocate(OPPORTUNITY_PREFIX, rng));
            let conversion = LeadConversion {
                account_id,
                contact_id,
                opportunity_id,
                converted_date,
            };
            (LEAD_CONVERTED_STATUS, ConversionState::Converted(conversion))
        } else {
            (*pick(LEAD_OPEN_STATUSES, rng)?, ConversionState::Open)
        };

        let employees = bounded_lognormal(
            EMPLOYEES_MU,
            EMPLOYEES_SIGMA,
            f64::from(MIN_LEAD_EMPLOYEES),
            f64::from(MAX_LEAD_EMPLOYEES),
            rng,
        )? as u32;
        let revenue =
            f64::from(employees) * uniform(REVENUE_PER_EMPLOYEE.0, REVENUE_PER_EMPLOYEE.1, rng);

        let id = allocate(LEAD_PREFIX, rng);
        let name = faker::person_name(rng);
        let company = faker::company_name(rng);
        let address = faker::address(rng);
        let created_date = at_midnight(created);

        leads.push(Lead {
            id,
            email: name.email_at(&faker::company_domain(&company)),
            last_name: name.last,
            first_name: name.first,
            company,
            title: *pick(TITLES, rng)?,
            phone: faker::phone(rng),
            status,
            rating: *pick(LEAD_RATINGS, rng)?,
            lead_source: pick_weighted(LEAD_SOURCES, rng)?,
            industry: pick_weighted(INDUSTRIES, rng)?,
            annual_revenue: round_cents(revenue),
            number_of_employees: employees,
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: "USA",
            description: faker::sentence(rng),
            owner_id: pick(&owners, rng)?.id.clone(),
            conversion,
            created_date,
            last_modified_date: created_date + day_offset(1, 30, rng),
            is_deleted: false,
        });
    }

    Ok(leads)
}
