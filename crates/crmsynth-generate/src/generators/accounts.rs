use crate::distributions::{
    bounded_lognormal, date_in_range, day_offset, pick_weighted, round_cents, uniform,
};
use crate::errors::GenerationError;
use crate::faker;
use crate::generators::{GenerationContext, active_users, at_midnight, pick};
use crate::ids::{ACCOUNT_PREFIX, allocate};
use crate::records::{Account, User};
use crate::reference::{ACCOUNT_TYPES, INDUSTRIES};

pub const MIN_EMPLOYEES: u32 = 10;
pub const MAX_EMPLOYEES: u32 = 100_000;
const EMPLOYEES_MU: f64 = 5.0;
const EMPLOYEES_SIGMA: f64 = 1.5;

/// Revenue per employee, drawn uniformly, keeps revenue monotone in size.
pub const REVENUE_PER_EMPLOYEE: (f64, f64) = (50_000.0, 200_000.0);

pub fn generate_accounts(
    users: &[User],
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<Vec<Account>, GenerationError> {
    let owners = active_users(users)?;
    let mut accounts = Vec::with_capacity(count);

    for _ in 0..count {
        let rng = &mut ctx.rng;
        let employees = bounded_lognormal(
            EMPLOYEES_MU,
            EMPLOYEES_SIGMA,
            f64::from(MIN_EMPLOYEES),
            f64::from(MAX_EMPLOYEES),
            rng,
        )? as u32;
        let revenue =
            f64::from(employees) * uniform(REVENUE_PER_EMPLOYEE.0, REVENUE_PER_EMPLOYEE.1, rng);
        let created = date_in_range(ctx.start_date, ctx.end_date, false, rng)?;
        let name = faker::company_name(rng);
        let industry = pick_weighted(INDUSTRIES, rng)?;
        let account_type = pick_weighted(ACCOUNT_TYPES, rng)?;
        let address = faker::address(rng);
        let owner = pick(&owners, rng)?;
        let created_date = at_midnight(created);

        accounts.push(Account {
            id: allocate(ACCOUNT_PREFIX, rng),
            name,
            industry,
            account_type,
            number_of_employees: employees,
            annual_revenue: round_cents(revenue),
            billing_street: address.street,
            billing_city: address.city,
            billing_state: address.state,
            billing_postal_code: address.postal_code,
            billing_country: "USA",
            owner_id: owner.id.clone(),
            created_date,
            last_modified_date: created_date + day_offset(0, 30, rng),
        });
    }

    Ok(accounts)
}
