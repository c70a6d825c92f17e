use chrono::{NaiveDate, TimeDelta};

use crate::distributions::{chance, date_in_range};
use crate::errors::GenerationError;
use crate::faker;
use crate::generators::{GenerationContext, at_midnight, pick};
use crate::ids::{RecordId, USER_PREFIX, USER_ROLE_PREFIX, allocate};
use crate::records::User;
use crate::reference::USER_DEPARTMENTS;

const INACTIVE_RATE: f64 = 0.10;
const TENURE_DAYS: i64 = 365;

/// Generate the sales team: one root manager followed by `count - 1` reports.
///
/// The root is created `TENURE_DAYS` before the window start; reports are
/// created strictly later.
pub fn generate_users(
    count: usize,
    ctx: &mut GenerationContext,
) -> Result<Vec<User>, GenerationError> {
    let mut users = Vec::with_capacity(count);
    if count == 0 {
        return Ok(users);
    }

    let root_created = ctx.start_date - TimeDelta::days(TENURE_DAYS);
    let root = new_user(None, "Sales", true, root_created, ctx);
    let root_id = root.id.clone();
    users.push(root);

    for _ in 1..count {
        let department = *pick(USER_DEPARTMENTS, &mut ctx.rng)?;
        let is_active = !chance(INACTIVE_RATE, &mut ctx.rng);
        let created = date_in_range(
            root_created + TimeDelta::days(1),
            ctx.end_date,
            false,
            &mut ctx.rng,
        )?;
        users.push(new_user(
            Some(root_id.clone()),
            department,
            is_active,
            created,
            ctx,
        ));
    }

    Ok(users)
}

fn new_user(
    manager_id: Option<RecordId>,
    department: &'static str,
    is_active: bool,
    created: NaiveDate,
    ctx: &mut GenerationContext,
) -> User {
    let rng = &mut ctx.rng;
    let id = allocate(USER_PREFIX, rng);
    let name = faker::person_name(rng);
    User {
        id,
        email: name.email_at(faker::ORG_DOMAIN),
        name: name.full(),
        username: faker::username(rng),
        department,
        user_role_id: allocate(USER_ROLE_PREFIX, rng),
        manager_id,
        is_active,
        created_date: at_midnight(created),
    }
}
