use crate::distributions::pick_weighted;
use crate::errors::GenerationError;
use crate::faker;
use crate::generators::{GenerationContext, pick};
use crate::ids::{CONTACT_PREFIX, allocate};
use crate::records::{Account, Contact};
use crate::reference::{CONTACT_DEPARTMENTS, LEAD_SOURCES, TITLES};

const EMPLOYEES_PER_CONTACT: u32 = 100;
const MAX_CONTACTS_PER_ACCOUNT: u32 = 5;

/// Number of contacts an account of the given size carries.
pub fn contacts_for_size(employees: u32) -> usize {
    (employees / EMPLOYEES_PER_CONTACT).clamp(1, MAX_CONTACTS_PER_ACCOUNT) as usize
}

/// Generate contacts per account, inheriting owner and created date.
///
/// `cap` truncates the total once reached; accounts past it get no contacts.
pub fn generate_contacts(
    accounts: &[Account],
    cap: Option<usize>,
    ctx: &mut GenerationContext,
) -> Result<Vec<Contact>, GenerationError> {
    let expected: usize = accounts
        .iter()
        .map(|account| contacts_for_size(account.number_of_employees))
        .sum();
    let limit = cap.map_or(expected, |cap| cap.min(expected));
    let mut contacts = Vec::with_capacity(limit);

    'accounts: for account in accounts {
        let domain = faker::company_domain(&account.name);
        for _ in 0..contacts_for_size(account.number_of_employees) {
            if contacts.len() == limit {
                break 'accounts;
            }
            let rng = &mut ctx.rng;
            let name = faker::person_name(rng);
            contacts.push(Contact {
                id: allocate(CONTACT_PREFIX, rng),
                account_id: account.id.clone(),
                email: name.email_at(&domain),
                phone: faker::phone(rng),
                title: *pick(TITLES, rng)?,
                department: *pick(CONTACT_DEPARTMENTS, rng)?,
                lead_source: pick_weighted(LEAD_SOURCES, rng)?,
                first_name: name.first,
                last_name: name.last,
                owner_id: account.owner_id.clone(),
                created_date: account.created_date,
            });
        }
    }

    Ok(contacts)
}
