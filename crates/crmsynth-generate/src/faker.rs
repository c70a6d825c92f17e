//! Thin adapter over `fake` for the person, company and address values the
//! generators need. Every call draws from the caller's RNG.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::{CatchPhrase, CompanyName};
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;

/// Mail domain of the selling organization.
pub const ORG_DOMAIN: &str = "company.com";

pub struct PersonName {
    pub first: String,
    pub last: String,
}

impl PersonName {
    pub fn full(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    pub fn email_at(&self, domain: &str) -> String {
        format!("{}.{}@{}", slug(&self.first), slug(&self.last), domain)
    }
}

/// Postal address parts in the order they are emitted.
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

pub fn person_name(rng: &mut impl Rng) -> PersonName {
    let first: String = FirstName().fake_with_rng(rng);
    let last: String = LastName().fake_with_rng(rng);
    PersonName { first, last }
}

pub fn company_name(rng: &mut impl Rng) -> String {
    CompanyName().fake_with_rng(rng)
}

pub fn catch_phrase(rng: &mut impl Rng) -> String {
    CatchPhrase().fake_with_rng(rng)
}

pub fn username(rng: &mut impl Rng) -> String {
    let name: String = Username().fake_with_rng(rng);
    format!("{name}@{ORG_DOMAIN}")
}

pub fn address(rng: &mut impl Rng) -> Address {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    Address {
        street: format!("{number} {street}"),
        city: CityName().fake_with_rng(rng),
        state: StateAbbr().fake_with_rng(rng),
        postal_code: ZipCode().fake_with_rng(rng),
    }
}

pub fn phone(rng: &mut impl Rng) -> String {
    PhoneNumber().fake_with_rng(rng)
}

pub fn sentence(rng: &mut impl Rng) -> String {
    Sentence(4..10).fake_with_rng(rng)
}

/// Mail domain derived from a company name, e.g. `Acme, Inc` -> `acmeinc.com`.
pub fn company_domain(company: &str) -> String {
    let base = slug(company);
    if base.is_empty() {
        ORG_DOMAIN.to_string()
    } else {
        format!("{base}.com")
    }
}

fn slug(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
