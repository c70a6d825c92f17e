//! Post-generation verification of dataset invariants.
//!
//! Every check walks the finished [`Dataset`] and reports violations instead
//! of failing fast, so a single pass surfaces every broken record.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use crate::dataset::Dataset;
use crate::distributions::to_cents;
use crate::generators::accounts::{MAX_EMPLOYEES, MIN_EMPLOYEES};
use crate::generators::leads::{MAX_LEAD_EMPLOYEES, MIN_LEAD_EMPLOYEES};
use crate::ids::RecordId;
use crate::records::to_record;
use crate::reference::{
    CAMPAIGN_ABORTED, CAMPAIGN_COMPLETED, CAMPAIGN_IN_PROGRESS, CLOSED_WON, LEAD_CONVERTED_STATUS,
    LEAD_OPEN_STATUSES, TASK_CALL, is_closed_stage, stage_probability,
};

pub const MEMBER_EXCLUSIVITY: &str = "member_exclusivity";
pub const LEAD_CONVERSION: &str = "lead_conversion";
pub const OPPORTUNITY_STAGE: &str = "opportunity_stage";
pub const LINE_ITEM_SUM: &str = "line_item_sum";
pub const EMPLOYEE_BOUNDS: &str = "employee_bounds";
pub const DANGLING_REFERENCE: &str = "dangling_reference";
pub const INACTIVE_OWNER: &str = "inactive_owner";
pub const USER_HIERARCHY: &str = "user_hierarchy";
pub const CONTACT_INHERITANCE: &str = "contact_inheritance";
pub const CAMPAIGN_HIERARCHY: &str = "campaign_hierarchy";
pub const CAMPAIGN_STATUS: &str = "campaign_status";
pub const TIMESTAMP_ORDER: &str = "timestamp_order";
pub const CALL_DURATION: &str = "call_duration";

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub code: &'static str,
    pub entity: &'static str,
    pub record_id: String,
    pub message: String,
}

/// Outcome of [`verify_dataset`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationReport {
    pub records_checked: u64,
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count_by_code(&self) -> BTreeMap<&'static str, u64> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.code).or_insert(0) += 1;
        }
        counts
    }

    pub fn has(&self, code: &str) -> bool {
        self.violations.iter().any(|violation| violation.code == code)
    }

    fn push(&mut self, code: &'static str, entity: &'static str, id: &RecordId, message: String) {
        self.violations.push(Violation {
            code,
            entity,
            record_id: id.to_string(),
            message,
        });
    }
}

/// Identifier sets for every collection a foreign key may point at.
struct IdIndex<'a> {
    users: HashSet<&'a str>,
    active_users: HashSet<&'a str>,
    accounts: HashSet<&'a str>,
    contacts: HashSet<&'a str>,
    leads: HashSet<&'a str>,
    campaigns: HashSet<&'a str>,
    products: HashSet<&'a str>,
    pricebook_entries: HashSet<&'a str>,
    opportunities: HashSet<&'a str>,
}

impl<'a> IdIndex<'a> {
    fn new(dataset: &'a Dataset) -> Self {
        fn ids<'a, T>(items: &'a [T], id: impl Fn(&'a T) -> &'a RecordId) -> HashSet<&'a str> {
            items.iter().map(|item| id(item).as_str()).collect()
        }
        Self {
            users: ids(&dataset.users, |u| &u.id),
            active_users: dataset
                .users
                .iter()
                .filter(|user| user.is_active)
                .map(|user| user.id.as_str())
                .collect(),
            accounts: ids(&dataset.accounts, |a| &a.id),
            contacts: ids(&dataset.contacts, |c| &c.id),
            leads: ids(&dataset.leads, |l| &l.id),
            campaigns: ids(&dataset.campaigns, |c| &c.id),
            products: ids(&dataset.products, |p| &p.id),
            pricebook_entries: ids(&dataset.pricebook_entries, |e| &e.id),
            opportunities: ids(&dataset.opportunities, |o| &o.id),
        }
    }
}

/// Evaluate every dataset invariant and collect the violations.
pub fn verify_dataset(dataset: &Dataset) -> VerificationReport {
    let mut report = VerificationReport {
        records_checked: dataset.summary().iter().map(|count| count.records).sum(),
        violations: Vec::new(),
    };
    let index = IdIndex::new(dataset);

    check_users(dataset, &mut report);
    check_accounts(dataset, &index, &mut report);
    check_contacts(dataset, &index, &mut report);
    check_products(dataset, &index, &mut report);
    check_opportunities(dataset, &index, &mut report);
    check_line_items(dataset, &index, &mut report);
    check_leads(dataset, &index, &mut report);
    check_campaigns(dataset, &index, &mut report);
    check_campaign_members(dataset, &index, &mut report);
    check_tasks(dataset, &index, &mut report);

    report
}

fn check_reference(
    report: &mut VerificationReport,
    entity: &'static str,
    id: &RecordId,
    field: &str,
    target: &RecordId,
    pool: &HashSet<&str>,
) {
    if !pool.contains(target.as_str()) {
        report.push(
            DANGLING_REFERENCE,
            entity,
            id,
            format!("{field} '{target}' does not match a generated record"),
        );
    }
}

fn check_owner(
    report: &mut VerificationReport,
    entity: &'static str,
    id: &RecordId,
    owner: &RecordId,
    index: &IdIndex<'_>,
) {
    check_reference(report, entity, id, "OwnerId", owner, &index.users);
    if index.users.contains(owner.as_str()) && !index.active_users.contains(owner.as_str()) {
        report.push(INACTIVE_OWNER, entity, id, format!("owner '{owner}' is inactive"));
    }
}

fn check_users(dataset: &Dataset, report: &mut VerificationReport) {
    let roots: Vec<_> = dataset
        .users
        .iter()
        .filter(|user| user.manager_id.is_none())
        .collect();
    let [root] = roots.as_slice() else {
        if let Some(user) = dataset.users.first() {
            report.push(
                USER_HIERARCHY,
                "User",
                &user.id,
                format!("expected exactly one root user, found {}", roots.len()),
            );
        }
        return;
    };
    for user in dataset.users.iter().filter(|user| user.id != root.id) {
        if user.manager_id.as_ref() != Some(&root.id) {
            report.push(
                USER_HIERARCHY,
                "User",
                &user.id,
                "manager is not the root user".to_string(),
            );
        }
        if user.created_date <= root.created_date {
            report.push(
                USER_HIERARCHY,
                "User",
                &user.id,
                "created no later than the root user".to_string(),
            );
        }
    }
}

fn check_accounts(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    for account in &dataset.accounts {
        check_owner(report, "Account", &account.id, &account.owner_id, index);
        if !(MIN_EMPLOYEES..=MAX_EMPLOYEES).contains(&account.number_of_employees) {
            report.push(
                EMPLOYEE_BOUNDS,
                "Account",
                &account.id,
                format!("{} employees out of bounds", account.number_of_employees),
            );
        }
        if account.last_modified_date < account.created_date {
            report.push(
                TIMESTAMP_ORDER,
                "Account",
                &account.id,
                "modified before creation".to_string(),
            );
        }
    }
}

fn check_contacts(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    let accounts: HashMap<&str, _> = dataset
        .accounts
        .iter()
        .map(|account| (account.id.as_str(), account))
        .collect();
    for contact in &dataset.contacts {
        check_owner(report, "Contact", &contact.id, &contact.owner_id, index);
        let Some(account) = accounts.get(contact.account_id.as_str()) else {
            check_reference(
                report,
                "Contact",
                &contact.id,
                "AccountId",
                &contact.account_id,
                &index.accounts,
            );
            continue;
        };
        if contact.owner_id != account.owner_id || contact.created_date != account.created_date {
            report.push(
                CONTACT_INHERITANCE,
                "Contact",
                &contact.id,
                "owner or created date differs from the parent account".to_string(),
            );
        }
    }
}

fn check_products(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    for entry in &dataset.pricebook_entries {
        check_reference(
            report,
            "PricebookEntry",
            &entry.id,
            "Product2Id",
            &entry.product_id,
            &index.products,
        );
    }
}

fn check_opportunities(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    for opportunity in &dataset.opportunities {
        let id = &opportunity.id;
        check_owner(report, "Opportunity", id, &opportunity.owner_id, index);
        check_reference(
            report,
            "Opportunity",
            id,
            "AccountId",
            &opportunity.account_id,
            &index.accounts,
        );

        let stage = opportunity.stage_name;
        let consistent = opportunity.is_closed == is_closed_stage(stage)
            && opportunity.is_won == (stage == CLOSED_WON)
            && stage_probability(stage) == Some(opportunity.probability);
        if !consistent {
            report.push(
                OPPORTUNITY_STAGE,
                "Opportunity",
                id,
                format!(
                    "stage '{stage}' disagrees with IsClosed={} IsWon={} Probability={}",
                    opportunity.is_closed, opportunity.is_won, opportunity.probability
                ),
            );
        }
        if opportunity.last_modified_date < opportunity.created_date {
            report.push(
                TIMESTAMP_ORDER,
                "Opportunity",
                id,
                "modified before creation".to_string(),
            );
        }
    }
}

fn check_line_items(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for item in &dataset.opportunity_line_items {
        let id = &item.id;
        check_reference(
            report,
            "OpportunityLineItem",
            id,
            "OpportunityId",
            &item.opportunity_id,
            &index.opportunities,
        );
        check_reference(
            report,
            "OpportunityLineItem",
            id,
            "Product2Id",
            &item.product_id,
            &index.products,
        );
        check_reference(
            report,
            "OpportunityLineItem",
            id,
            "PricebookEntryId",
            &item.pricebook_entry_id,
            &index.pricebook_entries,
        );
        if item.quantity < 1 {
            report.push(
                LINE_ITEM_SUM,
                "OpportunityLineItem",
                id,
                "quantity below one".to_string(),
            );
        }
        *totals.entry(item.opportunity_id.as_str()).or_insert(0) += to_cents(item.total_price);
    }

    for opportunity in &dataset.opportunities {
        let Some(total) = totals.get(opportunity.id.as_str()) else {
            continue;
        };
        if *total != to_cents(opportunity.amount) {
            report.push(
                LINE_ITEM_SUM,
                "Opportunity",
                &opportunity.id,
                format!(
                    "line items total {total} cents, amount is {} cents",
                    to_cents(opportunity.amount)
                ),
            );
        }
    }
}

fn check_leads(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    for lead in &dataset.leads {
        let id = &lead.id;
        check_owner(report, "Lead", id, &lead.owner_id, index);
        if !(MIN_LEAD_EMPLOYEES..=MAX_LEAD_EMPLOYEES).contains(&lead.number_of_employees) {
            report.push(
                EMPLOYEE_BOUNDS,
                "Lead",
                id,
                format!("{} employees out of bounds", lead.number_of_employees),
            );
        }
        if lead.last_modified_date < lead.created_date {
            report.push(TIMESTAMP_ORDER, "Lead", id, "modified before creation".to_string());
        }

        let record = match to_record(lead) {
            Ok(record) => record,
            Err(err) => {
                report.push(LEAD_CONVERSION, "Lead", id, err.to_string());
                continue;
            }
        };
        let converted = record.get("IsConverted") == Some(&Value::Bool(true));
        let populated = ["ConvertedAccountId", "ConvertedContactId", "ConvertedDate"]
            .iter()
            .filter(|field| !record.get(**field).is_none_or(Value::is_null))
            .count();
        let fields_consistent = if converted { populated == 3 } else { populated == 0 };
        let opportunity_set = !record.get("ConvertedOpportunityId").is_none_or(Value::is_null);
        if !fields_consistent || (!converted && opportunity_set) {
            report.push(
                LEAD_CONVERSION,
                "Lead",
                id,
                format!("IsConverted={converted} with {populated} conversion fields set"),
            );
        }

        let status_consistent = if converted {
            lead.status == LEAD_CONVERTED_STATUS
        } else {
            LEAD_OPEN_STATUSES.contains(&lead.status)
        };
        if !status_consistent {
            report.push(
                LEAD_CONVERSION,
                "Lead",
                id,
                format!("status '{}' does not match conversion state", lead.status),
            );
        }
        let converted_early = lead
            .conversion
            .conversion()
            .is_some_and(|conversion| conversion.converted_date <= lead.created_date.date());
        if converted_early {
            report.push(
                LEAD_CONVERSION,
                "Lead",
                id,
                "converted no later than creation".to_string(),
            );
        }
    }
}

fn check_campaigns(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    let top_level: HashSet<&str> = dataset
        .campaigns
        .iter()
        .filter(|campaign| campaign.parent_id.is_none())
        .map(|campaign| campaign.id.as_str())
        .collect();
    for campaign in &dataset.campaigns {
        let id = &campaign.id;
        check_owner(report, "Campaign", id, &campaign.owner_id, index);
        if let Some(parent) = &campaign.parent_id {
            check_reference(report, "Campaign", id, "ParentId", parent, &index.campaigns);
            if index.campaigns.contains(parent.as_str()) && !top_level.contains(parent.as_str()) {
                report.push(
                    CAMPAIGN_HIERARCHY,
                    "Campaign",
                    id,
                    format!("parent '{parent}' is itself a child campaign"),
                );
            }
        }
        if campaign.is_active != (campaign.status == CAMPAIGN_IN_PROGRESS) {
            report.push(
                CAMPAIGN_STATUS,
                "Campaign",
                id,
                format!("IsActive={} with status '{}'", campaign.is_active, campaign.status),
            );
        }
        let ended = campaign.status == CAMPAIGN_COMPLETED || campaign.status == CAMPAIGN_ABORTED;
        if campaign.actual_cost > 0.0 && !ended {
            report.push(
                CAMPAIGN_STATUS,
                "Campaign",
                id,
                format!("actual cost recorded while '{}'", campaign.status),
            );
        }
        if campaign.end_date < campaign.start_date {
            report.push(TIMESTAMP_ORDER, "Campaign", id, "ends before it starts".to_string());
        }
        if campaign.last_modified_date < campaign.created_date {
            report.push(TIMESTAMP_ORDER, "Campaign", id, "modified before creation".to_string());
        }
    }
}

fn check_campaign_members(
    dataset: &Dataset,
    index: &IdIndex<'_>,
    report: &mut VerificationReport,
) {
    for member in &dataset.campaign_members {
        let id = &member.id;
        check_reference(
            report,
            "CampaignMember",
            id,
            "CampaignId",
            &member.campaign_id,
            &index.campaigns,
        );
        if let Some(lead) = member.member.lead_id() {
            check_reference(report, "CampaignMember", id, "LeadId", lead, &index.leads);
        }
        if let Some(contact) = member.member.contact_id() {
            check_reference(report, "CampaignMember", id, "ContactId", contact, &index.contacts);
        }

        match to_record(member) {
            Ok(record) => {
                let set = ["LeadId", "ContactId"]
                    .iter()
                    .filter(|field| !record.get(**field).is_none_or(Value::is_null))
                    .count();
                if set != 1 {
                    report.push(
                        MEMBER_EXCLUSIVITY,
                        "CampaignMember",
                        id,
                        format!("{set} person references set"),
                    );
                }
            }
            Err(err) => report.push(MEMBER_EXCLUSIVITY, "CampaignMember", id, err.to_string()),
        }

        if member.last_modified_date < member.created_date {
            report.push(
                TIMESTAMP_ORDER,
                "CampaignMember",
                id,
                "modified before creation".to_string(),
            );
        }
    }
}

fn check_tasks(dataset: &Dataset, index: &IdIndex<'_>, report: &mut VerificationReport) {
    for task in &dataset.tasks {
        let id = &task.id;
        check_owner(report, "Task", id, &task.owner_id, index);
        check_reference(report, "Task", id, "WhatId", &task.what_id, &index.accounts);
        if let Some(who) = &task.who_id {
            check_reference(report, "Task", id, "WhoId", who, &index.contacts);
        }
        let is_call = task.task_type == TASK_CALL;
        if is_call != (task.call_duration_in_seconds > 0) {
            report.push(
                CALL_DURATION,
                "Task",
                id,
                format!(
                    "{} task with {} seconds",
                    task.task_type, task.call_duration_in_seconds
                ),
            );
        }
    }
}
