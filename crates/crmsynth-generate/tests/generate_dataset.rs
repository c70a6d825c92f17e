use std::collections::{HashMap, HashSet};

use crmsynth_generate::checks::{MEMBER_EXCLUSIVITY, verify_dataset};
use crmsynth_generate::generators::INSUFFICIENT_POOL;
use crmsynth_generate::generators::contacts::contacts_for_size;
use crmsynth_generate::reference::{CAMPAIGN_COMPLETED, CAMPAIGN_EMAIL, TASK_CALL};
use crmsynth_generate::{
    Dataset, EntityCounts, GenerationConfig, GenerationEngine, GenerationError, GenerationResult,
};

fn run(config: GenerationConfig) -> GenerationResult {
    GenerationEngine::new(config).run().expect("generation succeeds")
}

fn scenario_config() -> GenerationConfig {
    GenerationConfig {
        seed: 42,
        counts: EntityCounts {
            users: 25,
            accounts: 200,
            ..EntityCounts::default()
        },
        ..GenerationConfig::default()
    }
}

#[test]
fn single_root_manages_every_other_user() {
    let dataset = run(scenario_config()).dataset;
    assert_eq!(dataset.users.len(), 25);

    let roots: Vec<_> = dataset
        .users
        .iter()
        .filter(|user| user.manager_id.is_none())
        .collect();
    assert_eq!(roots.len(), 1);
    let root = roots[0];
    assert!(root.is_active);

    let reports: Vec<_> = dataset
        .users
        .iter()
        .filter(|user| user.manager_id.as_ref() == Some(&root.id))
        .collect();
    assert_eq!(reports.len(), 24);
    assert!(reports.iter().all(|user| user.created_date > root.created_date));
}

#[test]
fn contact_count_follows_account_size() {
    let dataset = run(scenario_config()).dataset;
    let expected: usize = dataset
        .accounts
        .iter()
        .map(|account| contacts_for_size(account.number_of_employees))
        .sum();
    assert_eq!(dataset.contacts.len(), expected);
}

#[test]
fn default_run_satisfies_every_invariant() {
    let result = run(GenerationConfig::default());
    let verification = verify_dataset(&result.dataset);
    assert!(
        verification.is_clean(),
        "violations: {:?}",
        verification.count_by_code()
    );
    assert_eq!(
        verification.records_checked,
        result.report.counts.iter().map(|count| count.records).sum::<u64>()
    );
}

#[test]
fn report_counts_match_collections() {
    let result = run(GenerationConfig::default());
    let report = &result.report;
    assert_eq!(report.seed, 42);
    assert_eq!(report.count_for("users"), Some(25));
    assert_eq!(report.count_for("accounts"), Some(200));
    assert_eq!(report.count_for("leads"), Some(300));
    assert_eq!(report.count_for("campaigns"), Some(50));
    assert_eq!(report.count_for("products"), Some(10));
    assert_eq!(report.count_for("pricebook_entries"), Some(10));
    assert_eq!(report.count_for("opportunities"), Some(800));
    assert_eq!(report.count_for("tasks"), Some(2_000));
    assert_eq!(
        report.count_for("opportunity_line_items"),
        Some(result.dataset.opportunity_line_items.len() as u64)
    );
    assert_eq!(report.fingerprint.len(), 64);
}

#[test]
fn completed_email_campaigns_reach_their_audience() {
    let dataset = run(GenerationConfig::default()).dataset;
    let open_leads = dataset
        .leads
        .iter()
        .filter(|lead| !lead.conversion.is_converted())
        .count();
    let contacts = dataset.contacts.len();

    let mut members_by_campaign: HashMap<&str, usize> = HashMap::new();
    for member in &dataset.campaign_members {
        *members_by_campaign.entry(member.campaign_id.as_str()).or_default() += 1;
    }

    let completed_email: Vec<_> = dataset
        .campaigns
        .iter()
        .filter(|c| c.status == CAMPAIGN_COMPLETED && c.campaign_type == CAMPAIGN_EMAIL)
        .collect();
    assert!(!completed_email.is_empty());

    for campaign in completed_email {
        assert!(campaign.actual_cost > 0.0, "campaign {}", campaign.id);
        let target = (campaign.number_sent as usize).min(contacts + open_leads);
        let contact_target = (target as f64 * 0.7) as usize;
        let lead_target = target - contact_target;
        let expected = contact_target.min(contacts) + lead_target.min(open_leads);
        let actual = members_by_campaign
            .get(campaign.id.as_str())
            .copied()
            .unwrap_or(0);
        assert_eq!(actual, expected, "campaign {}", campaign.id);
    }
}

#[test]
fn campaign_members_are_distinct_per_campaign() {
    let dataset = run(GenerationConfig::default()).dataset;
    let mut seen = HashSet::new();
    for member in &dataset.campaign_members {
        let person = member
            .member
            .lead_id()
            .or(member.member.contact_id())
            .expect("one person reference");
        assert!(
            seen.insert((member.campaign_id.clone(), person.clone())),
            "duplicate membership {}",
            member.id
        );
    }
}

#[test]
fn converted_leads_never_join_campaigns() {
    let dataset = run(GenerationConfig::default()).dataset;
    let converted: HashSet<&str> = dataset
        .leads
        .iter()
        .filter(|lead| lead.conversion.is_converted())
        .map(|lead| lead.id.as_str())
        .collect();
    let share = converted.len() as f64 / dataset.leads.len() as f64;
    assert!((0.2..0.4).contains(&share), "conversion share {share}");
    assert!(dataset.campaign_members.iter().all(|member| {
        member
            .member
            .lead_id()
            .is_none_or(|lead| !converted.contains(lead.as_str()))
    }));
}

#[test]
fn conversion_dates_may_run_past_the_window() {
    let mut config = GenerationConfig::default();
    config.counts.leads = 3_000;
    let end_date = config.end_date;
    let dataset = run(config).dataset;

    let mut past_window = 0;
    for lead in &dataset.leads {
        let Some(conversion) = lead.conversion.conversion() else {
            continue;
        };
        let lag = (conversion.converted_date - lead.created_date.date()).num_days();
        assert!((7..=90).contains(&lag), "lead {} converted after {lag} days", lead.id);
        if conversion.converted_date > end_date {
            past_window += 1;
        }
    }
    assert!(past_window > 0);
    assert!(verify_dataset(&dataset).is_clean());
}

#[test]
fn opportunities_carry_one_to_three_line_items() {
    let dataset = run(GenerationConfig::default()).dataset;
    let mut items: HashMap<&str, usize> = HashMap::new();
    for item in &dataset.opportunity_line_items {
        *items.entry(item.opportunity_id.as_str()).or_default() += 1;
        assert!(item.quantity >= 1);
    }
    for opportunity in &dataset.opportunities {
        let count = items.get(opportunity.id.as_str()).copied().unwrap_or(0);
        assert!((1..=3).contains(&count), "{} has {count} items", opportunity.id);
    }
}

#[test]
fn activities_cluster_around_account_deals() {
    let dataset = run(GenerationConfig::default()).dataset;
    let mut deal_dates: HashMap<&str, Vec<chrono::NaiveDate>> = HashMap::new();
    for opportunity in &dataset.opportunities {
        deal_dates
            .entry(opportunity.account_id.as_str())
            .or_default()
            .push(opportunity.created_date.date());
    }

    let mut on_deal_accounts = 0;
    for task in &dataset.tasks {
        if task.task_type == TASK_CALL {
            assert!((60..=3_600).contains(&task.call_duration_in_seconds));
        } else {
            assert_eq!(task.call_duration_in_seconds, 0);
        }
        let Some(dates) = deal_dates.get(task.what_id.as_str()) else {
            continue;
        };
        on_deal_accounts += 1;
        let near_a_deal = dates.iter().any(|created| {
            let offset = (task.activity_date - *created).num_days();
            (-30..=90).contains(&offset)
        });
        assert!(near_a_deal, "task {} is far from every deal", task.id);
    }
    assert!(on_deal_accounts as f64 > dataset.tasks.len() as f64 * 0.6);
}

#[test]
fn identifiers_use_entity_prefixes() {
    let dataset = run(scenario_config()).dataset;
    fn check<'a>(ids: impl Iterator<Item = &'a crmsynth_generate::ids::RecordId>, prefix: &str) {
        for id in ids {
            assert_eq!(id.prefix(), prefix);
            assert_eq!(id.as_str().len(), 18);
        }
    }
    check(dataset.users.iter().map(|r| &r.id), "005");
    check(dataset.accounts.iter().map(|r| &r.id), "001");
    check(dataset.contacts.iter().map(|r| &r.id), "003");
    check(dataset.leads.iter().map(|r| &r.id), "00Q");
    check(dataset.campaigns.iter().map(|r| &r.id), "701");
    check(dataset.campaign_members.iter().map(|r| &r.id), "00v");
    check(dataset.products.iter().map(|r| &r.id), "01t");
    check(dataset.pricebook_entries.iter().map(|r| &r.id), "01u");
    check(dataset.opportunities.iter().map(|r| &r.id), "006");
    check(dataset.opportunity_line_items.iter().map(|r| &r.id), "00k");
    check(dataset.tasks.iter().map(|r| &r.id), "00T");
}

#[test]
fn contact_cap_truncates_total() {
    let mut config = scenario_config();
    config.counts.contacts = Some(50);
    let dataset = run(config).dataset;
    assert_eq!(dataset.contacts.len(), 50);
    assert!(verify_dataset(&dataset).is_clean());
}

#[test]
fn oversized_product_request_is_capped_with_warning() {
    let mut config = GenerationConfig::default();
    config.counts.products = 25;
    let result = run(config);
    assert_eq!(result.dataset.products.len(), 10);
    let product_warnings: Vec<_> = result
        .report
        .warnings
        .iter()
        .filter(|issue| issue.entity == "Product2")
        .collect();
    assert_eq!(product_warnings.len(), 1);
    assert_eq!(product_warnings[0].code, INSUFFICIENT_POOL);
    assert!(result.report.warnings_by_code[INSUFFICIENT_POOL] >= 1);
}

#[test]
fn invalid_configurations_are_rejected() {
    let mut no_users = GenerationConfig::default();
    no_users.counts.users = 0;
    assert!(matches!(
        GenerationEngine::new(no_users).run(),
        Err(GenerationError::InvalidConfig(_))
    ));

    let mut inverted = GenerationConfig::default();
    std::mem::swap(&mut inverted.start_date, &mut inverted.end_date);
    assert!(matches!(
        GenerationEngine::new(inverted).run(),
        Err(GenerationError::InvalidRange { .. })
    ));

    let mut no_products = GenerationConfig::default();
    no_products.counts.products = 0;
    assert!(matches!(
        GenerationEngine::new(no_products).run(),
        Err(GenerationError::InvalidConfig(_))
    ));

    let mut no_accounts = GenerationConfig::default();
    no_accounts.counts.accounts = 0;
    assert!(matches!(
        GenerationEngine::new(no_accounts).run(),
        Err(GenerationError::InvalidConfig(_))
    ));
}

#[test]
fn users_only_run_produces_no_dependents() {
    let config = GenerationConfig {
        counts: EntityCounts {
            users: 3,
            accounts: 0,
            contacts: None,
            leads: 0,
            campaigns: 0,
            products: 0,
            opportunities: 0,
            activities: 0,
        },
        ..GenerationConfig::default()
    };
    let dataset = run(config).dataset;
    assert_eq!(dataset.users.len(), 3);
    assert!(dataset.accounts.is_empty());
    assert!(dataset.campaign_members.is_empty());
    assert!(verify_dataset(&dataset).is_clean());
}

#[test]
fn verifier_flags_broken_records() {
    let mut dataset: Dataset = run(scenario_config()).dataset;
    let contact = dataset.contacts[0].id.clone();
    let member = dataset
        .campaign_members
        .iter_mut()
        .find(|member| member.member.lead_id().is_some())
        .expect("lead member");
    member.member = crmsynth_generate::records::MemberRef::Contact(contact);
    assert!(verify_dataset(&dataset).is_clean());

    dataset.opportunities[0].probability = 101;
    dataset.tasks[0].what_id = dataset.users[0].id.clone();
    let report = verify_dataset(&dataset);
    assert!(report.has(crmsynth_generate::checks::OPPORTUNITY_STAGE));
    assert!(report.has(crmsynth_generate::checks::DANGLING_REFERENCE));
    assert!(!report.has(MEMBER_EXCLUSIVITY));
}
