use chrono::TimeDelta;
use crmsynth_generate::checks::{
    CALL_DURATION, CAMPAIGN_HIERARCHY, CAMPAIGN_STATUS, CONTACT_INHERITANCE, EMPLOYEE_BOUNDS,
    INACTIVE_OWNER, LEAD_CONVERSION, LINE_ITEM_SUM, TIMESTAMP_ORDER, USER_HIERARCHY,
    verify_dataset,
};
use crmsynth_generate::generators::accounts::MIN_EMPLOYEES;
use crmsynth_generate::generators::leads::MAX_LEAD_EMPLOYEES;
use crmsynth_generate::reference::{LEAD_CONVERTED_STATUS, TASK_CALL};
use crmsynth_generate::{Dataset, GenerationConfig, GenerationEngine};

fn clean_dataset() -> Dataset {
    let dataset = GenerationEngine::new(GenerationConfig::default())
        .run()
        .expect("generation succeeds")
        .dataset;
    assert!(verify_dataset(&dataset).is_clean());
    dataset
}

/// Break one record and expect exactly `code` to be reported.
fn assert_detected(code: &str, tamper: impl FnOnce(&mut Dataset)) {
    let mut dataset = clean_dataset();
    tamper(&mut dataset);
    let counts = verify_dataset(&dataset).count_by_code();
    assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![code], "{counts:?}");
}

#[test]
fn line_item_total_drift_is_detected() {
    assert_detected(LINE_ITEM_SUM, |dataset| {
        dataset.opportunity_line_items[0].total_price += 1.0;
    });
}

#[test]
fn open_lead_with_converted_status_is_detected() {
    assert_detected(LEAD_CONVERSION, |dataset| {
        let lead = dataset
            .leads
            .iter_mut()
            .find(|lead| !lead.conversion.is_converted())
            .expect("open lead");
        lead.status = LEAD_CONVERTED_STATUS;
    });
}

#[test]
fn converted_lead_with_open_status_is_detected() {
    assert_detected(LEAD_CONVERSION, |dataset| {
        let lead = dataset
            .leads
            .iter_mut()
            .find(|lead| lead.conversion.is_converted())
            .expect("converted lead");
        lead.status = "Working - Contacted";
    });
}

#[test]
fn account_below_employee_floor_is_detected() {
    assert_detected(EMPLOYEE_BOUNDS, |dataset| {
        dataset.accounts[0].number_of_employees = MIN_EMPLOYEES - 5;
    });
}

#[test]
fn lead_above_employee_ceiling_is_detected() {
    assert_detected(EMPLOYEE_BOUNDS, |dataset| {
        dataset.leads[0].number_of_employees = MAX_LEAD_EMPLOYEES + 1;
    });
}

#[test]
fn user_reporting_to_non_root_is_detected() {
    assert_detected(USER_HIERARCHY, |dataset| {
        let root = dataset
            .users
            .iter()
            .position(|user| user.manager_id.is_none())
            .expect("root user");
        let manager = (0..dataset.users.len())
            .find(|index| *index != root)
            .expect("second user");
        let report = (0..dataset.users.len())
            .find(|index| *index != root && *index != manager)
            .expect("third user");
        dataset.users[report].manager_id = Some(dataset.users[manager].id.clone());
    });
}

#[test]
fn contact_diverging_from_account_is_detected() {
    assert_detected(CONTACT_INHERITANCE, |dataset| {
        dataset.contacts[0].created_date += TimeDelta::days(1);
    });
}

#[test]
fn grandchild_campaign_is_detected() {
    assert_detected(CAMPAIGN_HIERARCHY, |dataset| {
        let children: Vec<usize> = dataset
            .campaigns
            .iter()
            .enumerate()
            .filter(|(_, campaign)| campaign.parent_id.is_some())
            .map(|(index, _)| index)
            .take(2)
            .collect();
        let &[parent, child] = children.as_slice() else {
            panic!("expected two child campaigns");
        };
        dataset.campaigns[child].parent_id = Some(dataset.campaigns[parent].id.clone());
    });
}

#[test]
fn active_flag_out_of_step_with_status_is_detected() {
    assert_detected(CAMPAIGN_STATUS, |dataset| {
        dataset.campaigns[0].is_active = !dataset.campaigns[0].is_active;
    });
}

#[test]
fn deactivated_owner_is_detected() {
    assert_detected(INACTIVE_OWNER, |dataset| {
        let owner = dataset.accounts[0].owner_id.clone();
        let user = dataset
            .users
            .iter_mut()
            .find(|user| user.id == owner)
            .expect("account owner");
        user.is_active = false;
    });
}

#[test]
fn modification_before_creation_is_detected() {
    assert_detected(TIMESTAMP_ORDER, |dataset| {
        let account = &mut dataset.accounts[0];
        account.last_modified_date = account.created_date - TimeDelta::days(1);
    });
}

#[test]
fn call_without_duration_is_detected() {
    assert_detected(CALL_DURATION, |dataset| {
        let call = dataset
            .tasks
            .iter_mut()
            .find(|task| task.task_type == TASK_CALL)
            .expect("call task");
        call.call_duration_in_seconds = 0;
    });
}
