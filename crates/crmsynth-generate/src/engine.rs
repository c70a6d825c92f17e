use std::time::Instant;

use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::errors::GenerationError;
use crate::generators::GenerationContext;
use crate::generators::accounts::generate_accounts;
use crate::generators::activities::generate_activities;
use crate::generators::campaign_members::generate_campaign_members;
use crate::generators::campaigns::generate_campaigns;
use crate::generators::contacts::generate_contacts;
use crate::generators::leads::generate_leads;
use crate::generators::opportunities::generate_opportunities;
use crate::generators::products::generate_products;
use crate::generators::users::generate_users;
use crate::model::{GenerationConfig, GenerationReport};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: Dataset,
    pub report: GenerationReport,
}

/// Entry point for generating a CRM dataset from a configuration.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    config: GenerationConfig,
}

impl GenerationEngine {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        if let Err(err) = self.config.validate() {
            warn!(error = %err, "generation rejected");
            return Err(err);
        }

        let config = &self.config;
        let counts = &config.counts;
        info!(
            seed = config.seed,
            start_date = %config.start_date,
            end_date = %config.end_date,
            as_of = %config.as_of(),
            "generation started"
        );

        let mut ctx = GenerationContext::new(config);
        let mut dataset = Dataset::default();

        // Upstream collections are complete before any dependent generator runs.
        let step = Instant::now();
        dataset.users = generate_users(counts.users, &mut ctx)?;
        log_entity("User", dataset.users.len(), step);

        let step = Instant::now();
        dataset.accounts = generate_accounts(&dataset.users, counts.accounts, &mut ctx)?;
        log_entity("Account", dataset.accounts.len(), step);

        let step = Instant::now();
        dataset.contacts = generate_contacts(&dataset.accounts, counts.contacts, &mut ctx)?;
        log_entity("Contact", dataset.contacts.len(), step);

        let step = Instant::now();
        dataset.leads = generate_leads(&dataset.users, counts.leads, &mut ctx)?;
        log_entity("Lead", dataset.leads.len(), step);

        let step = Instant::now();
        dataset.campaigns =
            generate_campaigns(&dataset.users, counts.campaigns, &mut ctx)?.into_campaigns();
        log_entity("Campaign", dataset.campaigns.len(), step);

        let step = Instant::now();
        let catalog = generate_products(counts.products, &mut ctx)?;
        log_entity("Product2", catalog.products.len(), step);

        let step = Instant::now();
        let batch = generate_opportunities(
            &dataset.accounts,
            &dataset.users,
            &catalog,
            counts.opportunities,
            &mut ctx,
        )?;
        dataset.products = catalog.products;
        dataset.pricebook_entries = catalog.pricebook_entries;
        dataset.opportunities = batch.opportunities;
        dataset.opportunity_line_items = batch.line_items;
        log_entity("Opportunity", dataset.opportunities.len(), step);

        let step = Instant::now();
        dataset.campaign_members = generate_campaign_members(
            &dataset.campaigns,
            &dataset.leads,
            &dataset.contacts,
            &mut ctx,
        )?;
        log_entity("CampaignMember", dataset.campaign_members.len(), step);

        let step = Instant::now();
        dataset.tasks = generate_activities(
            &dataset.accounts,
            &dataset.contacts,
            &dataset.opportunities,
            &dataset.users,
            counts.activities,
            &mut ctx,
        )?;
        log_entity("Task", dataset.tasks.len(), step);

        let mut report = GenerationReport::new(config);
        for issue in ctx.take_issues() {
            report.record_warning(issue);
        }
        report.counts = dataset.summary();
        report.fingerprint = dataset.fingerprint()?;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            seed = config.seed,
            records = report.counts.iter().map(|count| count.records).sum::<u64>(),
            warnings = report.warnings.len(),
            duration_ms = report.duration_ms,
            fingerprint = %report.fingerprint,
            "generation completed"
        );

        Ok(GenerationResult { dataset, report })
    }
}

fn log_entity(entity: &str, records: usize, started: Instant) {
    info!(
        entity,
        records,
        duration_ms = started.elapsed().as_millis() as u64,
        "entity generated"
    );
}
