//! Static reference data and the derived-field lookups built on it.

pub const INDUSTRIES: &[(&str, f64)] = &[
    ("Technology", 0.20),
    ("Healthcare", 0.15),
    ("Financial Services", 0.15),
    ("Manufacturing", 0.10),
    ("Retail", 0.10),
    ("Education", 0.08),
    ("Media", 0.05),
    ("Professional Services", 0.05),
    ("Energy", 0.04),
    ("Transportation", 0.03),
    ("Real Estate", 0.03),
    ("Hospitality", 0.02),
];

pub const ACCOUNT_TYPES: &[(&str, f64)] =
    &[("Prospect", 0.50), ("Customer", 0.40), ("Partner", 0.10)];

pub const USER_DEPARTMENTS: &[&str] = &[
    "Sales",
    "Sales",
    "Sales",
    "Sales Development",
    "Account Management",
];

pub const TITLES: &[&str] = &[
    "CEO",
    "CTO",
    "CFO",
    "VP Engineering",
    "VP Sales",
    "VP Marketing",
    "Director of IT",
    "Director of Operations",
    "Product Manager",
    "Engineering Manager",
    "Software Engineer",
    "Data Analyst",
    "Marketing Manager",
    "Sales Manager",
    "Account Executive",
];

pub const CONTACT_DEPARTMENTS: &[&str] = &[
    "Engineering",
    "IT",
    "Operations",
    "Finance",
    "Marketing",
    "Sales",
];

pub const LEAD_SOURCES: &[(&str, f64)] = &[
    ("Web", 0.25),
    ("Referral", 0.20),
    ("Partner", 0.15),
    ("Conference", 0.12),
    ("Advertisement", 0.10),
    ("Cold Call", 0.08),
    ("Email Campaign", 0.05),
    ("Social Media", 0.05),
];

pub const CLOSED_WON: &str = "Closed Won";
pub const CLOSED_LOST: &str = "Closed Lost";

/// Opportunity stages in pipeline order with their fixed probability.
pub const STAGES: &[(&str, u8)] = &[
    ("Prospecting", 10),
    ("Qualification", 20),
    ("Needs Analysis", 40),
    ("Value Proposition", 60),
    ("Negotiation", 80),
    (CLOSED_WON, 100),
    (CLOSED_LOST, 0),
];

/// Open stages available to deals older than 180 days.
pub const OPEN_STAGES: &[&str] = &[
    "Prospecting",
    "Qualification",
    "Needs Analysis",
    "Value Proposition",
    "Negotiation",
];
/// Later open stages for deals between 90 and 180 days old.
pub const LATE_OPEN_STAGES: &[&str] = &["Needs Analysis", "Value Proposition", "Negotiation"];
/// Early open stages for deals younger than 90 days.
pub const EARLY_OPEN_STAGES: &[&str] = &[
    "Prospecting",
    "Qualification",
    "Needs Analysis",
    "Value Proposition",
];
pub const CLOSED_STAGES: &[&str] = &[CLOSED_WON, CLOSED_LOST];

pub const OPPORTUNITY_TYPES: &[(&str, f64)] = &[
    ("New Business", 0.45),
    ("Renewal", 0.30),
    ("Upsell", 0.15),
    ("Cross-sell", 0.10),
];

pub const OPPORTUNITY_NAME_SUFFIXES: &[&str] = &["New", "Expansion", "Renewal"];

pub const TASK_CALL: &str = "Call";
pub const TASK_TYPES: &[&str] = &[TASK_CALL, "Email", "Meeting", "Demo", "Follow-up", "Other"];
pub const TASK_STATUSES: &[&str] = &["Not Started", "In Progress", "Completed", "Deferred"];
pub const TASK_PRIORITIES: &[&str] = &["High", "Normal", "Low"];

/// Catalog entry: name, family, product code, list price.
#[derive(Debug, Clone, Copy)]
pub struct CatalogProduct {
    pub name: &'static str,
    pub family: &'static str,
    pub code: &'static str,
    pub list_price: f64,
}

const fn product(
    name: &'static str,
    family: &'static str,
    code: &'static str,
    list_price: f64,
) -> CatalogProduct {
    CatalogProduct {
        name,
        family,
        code,
        list_price,
    }
}

pub const PRODUCT_CATALOG: &[CatalogProduct] = &[
    product("Enterprise Platform", "Software", "ENT-001", 50000.0),
    product("Professional Suite", "Software", "PRO-001", 15000.0),
    product("Starter Package", "Software", "STR-001", 5000.0),
    product("Implementation Services", "Services", "SVC-IMP", 25000.0),
    product("Custom Development", "Services", "SVC-DEV", 10000.0),
    product("Premium Support", "Support", "SUP-PRM", 12000.0),
    product("Standard Support", "Support", "SUP-STD", 5000.0),
    product("Admin Training", "Training", "TRN-ADM", 2000.0),
    product("Developer Training", "Training", "TRN-DEV", 3000.0),
    product("Data Migration", "Services", "SVC-MIG", 8000.0),
];

pub const CAMPAIGN_EMAIL: &str = "Email";
pub const CAMPAIGN_WEBINAR: &str = "Webinar";
pub const CAMPAIGN_CONFERENCE: &str = "Conference";

pub const CAMPAIGN_TYPES: &[(&str, f64)] = &[
    (CAMPAIGN_EMAIL, 0.25),
    (CAMPAIGN_WEBINAR, 0.20),
    (CAMPAIGN_CONFERENCE, 0.15),
    ("Trade Show", 0.10),
    ("Direct Mail", 0.10),
    ("Advertisement", 0.08),
    ("Telemarketing", 0.07),
    ("Partners", 0.05),
];

pub const CAMPAIGN_PLANNED: &str = "Planned";
pub const CAMPAIGN_IN_PROGRESS: &str = "In Progress";
pub const CAMPAIGN_COMPLETED: &str = "Completed";
pub const CAMPAIGN_ABORTED: &str = "Aborted";

pub const CAMPAIGN_THEMES: &[&str] = &["Growth", "Awareness", "Demand Gen", "Product Launch"];

pub const MEMBER_SENT: &str = "Sent";
pub const MEMBER_RESPONDED_STATUSES: &[&str] = &["Responded", "Attended"];

/// Response rate for leads, regardless of campaign type.
pub const LEAD_RESPONSE_RATE: f64 = 0.12;

pub const LEAD_CONVERTED_STATUS: &str = "Closed - Converted";
/// Statuses a lead can hold before conversion.
pub const LEAD_OPEN_STATUSES: &[&str] = &["Open - Not Contacted", "Working - Contacted"];
pub const LEAD_RATINGS: &[&str] = &["Hot", "Warm", "Cold"];

/// Fixed probability for a stage; `None` for an unknown stage name.
pub fn stage_probability(stage: &str) -> Option<u8> {
    STAGES
        .iter()
        .find(|(name, _)| *name == stage)
        .map(|(_, probability)| *probability)
}

pub fn is_closed_stage(stage: &str) -> bool {
    CLOSED_STAGES.contains(&stage)
}

/// Share of a campaign's target audience that contacts respond with.
pub fn contact_response_rate(campaign_type: &str) -> f64 {
    match campaign_type {
        CAMPAIGN_EMAIL | CAMPAIGN_WEBINAR => 0.15,
        CAMPAIGN_CONFERENCE => 0.40,
        _ => 0.10,
    }
}

/// Fraction of the base audience that becomes campaign members.
pub fn membership_scale(campaign_type: &str) -> f64 {
    match campaign_type {
        CAMPAIGN_EMAIL => 1.0,
        CAMPAIGN_WEBINAR => 0.5,
        _ => 0.3,
    }
}

pub fn task_subjects(task_type: &str) -> &'static [&'static str] {
    match task_type {
        TASK_CALL => &[
            "Discovery call",
            "Follow-up call",
            "Demo prep call",
            "Pricing discussion",
        ],
        "Email" => &[
            "Sent proposal",
            "Follow-up email",
            "Meeting confirmation",
            "Contract review",
        ],
        "Meeting" => &[
            "On-site meeting",
            "Quarterly review",
            "Executive briefing",
            "Technical deep dive",
        ],
        "Demo" => &[
            "Product demo",
            "Technical demo",
            "POC review",
            "Feature walkthrough",
        ],
        "Follow-up" => &[
            "Post-meeting follow-up",
            "Check-in",
            "Next steps",
            "Status update",
        ],
        _ => &["Research", "Internal sync", "Admin task", "Documentation"],
    }
}
