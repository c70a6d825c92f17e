use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use crate::distributions::{chance, day_offset, uniform};
use crate::errors::GenerationError;
use crate::generators::{GenerationContext, pick};
use crate::ids::{CAMPAIGN_MEMBER_PREFIX, allocate};
use crate::records::{Campaign, CampaignMember, Contact, Lead, MemberRef};
use crate::reference::{
    CAMPAIGN_COMPLETED, LEAD_RESPONSE_RATE, MEMBER_RESPONDED_STATUSES, MEMBER_SENT,
    contact_response_rate, membership_scale,
};

/// Share of each campaign's audience drawn from contacts; leads fill the rest.
const CONTACT_SHARE: f64 = 0.70;
/// Audience share for campaigns that have not completed.
const PARTIAL_AUDIENCE: (f64, f64) = (0.3, 0.7);

/// Members a campaign targets before the eligible pool is applied.
pub fn base_audience(campaign: &Campaign, rng: &mut ChaCha8Rng) -> usize {
    let sent = campaign.number_sent as usize;
    if campaign.status == CAMPAIGN_COMPLETED {
        sent
    } else {
        (sent as f64 * uniform(PARTIAL_AUDIENCE.0, PARTIAL_AUDIENCE.1, rng)) as usize
    }
}

/// Generate memberships linking each campaign to contacts and open leads.
///
/// Converted leads are excluded from the eligible pool; a converted lead is
/// already represented by its contact.
pub fn generate_campaign_members(
    campaigns: &[Campaign],
    leads: &[Lead],
    contacts: &[Contact],
    ctx: &mut GenerationContext,
) -> Result<Vec<CampaignMember>, GenerationError> {
    let open_leads: Vec<&Lead> = leads
        .iter()
        .filter(|lead| !lead.conversion.is_converted())
        .collect();
    let eligible = contacts.len() + open_leads.len();
    let mut members = Vec::new();

    for campaign in campaigns {
        let base = base_audience(campaign, &mut ctx.rng);
        let target = (base as f64 * membership_scale(campaign.campaign_type)) as usize;
        let target = ctx.cap_to_pool("CampaignMember", target, eligible);

        let contact_target = (target as f64 * CONTACT_SHARE) as usize;
        let lead_target = target - contact_target;
        let contact_target = ctx.cap_to_pool("CampaignMember", contact_target, contacts.len());
        let lead_target = ctx.cap_to_pool("CampaignMember", lead_target, open_leads.len());

        let rng = &mut ctx.rng;
        let contact_rate = contact_response_rate(campaign.campaign_type);
        for position in index::sample(rng, contacts.len(), contact_target) {
            let person = MemberRef::Contact(contacts[position].id.clone());
            members.push(new_member(campaign, person, contact_rate, rng)?);
        }
        for position in index::sample(rng, open_leads.len(), lead_target) {
            let person = MemberRef::Lead(open_leads[position].id.clone());
            members.push(new_member(campaign, person, LEAD_RESPONSE_RATE, rng)?);
        }
    }

    Ok(members)
}

fn new_member(
    campaign: &Campaign,
    member: MemberRef,
    response_rate: f64,
    rng: &mut ChaCha8Rng,
) -> Result<CampaignMember, GenerationError> {
    let has_responded = chance(response_rate, rng);
    let status = if has_responded {
        *pick(MEMBER_RESPONDED_STATUSES, rng)?
    } else {
        MEMBER_SENT
    };
    Ok(CampaignMember {
        id: allocate(CAMPAIGN_MEMBER_PREFIX, rng),
        campaign_id: campaign.id.clone(),
        member,
        status,
        has_responded,
        created_date: campaign.created_date,
        last_modified_date: campaign.created_date + day_offset(0, 7, rng),
    })
}
