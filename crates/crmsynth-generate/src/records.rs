//! Entity records as emitted to the persistence collaborator.
//!
//! Field names serialize to the Salesforce API names (`Id`, `AccountId`, ...).
//! Cross-references are stored as [`RecordId`] values, never as live handles.

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::errors::GenerationError;
use crate::ids::RecordId;

/// Flat mapping of field names to scalar values.
pub type Record = serde_json::Map<String, Value>;

/// Convert an entity into a flat [`Record`].
pub fn to_record<T: Serialize>(entity: &T) -> Result<Record, GenerationError> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(GenerationError::InvalidConfig(format!(
            "entity serialized to a non-object value: {other}"
        ))),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub username: String,
    pub department: &'static str,
    pub user_role_id: RecordId,
    pub manager_id: Option<RecordId>,
    pub is_active: bool,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Account {
    pub id: RecordId,
    pub name: String,
    pub industry: &'static str,
    #[serde(rename = "Type")]
    pub account_type: &'static str,
    pub number_of_employees: u32,
    pub annual_revenue: f64,
    pub billing_street: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_postal_code: String,
    pub billing_country: &'static str,
    pub owner_id: RecordId,
    pub created_date: NaiveDateTime,
    pub last_modified_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    pub id: RecordId,
    pub account_id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: &'static str,
    pub department: &'static str,
    pub lead_source: &'static str,
    pub owner_id: RecordId,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub product_code: String,
    pub family: &'static str,
    pub description: String,
    pub is_active: bool,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PricebookEntry {
    pub id: RecordId,
    #[serde(rename = "Product2Id")]
    pub product_id: RecordId,
    pub unit_price: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Opportunity {
    pub id: RecordId,
    pub account_id: RecordId,
    pub name: String,
    pub stage_name: &'static str,
    pub amount: f64,
    pub probability: u8,
    pub close_date: NaiveDate,
    #[serde(rename = "Type")]
    pub opportunity_type: &'static str,
    pub lead_source: &'static str,
    pub owner_id: RecordId,
    pub is_closed: bool,
    pub is_won: bool,
    pub created_date: NaiveDateTime,
    pub last_modified_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpportunityLineItem {
    pub id: RecordId,
    pub opportunity_id: RecordId,
    #[serde(rename = "Product2Id")]
    pub product_id: RecordId,
    pub pricebook_entry_id: RecordId,
    pub quantity: u32,
    pub list_price: f64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    pub id: RecordId,
    pub who_id: Option<RecordId>,
    pub what_id: RecordId,
    pub owner_id: RecordId,
    pub subject: &'static str,
    pub status: &'static str,
    pub priority: &'static str,
    #[serde(rename = "Type")]
    pub task_type: &'static str,
    pub activity_date: NaiveDate,
    pub description: String,
    pub call_duration_in_seconds: u32,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Campaign {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "Type")]
    pub campaign_type: &'static str,
    pub status: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub description: String,
    pub budgeted_cost: f64,
    pub actual_cost: f64,
    pub expected_revenue: f64,
    pub number_sent: u32,
    pub parent_id: Option<RecordId>,
    pub owner_id: RecordId,
    pub created_date: NaiveDateTime,
    pub last_modified_date: NaiveDateTime,
    pub is_deleted: bool,
}

/// The person a campaign membership points at. Exactly one kind is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Lead(RecordId),
    Contact(RecordId),
}

impl MemberRef {
    pub fn lead_id(&self) -> Option<&RecordId> {
        match self {
            MemberRef::Lead(id) => Some(id),
            MemberRef::Contact(_) => None,
        }
    }

    pub fn contact_id(&self) -> Option<&RecordId> {
        match self {
            MemberRef::Lead(_) => None,
            MemberRef::Contact(id) => Some(id),
        }
    }
}

impl Serialize for MemberRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MemberRef", 2)?;
        state.serialize_field("LeadId", &self.lead_id())?;
        state.serialize_field("ContactId", &self.contact_id())?;
        state.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignMember {
    pub id: RecordId,
    pub campaign_id: RecordId,
    #[serde(flatten)]
    pub member: MemberRef,
    pub status: &'static str,
    pub has_responded: bool,
    pub created_date: NaiveDateTime,
    pub last_modified_date: NaiveDateTime,
}

/// Entities a lead turned into when it was converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadConversion {
    pub account_id: RecordId,
    pub contact_id: RecordId,
    pub opportunity_id: Option<RecordId>,
    pub converted_date: NaiveDate,
}

/// Conversion state of a lead; serializes to the `IsConverted` flag and the
/// four conversion fields, all null while the lead is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionState {
    Open,
    Converted(LeadConversion),
}

impl ConversionState {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionState::Converted(_))
    }

    pub fn conversion(&self) -> Option<&LeadConversion> {
        match self {
            ConversionState::Open => None,
            ConversionState::Converted(conversion) => Some(conversion),
        }
    }
}

impl Serialize for ConversionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let conversion = self.conversion();
        let mut state = serializer.serialize_struct("ConversionState", 5)?;
        state.serialize_field("IsConverted", &self.is_converted())?;
        state.serialize_field("ConvertedAccountId", &conversion.map(|c| &c.account_id))?;
        state.serialize_field("ConvertedContactId", &conversion.map(|c| &c.contact_id))?;
        state.serialize_field(
            "ConvertedOpportunityId",
            &conversion.and_then(|c| c.opportunity_id.as_ref()),
        )?;
        state.serialize_field("ConvertedDate", &conversion.map(|c| c.converted_date))?;
        state.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lead {
    pub id: RecordId,
    pub last_name: String,
    pub first_name: String,
    pub company: String,
    pub title: &'static str,
    pub email: String,
    pub phone: String,
    pub status: &'static str,
    pub rating: &'static str,
    pub lead_source: &'static str,
    pub industry: &'static str,
    pub annual_revenue: f64,
    pub number_of_employees: u32,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: &'static str,
    pub description: String,
    pub owner_id: RecordId,
    #[serde(flatten)]
    pub conversion: ConversionState,
    pub created_date: NaiveDateTime,
    pub last_modified_date: NaiveDateTime,
    pub is_deleted: bool,
}
