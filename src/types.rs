//! Core types for Freightdesk

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Unique identifier for a customer
pub type CustomerId = i64;

/// Fields returned by the query tools when the caller does not ask for
/// specific ones.
pub const DEFAULT_QUERY_FIELDS: &[&str] = &["name", "city", "industry"];

/// Customer size classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl CustomerSize {
    /// All size variants, in declaration order
    pub const ALL: &'static [CustomerSize] = &[
        CustomerSize::Small,
        CustomerSize::Medium,
        CustomerSize::Large,
        CustomerSize::ExtraLarge,
    ];

    /// Wire representation (matches the stored column value)
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerSize::Small => "SMALL",
            CustomerSize::Medium => "MEDIUM",
            CustomerSize::Large => "LARGE",
            CustomerSize::ExtraLarge => "EXTRA_LARGE",
        }
    }

    /// Human-readable label ("EXTRA_LARGE" -> "Extra Large")
    pub fn label(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `{value, label}` pairs for every variant, as consumed by the
    /// size-options endpoint.
    pub fn options() -> Vec<SizeOption> {
        Self::ALL
            .iter()
            .map(|size| SizeOption {
                value: size.as_str().to_string(),
                label: size.label(),
            })
            .collect()
    }
}

impl std::str::FromStr for CustomerSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SMALL" => Ok(CustomerSize::Small),
            "MEDIUM" => Ok(CustomerSize::Medium),
            "LARGE" => Ok(CustomerSize::Large),
            "EXTRA_LARGE" => Ok(CustomerSize::ExtraLarge),
            other => Err(format!("Unknown customer size: {other}")),
        }
    }
}

impl std::fmt::Display for CustomerSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable size option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeOption {
    pub value: String,
    pub label: String,
}

/// A customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Customer name
    pub name: String,
    /// City the customer operates from
    pub city: String,
    /// Industry sector
    pub industry: String,
    /// Kind of cargo the customer ships
    pub cargo_type: String,
    /// Size classification
    pub size: CustomerSize,
}

impl Customer {
    /// Full field set as an ordered name -> value map.
    ///
    /// This is the single definition of which fields the query tools can
    /// project; `size` is rendered as its string form.
    pub fn field_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), json!(self.id));
        map.insert("name".to_string(), json!(self.name));
        map.insert("city".to_string(), json!(self.city));
        map.insert("industry".to_string(), json!(self.industry));
        map.insert("cargo_type".to_string(), json!(self.cargo_type));
        map.insert("size".to_string(), json!(self.size.as_str()));
        map
    }

    /// Project the record down to the requested fields.
    ///
    /// Unknown field names are dropped silently (documented policy, not an
    /// accident); duplicates and ordering in the request do not affect the
    /// result.
    pub fn project(&self, fields: &[String]) -> Map<String, Value> {
        let full = self.field_map();
        let mut out = Map::new();
        for field in fields {
            if let Some(value) = full.get(field) {
                out.insert(field.clone(), value.clone());
            }
        }
        out
    }
}

/// Payload for creating a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub city: String,
    pub industry: String,
    pub cargo_type: String,
    pub size: CustomerSize,
}

/// Partial payload for updating a customer; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CustomerSize>,
}
