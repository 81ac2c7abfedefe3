use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) mod lenient {
    //! Field decoders for display-only values. The API does not pin their
    //! types, so a value of the wrong type reads as absent rather than failing
    //! the whole collection.

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(is_truthy(&Value::deserialize(deserializer)?))
    }

    pub fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            value => Some(is_truthy(&value)),
        })
    }

    /// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
    pub fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// Display value for anything that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Records addressed by their server-side identifier.
pub trait Record {
    fn id(&self) -> &str;
}

/// A record plus the table key used to address its row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row<T> {
    pub key: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T: Record> Row<T> {
    pub fn new(record: T) -> Self {
        Self {
            key: record.id().to_string(),
            record,
        }
    }
}

/// A reference to a record in another collection. The API sends either the
/// bare identifier or a partially populated copy of the referenced record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForeignKey {
    Identifier(String),
    PartialRecord(EmbeddedRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedRef {
    #[serde(rename = "_id", default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ForeignKey {
    pub fn id(&self) -> Option<&str> {
        match self {
            ForeignKey::Identifier(id) => Some(id),
            ForeignKey::PartialRecord(embedded) => embedded.id.as_deref(),
        }
    }

    pub fn embedded_email(&self) -> Option<&str> {
        match self {
            ForeignKey::Identifier(_) => None,
            ForeignKey::PartialRecord(embedded) => embedded.email.as_deref(),
        }
    }

    pub fn refers_to(&self, id: &str) -> bool {
        self.id() == Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Only its length is used; kept raw because the API does not guarantee a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Value>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub total_children: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Psychologist {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_active: bool,
    /// Derived at fetch time, never stored upstream.
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub total_consultations: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Psychologist {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ForeignKey>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub psychologist_id: Option<ForeignKey>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub meet_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_flag", skip_serializing_if = "Option::is_none")]
    pub verified_by_user: Option<bool>,
    #[serde(
        rename = "CompletedByPsychologist",
        default,
        deserialize_with = "lenient::optional_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_by_psychologist: Option<bool>,
    /// Numeric in practice, but rendered as whatever the API sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    #[serde(default, deserialize_with = "lenient::option", skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Consultation {
    pub fn is_with(&self, psychologist_id: &str) -> bool {
        self.psychologist_id
            .as_ref()
            .is_some_and(|fk| fk.refers_to(psychologist_id))
    }
}

impl Record for Consultation {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A consultation with the display fields of its user and psychologist resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedConsultation {
    #[serde(flatten)]
    pub consultation: Consultation,
    pub user_name: String,
    pub user_email: String,
    pub psychologist_name: String,
    pub psychologist_email: String,
}

impl Record for EnrichedConsultation {
    fn id(&self) -> &str {
        &self.consultation.id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewSelector {
    #[default]
    Psychologists,
    Users,
    Consultations,
    FilteredConsultations,
}

impl ViewSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewSelector::Psychologists => "psychologists",
            ViewSelector::Users => "users",
            ViewSelector::Consultations => "consultations",
            ViewSelector::FilteredConsultations => "filteredConsultations",
        }
    }

    /// Heading shown above the table: the selector name, first letter upper-cased.
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The fetch+join pipeline run on entering this view, if any.
    pub fn pipeline(&self) -> Option<Pipeline> {
        match self {
            ViewSelector::Psychologists => Some(Pipeline::PsychologistsWithCounts),
            ViewSelector::Users => Some(Pipeline::UsersWithChildCounts),
            ViewSelector::Consultations => Some(Pipeline::EnrichedConsultations),
            ViewSelector::FilteredConsultations => None,
        }
    }

    pub fn fetches(&self) -> bool {
        self.pipeline().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// psychologists, then consultations, then per-psychologist counts
    PsychologistsWithCounts,
    UsersWithChildCounts,
    /// consultations, users and psychologists fetched together, then joined
    EnrichedConsultations,
}

impl fmt::Display for ViewSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "psychologists" => Ok(ViewSelector::Psychologists),
            "users" => Ok(ViewSelector::Users),
            "consultations" => Ok(ViewSelector::Consultations),
            "filteredConsultations" => Ok(ViewSelector::FilteredConsultations),
            other => Err(format!("Unknown view: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectViewRequest {
    pub view: String,
}
