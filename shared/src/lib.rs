use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A money field that is either a number or empty.
///
/// Budget figures start out blank until a bid comes in, so the persisted
/// document stores either a JSON number or the empty string `""`. Empty and
/// non-finite values count as 0 in every aggregate computation but stay empty
/// in storage and display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Amount(Option<f64>);

impl Amount {
    /// An empty (unset) amount
    pub fn empty() -> Self {
        Amount(None)
    }

    /// An amount holding the given value
    pub fn new(value: f64) -> Self {
        Amount(Some(value))
    }

    /// Parse a raw form-input string: blank or unparsable input stays empty
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Amount::empty();
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Amount::new(value),
            Err(_) => Amount::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The raw stored value, if any
    pub fn value(&self) -> Option<f64> {
        self.0
    }

    /// The value used in aggregate computations: empty/non-finite maps to 0
    pub fn coerced(&self) -> f64 {
        match self.0 {
            Some(value) if value.is_finite() => value,
            _ => 0.0,
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(""),
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or an empty string")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Ok(Amount::new(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        Ok(Amount::new(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount::new(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        Ok(Amount::from_input(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::empty())
    }

    fn visit_none<E: de::Error>(self) -> Result<Amount, E> {
        Ok(Amount::empty())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

/// A budget line item in the v1 schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: i64,
    /// Cost center name (e.g. "Foundation", "Framing")
    pub category: String,
    /// Short description shown under the category name
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub estimate: Amount,
    #[serde(default)]
    pub paid: Amount,
    #[serde(default)]
    pub notes: String,
}

/// A cost-center category in the v2 schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub estimate: Amount,
    /// Actual contracted/incurred cost, once known
    #[serde(default)]
    pub actual: Amount,
    #[serde(default)]
    pub paid: Amount,
    #[serde(default)]
    pub notes: String,
    /// Planned start date (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Planned end date (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Link to design documents for this category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_link: Option<String>,
}

/// Checklist task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Blocked,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Done,
    ];

    /// Human-readable label for rendering
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::Done => "Done",
        }
    }

    /// Status dot class for rendering
    pub fn dot(&self) -> &'static str {
        match self {
            TaskStatus::Done => "good",
            TaskStatus::InProgress => "warn",
            TaskStatus::Blocked => "bad",
            TaskStatus::NotStarted => "",
        }
    }
}

/// A checklist task inside a task group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Positive integer, assigned monotonically within the group
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Due date (YYYY-MM-DD) or empty when not set
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub notes: String,
}

/// Task groups keyed by name, ordered by name (e.g. construction phases)
pub type TaskGroups = BTreeMap<String, Vec<Task>>;

/// A calendar event in the v2 schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    /// The cost-center category this event belongs to
    pub category_id: String,
    pub title: String,
    /// Event start as an ISO-8601 instant
    #[serde(rename = "startISO")]
    pub start_iso: String,
    /// Optional event end as an ISO-8601 instant
    #[serde(rename = "endISO", default, skip_serializing_if = "Option::is_none")]
    pub end_iso: Option<String>,
    /// Minutes before start at which to raise a reminder; absent means none
    #[serde(
        default,
        deserialize_with = "deserialize_remind_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub remind_minutes: Option<i64>,
    #[serde(default)]
    pub notes: String,
}

/// Form inputs may leave the reminder blank, which arrives as `""` or null
/// rather than a missing field. Anything non-numeric means "no reminder".
fn deserialize_remind_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Attachment metadata as kept in the local attachment store.
///
/// The blob bytes live in their own file next to the index; they are never
/// part of the persisted document and are not portable through export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    pub id: String,
    pub category_id: String,
    /// Original file name
    pub name: String,
    /// MIME type of the blob
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Blob size in bytes
    pub size: u64,
    /// Creation timestamp (RFC 3339)
    pub created: String,
}

/// The v1 persisted document: budget line items plus task groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStateV1 {
    pub budget: Vec<BudgetItem>,
    pub tasks: TaskGroups,
}

/// The v2 persisted document: categories, calendar events, task groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStateV2 {
    pub categories: Vec<CategoryRecord>,
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub tasks: TaskGroups,
}

/// Persisted document schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentVersion {
    V1,
    V2,
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentVersion::V1 => write!(f, "v1"),
            DocumentVersion::V2 => write!(f, "v2"),
        }
    }
}

/// The whole persisted application document.
///
/// The two schema versions are independent and non-interoperable; the store
/// holds one or the other and there is no migration between them. Untagged so
/// the on-disk shape stays exactly `{budget, tasks}` or
/// `{categories, events, tasks}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppDocument {
    V2(AppStateV2),
    V1(AppStateV1),
}

impl AppDocument {
    pub fn version(&self) -> DocumentVersion {
        match self {
            AppDocument::V1(_) => DocumentVersion::V1,
            AppDocument::V2(_) => DocumentVersion::V2,
        }
    }

    /// Task groups, present in both schema versions
    pub fn tasks(&self) -> &TaskGroups {
        match self {
            AppDocument::V1(state) => &state.tasks,
            AppDocument::V2(state) => &state.tasks,
        }
    }

    pub fn tasks_mut(&mut self) -> &mut TaskGroups {
        match self {
            AppDocument::V1(state) => &mut state.tasks,
            AppDocument::V2(state) => &mut state.tasks,
        }
    }

    /// Calendar events; a v1 document has none
    pub fn events(&self) -> &[CalendarEvent] {
        match self {
            AppDocument::V1(_) => &[],
            AppDocument::V2(state) => &state.events,
        }
    }
}

/// Aggregate figures over v1 budget line items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub estimate: f64,
    pub paid: f64,
    /// estimate - paid
    pub owed: f64,
    /// Fixed 20% management fee on the estimate total
    pub management: f64,
    /// estimate + management
    pub with_management: f64,
}

/// Aggregate figures over v2 categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub estimate: f64,
    pub actual: f64,
    pub paid: f64,
    /// actual - paid
    pub outstanding: f64,
}
