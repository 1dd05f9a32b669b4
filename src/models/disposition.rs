use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

/// A security placed under a disposition (restricted trading) window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispositionRecord {
    /// Numeric-like stock code. Some backends send it as a JSON number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub market: Option<String>,
    /// Disposition start date
    #[serde(default)]
    pub start: Option<String>,
    /// Disposition end date
    #[serde(default)]
    pub end: Option<String>,
    /// Data snapshot date
    #[serde(default)]
    pub stock_date: Option<String>,
}

impl DispositionRecord {
    /// Raw field value for a sort key. `None` for null fields.
    pub fn field(&self, key: SortKey) -> Option<&str> {
        match key {
            SortKey::Symbol => Some(self.symbol.as_str()),
            SortKey::Name => Some(self.name.as_str()),
            SortKey::Market => self.market.as_deref(),
            SortKey::Start => self.start.as_deref(),
            SortKey::End => self.end.as_deref(),
            SortKey::StockDate => self.stock_date.as_deref(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Null text fields read as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response envelope returned by the disposition API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<DispositionRecord>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    /// Unwrap the envelope into the record list or an application error.
    pub fn into_records(self) -> Result<Vec<DispositionRecord>, AppError> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(AppError::Application(self.message.unwrap_or_default()))
        }
    }
}

/// Record field a table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Symbol,
    Name,
    Market,
    Start,
    End,
    StockDate,
}

impl SortKey {
    /// Columns in display order.
    pub const COLUMNS: [SortKey; 6] = [
        SortKey::Symbol,
        SortKey::Name,
        SortKey::StockDate,
        SortKey::Market,
        SortKey::Start,
        SortKey::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Symbol => "symbol",
            SortKey::Name => "name",
            SortKey::Market => "market",
            SortKey::Start => "start",
            SortKey::End => "end",
            SortKey::StockDate => "stock_date",
        }
    }

    /// Column header shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Symbol => "Symbol",
            SortKey::Name => "Name",
            SortKey::Market => "Market",
            SortKey::Start => "Start",
            SortKey::End => "End",
            SortKey::StockDate => "Data Date",
        }
    }

    /// How values under this key are compared.
    pub fn kind(&self) -> SortKind {
        let name = self.as_str();
        if *self == SortKey::Symbol {
            SortKind::Numeric
        } else if name.contains("date") || name == "start" || name == "end" {
            SortKind::Date
        } else {
            SortKind::Text
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "symbol" => Ok(SortKey::Symbol),
            "name" => Ok(SortKey::Name),
            "market" => Ok(SortKey::Market),
            "start" => Ok(SortKey::Start),
            "end" => Ok(SortKey::End),
            "stock_date" | "stock-date" => Ok(SortKey::StockDate),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

/// Comparison strategy derived from a [`SortKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Numeric,
    Date,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        }
    }
}

/// Current ordering of the table. `key == None` keeps the fetched order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Header click: the active ascending column flips to descending,
    /// anything else starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == Some(key) && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self {
            key: Some(key),
            direction,
        }
    }
}
