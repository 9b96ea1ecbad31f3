use crate::notify::Toast;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Editable columns of the sheet, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TimeIn,
    Name,
    Visiting,
    Address,
    Purpose,
    TimeOut,
    Remarks,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::TimeIn,
        Field::Name,
        Field::Visiting,
        Field::Address,
        Field::Purpose,
        Field::TimeOut,
        Field::Remarks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::TimeIn => "timeIn",
            Field::Name => "name",
            Field::Visiting => "visiting",
            Field::Address => "address",
            Field::Purpose => "purpose",
            Field::TimeOut => "timeOut",
            Field::Remarks => "remarks",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

/// One visitor entry. Field order here is the order keys are written to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisitorRow {
    #[serde(deserialize_with = "loose_text")]
    pub time_in: String,
    #[serde(deserialize_with = "loose_text")]
    pub name: String,
    #[serde(deserialize_with = "loose_text")]
    pub visiting: String,
    #[serde(deserialize_with = "loose_text")]
    pub address: String,
    #[serde(deserialize_with = "loose_text")]
    pub purpose: String,
    #[serde(deserialize_with = "loose_text")]
    pub time_out: String,
    #[serde(deserialize_with = "loose_text")]
    pub remarks: String,
}

impl VisitorRow {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::TimeIn => &self.time_in,
            Field::Name => &self.name,
            Field::Visiting => &self.visiting,
            Field::Address => &self.address,
            Field::Purpose => &self.purpose,
            Field::TimeOut => &self.time_out,
            Field::Remarks => &self.remarks,
        }
    }

    pub fn set(&mut self, field: Field, text: impl Into<String>) {
        let slot = match field {
            Field::TimeIn => &mut self.time_in,
            Field::Name => &mut self.name,
            Field::Visiting => &mut self.visiting,
            Field::Address => &mut self.address,
            Field::Purpose => &mut self.purpose,
            Field::TimeOut => &mut self.time_out,
            Field::Remarks => &mut self.remarks,
        };
        *slot = text.into();
    }

    pub fn trimmed(&self) -> VisitorRow {
        let mut row = VisitorRow::default();
        for field in Field::ALL {
            row.set(field, self.get(field).trim());
        }
        row
    }

    pub fn is_blank(&self) -> bool {
        Field::ALL.into_iter().all(|field| self.get(field).is_empty())
    }

    /// Reads one stored element. Anything that is not an object has no
    /// fields and becomes a blank row.
    pub fn from_value(value: Value) -> VisitorRow {
        let Value::Object(map) = value else {
            return VisitorRow::default();
        };
        let mut row = VisitorRow::default();
        for field in Field::ALL {
            if let Some(value) = map.get(field.as_str()) {
                row.set(field, cell_text(value));
            }
        }
        row
    }
}

// Stored records may hold null or non-string values. Falsy values read as
// empty, everything else as the text a browser would show for it.
fn loose_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(cell_text(&Value::deserialize(deserializer)?))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_i64() {
            Some(0) => String::new(),
            Some(int) => int.to_string(),
            None => match number.as_f64() {
                Some(float) if float == 0.0 || float.is_nan() => String::new(),
                Some(float) => float.to_string(),
                None => number.to_string(),
            },
        },
        Value::Array(items) => items.iter().map(array_item_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// Inside arrays only null is blank; `[0, false]` reads as "0,false".
fn array_item_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) if number.as_i64() == Some(0) => "0".to_string(),
        other => cell_text(other),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub number: usize,
    pub fields: VisitorRow,
}

#[derive(Debug, Deserialize)]
pub struct SheetQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SheetResponse {
    pub date: Option<String>,
    pub rows: Vec<RowView>,
    pub toast: Option<Toast>,
}

#[derive(Debug, Deserialize)]
pub struct CellEdit {
    pub date: String,
    pub row: usize,
    pub field: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct AddRowsRequest {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub date: String,
    #[serde(default)]
    pub silent: bool,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub rows: usize,
    pub toast: Option<Toast>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
}
