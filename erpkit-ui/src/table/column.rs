//! Row keys, cell values and column definitions.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Stable identity of a table row, independent of sort and page order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Int(i64),
    Str(String),
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        RowKey::Int(value)
    }
}

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        RowKey::Str(value.to_string())
    }
}

impl From<String> for RowKey {
    fn from(value: String) -> Self {
        RowKey::Str(value)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Int(n) => write!(f, "{n}"),
            RowKey::Str(s) => f.write_str(s),
        }
    }
}

/// A single cell's sortable value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Int(_) | CellValue::Float(_) => 1,
            CellValue::Text(_) => 2,
        }
    }

    /// Total order used for sorting.
    ///
    /// Numbers compare numerically across int/float, text compares ignoring
    /// case first. Mixed kinds order as bool < number < text.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    /// Convert a JSON value. `null`, arrays and objects have no cell value
    /// except through their JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(CellValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(CellValue::Int)
                .or_else(|| n.as_f64().map(CellValue::Float)),
            Value::String(s) => Some(CellValue::Text(s.clone())),
            other => Some(CellValue::Text(other.to_string())),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Records that can be shown as table rows.
pub trait TableRow {
    /// The value under `column`, or `None` when the record has none.
    fn cell(&self, column: &str) -> Option<CellValue>;
}

impl TableRow for Map<String, Value> {
    fn cell(&self, column: &str) -> Option<CellValue> {
        self.get(column).and_then(CellValue::from_json)
    }
}

impl TableRow for Value {
    fn cell(&self, column: &str) -> Option<CellValue> {
        self.get(column).and_then(CellValue::from_json)
    }
}

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Custom cell renderer.
pub type RenderFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Column configuration.
///
/// ```ignore
/// let columns = vec![
///     Column::new("id", "ID").sortable().align(Alignment::Right),
///     Column::new("name", "Name").sortable(),
///     Column::new("cost", "Cost").group("pricing"),
///     Column::new("price", "Price").group("pricing").collapsed(),
/// ];
/// ```
pub struct Column<T> {
    pub key: String,
    pub header: String,
    pub align: Alignment,
    pub sortable: bool,
    /// Group whose toggle shows and hides this column.
    pub group: Option<String>,
    /// Initial collapsed state of the column's group.
    pub group_collapsed: bool,
    pub hidden: bool,
    render: Option<RenderFn<T>>,
}

impl<T> Column<T> {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            align: Alignment::Left,
            sortable: false,
            group: None,
            group_collapsed: false,
            hidden: false,
            render: None,
        }
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Start with this column's group collapsed.
    pub fn collapsed(mut self) -> Self {
        self.group_collapsed = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn render(mut self, f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(f));
        self
    }
}

impl<T: TableRow> Column<T> {
    pub fn value_of(&self, row: &T) -> Option<CellValue> {
        row.cell(&self.key)
    }

    /// Cell text: the custom renderer if any, else the value's display.
    pub fn display(&self, row: &T) -> String {
        match &self.render {
            Some(render) => render(row),
            None => self
                .value_of(row)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            align: self.align,
            sortable: self.sortable,
            group: self.group.clone(),
            group_collapsed: self.group_collapsed,
            hidden: self.hidden,
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("align", &self.align)
            .field("sortable", &self.sortable)
            .field("group", &self.group)
            .field("group_collapsed", &self.group_collapsed)
            .field("hidden", &self.hidden)
            .field("render", &self.render.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_compare_numbers_across_kinds() {
        assert_eq!(CellValue::Int(2).compare(&CellValue::Float(2.5)), Ordering::Less);
        assert_eq!(CellValue::Float(3.0).compare(&CellValue::Int(3)), Ordering::Equal);
    }

    #[test]
    fn test_compare_text_ignores_case() {
        assert_eq!(CellValue::from("apple").compare(&CellValue::from("Banana")), Ordering::Less);
    }

    #[test]
    fn test_json_cells() {
        let row = json!({"id": 7, "name": "Bolt", "price": 1.5, "note": null});
        assert_eq!(row.cell("id"), Some(CellValue::Int(7)));
        assert_eq!(row.cell("price"), Some(CellValue::Float(1.5)));
        assert_eq!(row.cell("note"), None);
        assert_eq!(row.cell("missing"), None);
    }

    #[test]
    fn test_display_uses_renderer() {
        let plain: Column<Value> = Column::new("price", "Price");
        let money: Column<Value> = Column::new("price", "Price")
            .render(|row: &Value| format!("${:.2}", row["price"].as_f64().unwrap_or(0.0)));
        let row = json!({"price": 1.5});
        assert_eq!(plain.display(&row), "1.5");
        assert_eq!(money.display(&row), "$1.50");
        assert_eq!(plain.display(&json!({})), "");
    }
}
