//! `erpkit table`: page through a list endpoint as a table.

use erpkit_lib::ErpClient;
use erpkit_ui::table::{
    Alignment, Column, HeaderCell, PAGE_SIZES, RowKey, SortBy, SortDirection, Table,
};
use serde_json::Value;

use super::parse_params;
use crate::error::CliError;

/// What to show and how.
#[derive(Debug, Clone)]
pub struct TableView {
    pub key: String,
    /// Empty means every field of the first row.
    pub columns: Vec<String>,
    pub sort: Option<String>,
    pub descending: bool,
    pub page: usize,
    pub page_size: usize,
}

pub async fn table(
    client: &ErpClient,
    endpoint: &str,
    params: &[String],
    view: TableView,
) -> Result<(), CliError> {
    if !PAGE_SIZES.contains(&view.page_size) {
        return Err(CliError::InvalidPageSize(view.page_size));
    }
    let rows = client.list(endpoint, &parse_params(params)?).await?;
    log::info!("Fetched {} rows from {}", rows.len(), endpoint);

    let table = build(rows, &view);
    print!("{}", render(&table));
    Ok(())
}

fn build(rows: Vec<Value>, view: &TableView) -> Table<Value> {
    let keys: Vec<String> = if view.columns.is_empty() {
        rows.first()
            .and_then(Value::as_object)
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    } else {
        view.columns.clone()
    };

    let columns = keys
        .iter()
        .map(|key| {
            let numeric = rows.iter().any(|r| r.get(key).is_some_and(Value::is_number));
            let align = if numeric { Alignment::Right } else { Alignment::Left };
            Column::new(key.as_str(), key.as_str()).sortable().align(align)
        })
        .collect();

    let key_field = view.key.clone();
    let mut table = Table::new(columns, move |row: &Value| row_key(row, &key_field))
        .rows(rows)
        .page_size(view.page_size);

    if let Some(column) = &view.sort {
        let sort = if view.descending { SortBy::desc(column) } else { SortBy::asc(column) };
        table = table.sorted_by(sort);
    }
    table.go_to_page(view.page);
    table
}

fn row_key(row: &Value, field: &str) -> RowKey {
    match row.get(field) {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(RowKey::Int)
            .unwrap_or_else(|| RowKey::Str(n.to_string())),
        Some(Value::String(s)) => RowKey::Str(s.clone()),
        Some(other) => RowKey::Str(other.to_string()),
        None => RowKey::Str(String::new()),
    }
}

fn render(table: &Table<Value>) -> String {
    let headers = table.header_cells();
    let body = table.body_rows();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .map(|r| r.cells[i].chars().count())
                .chain([label(h).chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| pad(&label(h), w, Alignment::Left))
        .collect();
    out.push_str(header_line.join("  ").trim_end());
    out.push('\n');

    if body.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &body {
        let line: Vec<String> = row
            .cells
            .iter()
            .zip(headers.iter().zip(&widths))
            .map(|(cell, (h, &w))| pad(cell, w, h.align))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "Page {} of {} ({} rows)\n",
        table.page(),
        table.page_count(),
        table.len()
    ));
    out
}

fn label(header: &HeaderCell) -> String {
    match header.sort {
        Some(SortDirection::Asc) => format!("{} ^", header.header),
        Some(SortDirection::Desc) => format!("{} v", header.header),
        None => header.header.clone(),
    }
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    match align {
        Alignment::Left => format!("{text:<width$}"),
        Alignment::Center => format!("{text:^width$}"),
        Alignment::Right => format!("{text:>width$}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn view() -> TableView {
        TableView {
            key: "id".to_string(),
            columns: Vec::new(),
            sort: Some("name".to_string()),
            descending: false,
            page: 1,
            page_size: 10,
        }
    }

    #[test]
    fn test_render_sorted_page() {
        let rows = vec![
            json!({"id": 1, "name": "Bolt", "qty": 120}),
            json!({"id": 2, "name": "Anchor", "qty": 4}),
        ];
        let text = render(&build(rows, &view()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id  name ^  qty");
        assert_eq!(lines[1], " 2  Anchor    4");
        assert_eq!(lines[2], " 1  Bolt    120");
        assert_eq!(lines[3], "Page 1 of 1 (2 rows)");
    }

    #[test]
    fn test_render_empty() {
        let text = render(&build(Vec::new(), &view()));
        assert!(text.contains("(no rows)"));
    }

    #[test]
    fn test_row_keys() {
        assert_eq!(row_key(&json!({"id": 3}), "id"), RowKey::Int(3));
        assert_eq!(row_key(&json!({"code": "A-1"}), "code"), RowKey::from("A-1"));
    }
}
