//! Sorting and state ownership.

use std::cmp::Ordering;

use super::column::{CellValue, Column, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    pub column: String,
    pub direction: SortDirection,
}

impl SortBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }

    /// The sort after clicking `column`'s header.
    pub fn after_click(current: Option<&SortBy>, column: &str) -> SortBy {
        match current {
            Some(sort) if sort.column == column => SortBy {
                column: column.to_string(),
                direction: sort.direction.toggled(),
            },
            _ => SortBy::asc(column),
        }
    }
}

/// Who owns a piece of table state. Chosen once when the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership<T> {
    /// The parent owns the value; the table only reports requested changes.
    Controlled(T),
    /// The table owns the value.
    Uncontrolled(T),
}

impl<T> Ownership<T> {
    pub fn get(&self) -> &T {
        match self {
            Ownership::Controlled(value) | Ownership::Uncontrolled(value) => value,
        }
    }

    pub(super) fn get_mut(&mut self) -> &mut T {
        match self {
            Ownership::Controlled(value) | Ownership::Uncontrolled(value) => value,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Ownership::Controlled(_))
    }
}

pub type SortState = Ownership<Option<SortBy>>;

impl Default for SortState {
    fn default() -> Self {
        Ownership::Uncontrolled(None)
    }
}

/// Compare two optional cells. Missing values go last in either direction.
pub fn compare_cells(
    a: Option<&CellValue>,
    b: Option<&CellValue>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.compare(b),
            SortDirection::Desc => b.compare(a),
        },
    }
}

/// Row indices in display order. The sort is stable.
pub fn sorted_indices<T: TableRow>(
    rows: &[T],
    columns: &[Column<T>],
    sort: Option<&SortBy>,
) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let Some(sort) = sort else {
        return indices;
    };
    let Some(column) = columns.iter().find(|c| c.key == sort.column) else {
        log::warn!("Sort requested on unknown column {:?}", sort.column);
        return indices;
    };

    let keys: Vec<Option<CellValue>> = rows.iter().map(|row| column.value_of(row)).collect();
    indices.sort_by(|&a, &b| compare_cells(keys[a].as_ref(), keys[b].as_ref(), sort.direction));
    indices
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_after_click() {
        let first = SortBy::after_click(None, "name");
        assert_eq!(first, SortBy::asc("name"));
        let second = SortBy::after_click(Some(&first), "name");
        assert_eq!(second, SortBy::desc("name"));
        assert_eq!(SortBy::after_click(Some(&second), "id"), SortBy::asc("id"));
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let rows = vec![json!({"n": null}), json!({"n": 2}), json!({"n": 1})];
        let columns: Vec<Column<Value>> = vec![Column::new("n", "N").sortable()];

        let asc = sorted_indices(&rows, &columns, Some(&SortBy::asc("n")));
        assert_eq!(asc, vec![2, 1, 0]);
        let desc = sorted_indices(&rows, &columns, Some(&SortBy::desc("n")));
        assert_eq!(desc, vec![1, 2, 0]);
    }

    #[test]
    fn test_unknown_column_keeps_order() {
        let rows = vec![json!({"n": 2}), json!({"n": 1})];
        let columns: Vec<Column<Value>> = vec![Column::new("n", "N")];
        assert_eq!(sorted_indices(&rows, &columns, Some(&SortBy::asc("x"))), vec![0, 1]);
    }
}
