//! Client-side data table.

mod column;
mod sort;
mod state;

pub use column::{Alignment, CellValue, Column, RenderFn, RowKey, TableRow};
pub use sort::{Ownership, SortBy, SortDirection, SortState, compare_cells, sorted_indices};
pub use state::{
    BodyRow, CheckState, FooterFn, HeaderCell, PAGE_SIZES, RowKeyFn, SelectionState, Table,
    TableEvent,
};
