//! Table state: sort, pagination, selection and column groups.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::events::EventResult;
use crate::selection::{Selection, SelectionMode};

use super::column::{Alignment, Column, RowKey, TableRow};
use super::sort::{Ownership, SortBy, SortDirection, SortState, sorted_indices};

/// Page sizes offered by the page-size menu.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Derives a row's key.
pub type RowKeyFn<T> = Arc<dyn Fn(&T) -> RowKey + Send + Sync>;

/// Computes footer cells from the sorted rows.
pub type FooterFn<T> = Arc<dyn Fn(&[&T]) -> HashMap<String, String> + Send + Sync>;

pub type SelectionState = Ownership<Selection<RowKey>>;

/// State of the select-all checkbox in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Events for the parent, drained with [`Table::take_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    SortChange(SortBy),
    /// The full requested selection, in display order.
    SelectionChange(Vec<RowKey>),
}

/// A header cell ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub header: String,
    pub align: Alignment,
    pub sortable: bool,
    /// Set on the active sort column.
    pub sort: Option<SortDirection>,
}

/// A body row ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRow {
    pub key: RowKey,
    pub selected: bool,
    /// One entry per visible column.
    pub cells: Vec<String>,
}

/// A client-side data table over an in-memory row list.
///
/// Rows are sorted on the active column, then sliced into pages. Selection
/// is tracked by [`RowKey`] so it survives sorting and paging.
pub struct Table<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    row_key: RowKeyFn<T>,
    sort: SortState,
    selection: SelectionState,
    /// 1-based.
    page: usize,
    page_size: usize,
    collapsed_groups: HashSet<String>,
    footer: Option<FooterFn<T>>,
    /// Row indices in sorted order.
    order: Vec<usize>,
    events: Vec<TableEvent>,
}

impl<T: TableRow> Table<T> {
    pub fn new(
        columns: Vec<Column<T>>,
        row_key: impl Fn(&T) -> RowKey + Send + Sync + 'static,
    ) -> Self {
        let collapsed_groups = columns
            .iter()
            .filter(|c| c.group_collapsed)
            .filter_map(|c| c.group.clone())
            .collect();
        Self {
            columns,
            rows: Vec::new(),
            row_key: Arc::new(row_key),
            sort: SortState::default(),
            selection: Ownership::Uncontrolled(Selection::new(SelectionMode::None)),
            page: 1,
            page_size: PAGE_SIZES[0],
            collapsed_groups,
            footer: None,
            order: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn rows(mut self, rows: Vec<T>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Let the table own selection in the given mode.
    pub fn selectable(mut self, mode: SelectionMode) -> Self {
        self.selection = Ownership::Uncontrolled(Selection::new(mode));
        self
    }

    /// Let the parent own selection; apply its updates with
    /// [`Table::set_controlled_selection`].
    pub fn controlled_selection(
        mut self,
        mode: SelectionMode,
        keys: impl IntoIterator<Item = RowKey>,
    ) -> Self {
        let mut selection = Selection::new(mode);
        selection.selected = keys.into_iter().collect();
        self.selection = Ownership::Controlled(selection);
        self
    }

    /// Start sorted on `sort`, owned by the table.
    pub fn sorted_by(mut self, sort: SortBy) -> Self {
        self.sort = Ownership::Uncontrolled(Some(sort));
        self.resort();
        self
    }

    /// Let the parent own the sort; apply its updates with
    /// [`Table::set_controlled_sort`].
    pub fn controlled_sort(mut self, sort: Option<SortBy>) -> Self {
        self.sort = Ownership::Controlled(sort);
        self.resort();
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.set_page_size(size);
        self
    }

    pub fn footer(
        mut self,
        f: impl Fn(&[&T]) -> HashMap<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.footer = Some(Arc::new(f));
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace all rows. The page is clamped to the new page count.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.resort();
        self.page = self.page.min(self.page_count());
    }

    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn key_of(&self, row: &T) -> RowKey {
        (self.row_key)(row)
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sort_by(&self) -> Option<&SortBy> {
        self.sort.get().as_ref()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Handle a click on a column header.
    ///
    /// Clicking the active column flips its direction; any other sortable
    /// column starts ascending. A controlled table only reports the request.
    pub fn click_header(&mut self, column: &str) -> EventResult {
        let sortable = self.columns.iter().any(|c| c.key == column && c.sortable);
        if !sortable {
            return EventResult::Ignored;
        }

        let next = SortBy::after_click(self.sort_by(), column);
        log::debug!("Table sort requested: {} {:?}", next.column, next.direction);
        if !self.sort.is_controlled() {
            *self.sort.get_mut() = Some(next.clone());
            self.resort();
        }
        self.events.push(TableEvent::SortChange(next));
        EventResult::Consumed
    }

    /// Apply the parent's sort. Returns false for a table that owns its sort.
    pub fn set_controlled_sort(&mut self, sort: Option<SortBy>) -> bool {
        if !self.sort.is_controlled() {
            log::warn!("set_controlled_sort on a table with local sort state");
            return false;
        }
        *self.sort.get_mut() = sort;
        self.resort();
        true
    }

    /// All rows in display order.
    pub fn sorted_rows(&self) -> Vec<&T> {
        self.order.iter().map(|&i| &self.rows[i]).collect()
    }

    fn sorted_keys(&self) -> Vec<RowKey> {
        self.order.iter().map(|&i| self.key_of(&self.rows[i])).collect()
    }

    fn resort(&mut self) {
        self.order = sorted_indices(&self.rows, &self.columns, self.sort.get().as_ref());
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current page, starting at 1.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn current_page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages; an empty table still has one.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Jump to `page`, clamped to the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    /// Change the page size and go back to page 1.
    ///
    /// Sizes outside [`PAGE_SIZES`] are rejected.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZES.contains(&size) {
            log::warn!("Ignoring unsupported page size {}", size);
            return false;
        }
        self.page_size = size;
        self.page = 1;
        true
    }

    /// Rows on the current page, in display order.
    pub fn page_rows(&self) -> Vec<&T> {
        let start = (self.page - 1) * self.page_size;
        self.order
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.rows[i])
            .collect()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.get().mode
    }

    pub fn selection_state(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.get().is_selected(key)
    }

    /// Selected keys in display order, followed by keys of rows no longer
    /// present.
    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.ordered_keys(self.selection.get())
    }

    fn ordered_keys(&self, selection: &Selection<RowKey>) -> Vec<RowKey> {
        let mut keys: Vec<RowKey> = self
            .sorted_keys()
            .into_iter()
            .filter(|k| selection.is_selected(k))
            .collect();
        let mut orphans: Vec<RowKey> = selection
            .iter()
            .filter(|k| !keys.contains(k))
            .cloned()
            .collect();
        orphans.sort();
        keys.extend(orphans);
        keys
    }

    /// Handle a click on a row.
    pub fn click_row(&mut self, key: RowKey) -> EventResult {
        let mut next = self.selection.get().clone();
        if !next.click(key) {
            return EventResult::Ignored;
        }
        self.request_selection(next);
        EventResult::Consumed
    }

    /// The header checkbox: select every sorted row unless all already are,
    /// in which case clear.
    pub fn toggle_all(&mut self) -> EventResult {
        match self.header_check_state() {
            CheckState::Checked => self.clear_selection(),
            _ => self.select_all(),
        }
    }

    /// Select every sorted row, not just the current page.
    pub fn select_all(&mut self) -> EventResult {
        let mut next = self.selection.get().clone();
        if !next.set_all(self.sorted_keys()) {
            return EventResult::Ignored;
        }
        self.request_selection(next);
        EventResult::Consumed
    }

    pub fn clear_selection(&mut self) -> EventResult {
        let mut next = self.selection.get().clone();
        if !next.clear() {
            return EventResult::Ignored;
        }
        self.request_selection(next);
        EventResult::Consumed
    }

    pub fn header_check_state(&self) -> CheckState {
        let selection = self.selection.get();
        let keys = self.sorted_keys();
        let selected = keys.iter().filter(|k| selection.is_selected(k)).count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == keys.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    /// Apply the parent's selection. Returns false for a table that owns its
    /// selection.
    pub fn set_controlled_selection(&mut self, keys: impl IntoIterator<Item = RowKey>) -> bool {
        let Ownership::Controlled(selection) = &mut self.selection else {
            log::warn!("set_controlled_selection on a table with local selection state");
            return false;
        };
        selection.selected = keys.into_iter().collect();
        true
    }

    /// Apply `next` if the table owns selection, and report it either way.
    fn request_selection(&mut self, next: Selection<RowKey>) {
        let keys = self.ordered_keys(&next);
        log::debug!("Table selection requested: {} rows", keys.len());
        if !self.selection.is_controlled() {
            *self.selection.get_mut() = next;
        }
        self.events.push(TableEvent::SelectionChange(keys));
    }

    // -------------------------------------------------------------------------
    // Column groups
    // -------------------------------------------------------------------------

    /// Show or hide every column in `group`. Returns false for an unknown group.
    pub fn toggle_group(&mut self, group: &str) -> bool {
        if !self.columns.iter().any(|c| c.group.as_deref() == Some(group)) {
            return false;
        }
        if !self.collapsed_groups.remove(group) {
            self.collapsed_groups.insert(group.to_string());
        }
        log::debug!(
            "Table group {} {}",
            group,
            if self.is_group_collapsed(group) { "collapsed" } else { "expanded" }
        );
        true
    }

    pub fn is_group_collapsed(&self, group: &str) -> bool {
        self.collapsed_groups.contains(group)
    }

    /// Groups in column order with their collapsed state, for the group menu.
    pub fn groups(&self) -> Vec<(String, bool)> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .filter_map(|c| c.group.as_deref())
            .filter(|g| seen.insert(*g))
            .map(|g| (g.to_string(), self.is_group_collapsed(g)))
            .collect()
    }

    /// Columns that are neither hidden nor in a collapsed group.
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        self.columns
            .iter()
            .filter(|c| !c.hidden)
            .filter(|c| c.group.as_deref().is_none_or(|g| !self.is_group_collapsed(g)))
            .collect()
    }

    /// Width of the empty-state row: visible columns plus the checkbox column.
    pub fn empty_colspan(&self) -> usize {
        let checkbox = usize::from(self.selection_mode() == SelectionMode::Multi);
        self.visible_columns().len() + checkbox
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn header_cells(&self) -> Vec<HeaderCell> {
        let sort = self.sort_by();
        self.visible_columns()
            .into_iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                header: c.header.clone(),
                align: c.align,
                sortable: c.sortable,
                sort: sort.filter(|s| s.column == c.key).map(|s| s.direction),
            })
            .collect()
    }

    /// Rows on the current page with their visible cells.
    pub fn body_rows(&self) -> Vec<BodyRow> {
        let columns = self.visible_columns();
        self.page_rows()
            .into_iter()
            .map(|row| {
                let key = self.key_of(row);
                BodyRow {
                    selected: self.is_selected(&key),
                    key,
                    cells: columns.iter().map(|c| c.display(row)).collect(),
                }
            })
            .collect()
    }

    /// Footer cells computed over all sorted rows.
    pub fn footer_values(&self) -> Option<HashMap<String, String>> {
        let footer = self.footer.as_ref()?;
        Some(footer(&self.sorted_rows()))
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("sort", &self.sort)
            .field("selection", &self.selection)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("collapsed_groups", &self.collapsed_groups)
            .finish()
    }
}
