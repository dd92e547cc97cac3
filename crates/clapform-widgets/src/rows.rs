//! Dynamic row groups.
//!
//! A [`RowGroup`] backs every user-extensible parameter: unbounded lists and
//! `multiple` options. Each row carries an explicit index plus an "add" and
//! a "remove" button bound to that index. Inserting or removing a row
//! renumbers every row after the change point and rebinds their buttons, so
//! a button always acts on the row it sits on.
//!
//! ```text
//! before remove(1)        after remove(1)
//! ┌───┬───────┬───┬───┐   ┌───┬───────┬───┬───┐
//! │ 0 │ "a"   │ + │ - │   │ 0 │ "a"   │ + │ - │
//! │ 1 │ "b"   │ + │ - │   │ 1 │ "c"   │ + │ - │  ← buttons now target 1
//! │ 2 │ "c"   │ + │ - │   └───┴───────┴───┴───┘
//! └───┴───────┴───┴───┘
//! ```
//!
//! Groups have a minimum size: removing below it is a no-op.

/// What a row button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Insert a blank row directly below.
    Add,
    /// Delete this row.
    Remove,
}

/// A button attached to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowButton {
    action: RowAction,
    target: usize,
}

impl RowButton {
    fn new(action: RowAction, target: usize) -> Self {
        Self { action, target }
    }

    pub fn action(&self) -> RowAction {
        self.action
    }

    /// The row index this button currently acts on.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Button caption.
    pub fn caption(&self) -> &'static str {
        match self.action {
            RowAction::Add => "+",
            RowAction::Remove => "-",
        }
    }
}

/// One row of a [`RowGroup`].
#[derive(Debug, Clone)]
pub struct Row<T> {
    index: usize,
    value: T,
    add: RowButton,
    remove: RowButton,
}

impl<T> Row<T> {
    fn new(index: usize, value: T) -> Self {
        Self {
            index,
            value,
            add: RowButton::new(RowAction::Add, index),
            remove: RowButton::new(RowAction::Remove, index),
        }
    }

    fn rebind(&mut self, index: usize) {
        self.index = index;
        self.add.target = index;
        self.remove.target = index;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn add_button(&self) -> RowButton {
        self.add
    }

    pub fn remove_button(&self) -> RowButton {
        self.remove
    }
}

/// Ordered rows with contiguous indices `0..len`.
#[derive(Debug, Clone)]
pub struct RowGroup<T> {
    rows: Vec<Row<T>>,
    min_rows: usize,
}

impl<T> RowGroup<T> {
    /// An empty group that refuses to shrink below `min_rows`.
    ///
    /// The caller is responsible for seeding at least `min_rows` rows.
    pub fn new(min_rows: usize) -> Self {
        Self {
            rows: Vec::new(),
            min_rows,
        }
    }

    /// A group seeded with `values`, one row each, in order.
    pub fn with_rows<I>(min_rows: usize, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let rows = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Row::new(i, v))
            .collect();
        Self { rows, min_rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.rows.get(index).map(|r| &r.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.rows.get_mut(index).map(|r| &mut r.value)
    }

    /// Row values in index order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|r| &r.value)
    }

    /// Inserts `value` directly below `after`, or at the top when `after`
    /// is `None`. Anchors past the end append. Returns the new row's index.
    pub fn add(&mut self, after: Option<usize>, value: T) -> usize {
        let at = after.map_or(0, |i| (i + 1).min(self.rows.len()));
        self.rows.insert(at, Row::new(at, value));
        self.rebind_from(at + 1);
        at
    }

    /// Removes row `index`.
    ///
    /// Returns `None` without touching the group when the index is out of
    /// range or the group is already at its minimum size.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.rows.len() || self.rows.len() <= self.min_rows {
            return None;
        }
        let row = self.rows.remove(index);
        self.rebind_from(index);
        Some(row.value)
    }

    /// Presses one of the buttons on row `row`.
    ///
    /// The button's bound target decides which row is affected; `make`
    /// supplies the value of a newly added row. Returns whether the group
    /// changed.
    pub fn press<F>(&mut self, row: usize, action: RowAction, make: F) -> bool
    where
        F: FnOnce() -> T,
    {
        let Some(r) = self.rows.get(row) else {
            return false;
        };
        match action {
            RowAction::Add => {
                let target = r.add.target;
                self.add(Some(target), make());
                true
            }
            RowAction::Remove => {
                let target = r.remove.target;
                self.remove(target).is_some()
            }
        }
    }

    fn rebind_from(&mut self, start: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(start) {
            row.rebind(i);
        }
    }
}
