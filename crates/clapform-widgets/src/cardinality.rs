//! Arity adapters.
//!
//! Wraps the scalar factory for parameters that take more than one value:
//!
//! - tuples get a fixed [`ListView`], one row per slot;
//! - unbounded parameters get an extensible [`ListView`];
//! - `multiple` options get [`MultipleRows`], a [`RowGroup`] of complete
//!   scalar controls, each row emitting its own `--opt value` pair.
//!
//! Blank rows of an unbounded list are omitted from the argument vector.

use std::fmt;
use std::rc::Rc;

use crate::control::{handle, ListView, Widget};
use crate::factory::{self, Built, ValueReader};
use crate::rows::{RowAction, RowGroup};
use crate::spec::{DefaultValue, ParameterSpec};
use crate::style::FormStyle;

pub(crate) fn tuple(param: &ParameterSpec, style: &FormStyle) -> Built {
    let view = handle(ListView::fixed(param, style));
    let flag = param.flag_token().map(str::to_string);
    let state = Rc::clone(&view);
    Built::new(vec![Widget::List(view)], move || {
        flag.iter().cloned().chain(state.borrow().texts()).collect()
    })
}

pub(crate) fn list(param: &ParameterSpec, style: &FormStyle) -> Built {
    let view = handle(ListView::extensible(param, style));
    let flag = param.flag_token().map(str::to_string);
    let state = Rc::clone(&view);
    Built::new(vec![Widget::List(view)], move || {
        let values: Vec<String> = state
            .borrow()
            .texts()
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        if values.is_empty() {
            return Vec::new();
        }
        flag.iter().cloned().chain(values).collect()
    })
}

pub(crate) fn multiple(param: &ParameterSpec, _style: &FormStyle) -> Built {
    let rows = handle(MultipleRows::new(param));
    let state = Rc::clone(&rows);
    Built::new(vec![Widget::Multiple(rows)], move || {
        state.borrow().to_command()
    })
}

/// One occurrence of a `multiple` option: its control and reader.
pub struct Occurrence {
    widget: Widget,
    reader: ValueReader,
}

impl Occurrence {
    fn new(param: &ParameterSpec, default: DefaultValue) -> Self {
        let mut element = param.clone();
        element.multiple = false;
        element.default = default;
        let (widget, reader) = factory::scalar(&element);
        Self { widget, reader }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn read(&self) -> Vec<String> {
        (self.reader)()
    }
}

impl fmt::Debug for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Occurrence").field(&self.widget).finish()
    }
}

/// Rows of a `multiple` option. Never fewer than one.
///
/// Seeded with one row per element of a sequence default, or a single row
/// holding the scalar default. Rows added later start blank.
#[derive(Debug)]
pub struct MultipleRows {
    rows: RowGroup<Occurrence>,
    param: ParameterSpec,
}

impl MultipleRows {
    pub fn new(param: &ParameterSpec) -> Self {
        let seeds: Vec<DefaultValue> = match &param.default {
            DefaultValue::Sequence(items) if !items.is_empty() => {
                items.iter().cloned().map(DefaultValue::Scalar).collect()
            }
            DefaultValue::Sequence(_) => vec![DefaultValue::Absent],
            other => vec![other.clone()],
        };
        let rows = RowGroup::with_rows(1, seeds.into_iter().map(|d| Occurrence::new(param, d)));
        Self {
            rows,
            param: param.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &RowGroup<Occurrence> {
        &self.rows
    }

    pub fn widget(&self, row: usize) -> Option<&Widget> {
        self.rows.get(row).map(Occurrence::widget)
    }

    /// Adds a blank occurrence below `after` (top when `None`).
    pub fn add(&mut self, after: Option<usize>) -> usize {
        let occurrence = Occurrence::new(&self.param, DefaultValue::Absent);
        self.rows.add(after, occurrence)
    }

    pub fn remove(&mut self, row: usize) -> bool {
        self.rows.remove(row).is_some()
    }

    /// Presses the add or remove button of row `row`.
    pub fn press(&mut self, row: usize, action: RowAction) -> bool {
        let param = &self.param;
        self.rows
            .press(row, action, || Occurrence::new(param, DefaultValue::Absent))
    }

    /// Every occurrence's tokens, in row order.
    pub fn to_command(&self) -> Vec<String> {
        self.rows.values().flat_map(Occurrence::read).collect()
    }
}
