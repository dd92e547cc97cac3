//! Headless control state.
//!
//! Each control is a plain state object. The layout and the reader closure
//! of a parameter share a control through an `Rc<RefCell<_>>` handle: the
//! front end edits it, the reader reads it at submission time. Everything
//! here lives on the UI thread.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::cardinality::MultipleRows;
use crate::resolve::{resolve, ControlKind, CustomWidget};
use crate::rows::RowGroup;
use crate::spec::{DefaultValue, ParamType, ParameterSpec};
use crate::style::FormStyle;
use crate::validator::Validator;

/// Shared handle to a control.
pub type Handle<T> = Rc<RefCell<T>>;

pub(crate) fn handle<T>(control: T) -> Handle<T> {
    Rc::new(RefCell::new(control))
}

/// A parameter label with its help text as tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub tooltip: Option<String>,
}

impl Label {
    pub fn for_param(param: &ParameterSpec) -> Self {
        Self {
            text: param.label().to_string(),
            tooltip: param.help.clone(),
        }
    }
}

/// How a text field shows its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    #[default]
    Normal,
    Password,
}

/// Single-line text input with an input mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    text: String,
    placeholder: String,
    validator: Validator,
    echo: EchoMode,
}

impl TextField {
    pub fn new(placeholder: impl Into<String>, validator: Validator) -> Self {
        Self {
            text: String::new(),
            placeholder: placeholder.into(),
            validator,
            echo: EchoMode::Normal,
        }
    }

    pub fn with_echo(mut self, echo: EchoMode) -> Self {
        self.echo = echo;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn validator(&self) -> Validator {
        self.validator
    }

    pub fn echo(&self) -> EchoMode {
        self.echo
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the content. Refused (returns `false`) if the mask rejects it.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if !self.validator.accepts(&text) {
            return false;
        }
        self.text = text;
        true
    }

    /// Types one character at the end. Refused if the mask rejects the result.
    pub fn insert(&mut self, ch: char) -> bool {
        let mut next = self.text.clone();
        next.push(ch);
        self.set_text(next)
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Content as it should be shown, masked for password fields.
    pub fn display(&self) -> String {
        match self.echo {
            EchoMode::Normal => self.text.clone(),
            EchoMode::Password => "*".repeat(self.text.chars().count()),
        }
    }
}

/// What kind of selection a path dialog allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    ExistingFile,
    AnyFile,
    Directory,
    /// Existing file or directory.
    ExistingPath,
    /// Any file or directory name.
    AnyPath,
}

impl FileMode {
    pub fn from_flags(exists: bool, file_okay: bool, dir_okay: bool) -> Self {
        match (exists, file_okay, dir_okay) {
            (true, true, false) => FileMode::ExistingFile,
            (false, true, false) => FileMode::AnyFile,
            (_, false, true) => FileMode::Directory,
            (true, _, _) => FileMode::ExistingPath,
            (false, _, _) => FileMode::AnyPath,
        }
    }
}

/// Request handed to the file-dialog collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    pub start_dir: PathBuf,
    pub filter: String,
    pub accept_label: String,
    pub mode: FileMode,
}

/// Text field with a trailing "browse" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPicker {
    field: TextField,
    mode: FileMode,
}

impl PathPicker {
    pub fn new(placeholder: impl Into<String>, mode: FileMode) -> Self {
        Self {
            field: TextField::new(placeholder, Validator::FreeText),
            mode,
        }
    }

    pub fn field(&self) -> &TextField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut TextField {
        &mut self.field
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Describes the dialog the browse action should open.
    pub fn dialog(&self) -> DialogRequest {
        DialogRequest {
            title: "Select File Dialog".to_string(),
            start_dir: PathBuf::from("./"),
            filter: "*".to_string(),
            accept_label: "Select".to_string(),
            mode: self.mode,
        }
    }

    /// Takes the dialog result; the first selected path wins.
    pub fn accept_selection(&mut self, selected: &[PathBuf]) -> bool {
        match selected.first() {
            Some(path) => self.field.set_text(path.to_string_lossy().into_owned()),
            None => false,
        }
    }
}

/// Horizontal slider over an inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    min: i64,
    max: i64,
    value: i64,
}

impl Slider {
    /// Starts at `default` when it lies in range, otherwise at the midpoint.
    pub fn new(min: i64, max: i64, default: Option<i64>) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let value = match default {
            Some(v) if (min..=max).contains(&v) => v,
            _ => (i128::from(min) + i128::from(max)).div_euclid(2) as i64,
        };
        Self { min, max, value }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Moves the slider; out-of-range values clamp.
    pub fn set_value(&mut self, value: i64) {
        self.value = value.clamp(self.min, self.max);
    }

    /// Width reserved for the value label next to the slider.
    pub fn label_width(&self) -> usize {
        let digits = |x: i64| {
            if x == 0 {
                1
            } else {
                (x.unsigned_abs() as f64).log10().ceil() as usize
            }
        };
        digits(self.min).max(digits(self.max)) + 1
    }
}

/// Drop-down selector over a fixed set of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboBox {
    options: Vec<String>,
    current: Option<usize>,
}

impl ComboBox {
    pub fn new(options: Vec<String>, default: Option<&str>) -> Self {
        let current = default
            .and_then(|d| options.iter().position(|o| o == d))
            .or(if options.is_empty() { None } else { Some(0) });
        Self { options, current }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_text(&self) -> Option<&str> {
        self.current.map(|i| self.options[i].as_str())
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    pub fn select_text(&mut self, text: &str) -> bool {
        match self.options.iter().position(|o| o == text) {
            Some(i) => self.select(i),
            None => false,
        }
    }
}

/// Labelled on/off switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckBox {
    pub label: String,
    pub tooltip: Option<String>,
    checked: bool,
}

impl CheckBox {
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            tooltip: None,
            checked,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

/// Integer stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinBox {
    value: u32,
    max: u32,
}

impl SpinBox {
    pub const DEFAULT_MAX: u32 = 99;

    pub fn new(value: u32) -> Self {
        Self {
            value: value.min(Self::DEFAULT_MAX),
            max: Self::DEFAULT_MAX,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn set_value(&mut self, value: u32) {
        self.value = value.min(self.max);
    }

    pub fn step_up(&mut self) {
        self.set_value(self.value.saturating_add(1));
    }

    pub fn step_down(&mut self) {
        self.value = self.value.saturating_sub(1);
    }
}

/// One cell of a [`ListView`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListCell {
    text: String,
    slot_type: ParamType,
    editor: ControlKind,
    foreground: String,
}

impl ListCell {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn slot_type(&self) -> &ParamType {
        &self.slot_type
    }

    /// Editor the front end should open for this cell.
    pub fn editor(&self) -> ControlKind {
        self.editor
    }

    /// Colour the cell text is painted in.
    pub fn foreground(&self) -> &str {
        &self.foreground
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Cell text, or the slot type name when blank.
    pub fn display(&self) -> String {
        if self.text.is_empty() {
            self.slot_type.name()
        } else {
            self.text.clone()
        }
    }
}

const LIST_SHORTCUTS: &str =
    "'a': add a new item below the selected one\n'd': delete the selected item";

/// Vertical list of editable cells.
///
/// Tuples get a fixed list (one row per slot); unbounded parameters get an
/// extensible one.
#[derive(Debug, Clone)]
pub struct ListView {
    rows: RowGroup<ListCell>,
    param_type: ParamType,
    extensible: bool,
    text_color: String,
    placeholder_color: String,
}

impl ListView {
    /// One row per slot, seeded from the default, not user-extensible.
    pub fn fixed(param: &ParameterSpec, style: &FormStyle) -> Self {
        let slots = param.slot_count();
        let mut view = Self::empty(param, false, style);
        let cells: Vec<ListCell> = (0..slots)
            .map(|slot| {
                let text = param.default.item(slot).unwrap_or_default().to_string();
                view.cell(param.slot_type(slot), text)
            })
            .collect();
        view.rows = RowGroup::with_rows(slots, cells);
        view
    }

    /// User-extensible list seeded with the default elements.
    pub fn extensible(param: &ParameterSpec, style: &FormStyle) -> Self {
        let mut view = Self::empty(param, true, style);
        let seed: Vec<String> = match &param.default {
            DefaultValue::Absent => Vec::new(),
            DefaultValue::Scalar(s) => vec![s.clone()],
            DefaultValue::Sequence(items) => items.clone(),
        };
        let cells: Vec<ListCell> = seed
            .into_iter()
            .enumerate()
            .map(|(i, text)| view.cell(param.slot_type(i), text))
            .collect();
        view.rows = RowGroup::with_rows(0, cells);
        view
    }

    fn empty(param: &ParameterSpec, extensible: bool, style: &FormStyle) -> Self {
        Self {
            rows: RowGroup::new(0),
            param_type: param.ty.clone(),
            extensible,
            text_color: style.text_color.clone(),
            placeholder_color: style.placeholder_color.clone(),
        }
    }

    fn cell(&self, slot_type: ParamType, text: String) -> ListCell {
        let foreground = if text.is_empty() {
            self.placeholder_color.clone()
        } else {
            self.text_color.clone()
        };
        ListCell {
            editor: resolve(&slot_type),
            slot_type,
            text,
            foreground,
        }
    }

    fn slot_type(&self, row: usize) -> ParamType {
        match &self.param_type {
            ParamType::Tuple { element_types } => element_types
                .get(row)
                .cloned()
                .unwrap_or(ParamType::String),
            other => other.clone(),
        }
    }

    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &RowGroup<ListCell> {
        &self.rows
    }

    pub fn cell_at(&self, row: usize) -> Option<&ListCell> {
        self.rows.get(row)
    }

    /// Keyboard help for extensible lists.
    pub fn tooltip(&self) -> Option<&'static str> {
        self.extensible.then_some(LIST_SHORTCUTS)
    }

    /// Commits an edit to row `row`, checked against the slot's input mask.
    pub fn edit(&mut self, row: usize, text: impl Into<String>) -> bool {
        let text = text.into();
        let (text_color, placeholder_color) = (&self.text_color, &self.placeholder_color);
        let Some(cell) = self.rows.get_mut(row) else {
            return false;
        };
        if !Validator::for_type(&cell.slot_type).accepts(&text) {
            return false;
        }
        cell.foreground = if text.is_empty() {
            placeholder_color.clone()
        } else {
            text_color.clone()
        };
        cell.text = text;
        true
    }

    /// Inserts a blank row below `after` (top when `None`).
    pub fn insert_after(&mut self, after: Option<usize>) -> Option<usize> {
        if !self.extensible {
            return None;
        }
        let at = after.map_or(0, |i| (i + 1).min(self.rows.len()));
        let cell = self.cell(self.slot_type(at), String::new());
        Some(self.rows.add(after, cell))
    }

    pub fn remove(&mut self, row: usize) -> bool {
        self.extensible && self.rows.remove(row).is_some()
    }

    /// Applies a list shortcut key to the current selection.
    pub fn press_key(&mut self, key: char, selection: &[usize]) -> bool {
        if !self.extensible {
            return false;
        }
        let mut selected: Vec<usize> = selection.to_vec();
        selected.sort_unstable_by(|a, b| b.cmp(a));
        selected.dedup();
        let mut changed = false;
        match key.to_ascii_lowercase() {
            'a' if selected.is_empty() => changed = self.insert_after(None).is_some(),
            'a' => {
                for i in selected {
                    if i < self.len() {
                        changed |= self.insert_after(Some(i)).is_some();
                    }
                }
            }
            'd' => {
                for i in selected {
                    changed |= self.remove(i);
                }
            }
            _ => {}
        }
        changed
    }

    /// Cell texts in row order, blanks included.
    pub fn texts(&self) -> Vec<String> {
        self.rows.values().map(|c| c.text.clone()).collect()
    }
}

/// A control placed in a form.
#[derive(Clone)]
pub enum Widget {
    Label(Label),
    Text(Handle<TextField>),
    Path(Handle<PathPicker>),
    Slider(Handle<Slider>),
    Choice(Handle<ComboBox>),
    Check(Handle<CheckBox>),
    Spin(Handle<SpinBox>),
    List(Handle<ListView>),
    Multiple(Handle<MultipleRows>),
    Custom(Rc<dyn CustomWidget>),
}

impl Widget {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Widget::Label(_) => "label",
            Widget::Text(_) => "text",
            Widget::Path(_) => "path",
            Widget::Slider(_) => "slider",
            Widget::Choice(_) => "choice",
            Widget::Check(_) => "check",
            Widget::Spin(_) => "spin",
            Widget::List(_) => "list",
            Widget::Multiple(_) => "multiple",
            Widget::Custom(_) => "custom",
        }
    }

    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Widget::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Handle<TextField>> {
        match self {
            Widget::Text(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Handle<PathPicker>> {
        match self {
            Widget::Path(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_slider(&self) -> Option<&Handle<Slider>> {
        match self {
            Widget::Slider(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&Handle<ComboBox>> {
        match self {
            Widget::Choice(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_check(&self) -> Option<&Handle<CheckBox>> {
        match self {
            Widget::Check(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_spin(&self) -> Option<&Handle<SpinBox>> {
        match self {
            Widget::Spin(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Handle<ListView>> {
        match self {
            Widget::List(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&Handle<MultipleRows>> {
        match self {
            Widget::Multiple(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Widget::Label(l) => f.debug_tuple("Label").field(&l.text).finish(),
            other => write!(f, "Widget({})", other.kind_name()),
        }
    }
}
