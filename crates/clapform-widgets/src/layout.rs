//! Layout binder.
//!
//! A [`FormTree`] holds one [`CommandLayout`] per command of a
//! [`CommandSpec`] tree, stored in an arena and linked child to parent by
//! [`LayoutId`]. Each layout places its controls on a two-column grid:
//!
//! ```text
//! row 0   help text                  (spans both columns, when present)
//! row 1   ───────────────────────    (separator, when help is present)
//! row n   label | control            (one row per parameter)
//! ...
//! row k   [ tab: build | tab: test ] (dispatchers only)
//! row k+1 (blank)
//! row k+2 [Run] [Copy]               (leaves only)
//! ```
//!
//! A layout owns the readers of its own parameters. The argument vector of
//! a leaf is assembled by walking its parent chain back to the root and
//! concatenating every level root first.

use std::fmt;

use crate::argv::{self, CommandLevel};
use crate::control::Widget;
use crate::factory::{self, ValueReader};
use crate::spec::CommandSpec;
use crate::style::FormStyle;

/// Index of a layout within its [`FormTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(usize);

impl LayoutId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a command button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Run,
    Copy,
}

/// A button in a leaf's button row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandButton {
    /// Caption with `&` marking the mnemonic.
    pub caption: &'static str,
    pub tooltip: &'static str,
    pub action: ButtonAction,
}

impl CommandButton {
    /// Caption without the mnemonic marker.
    pub fn text(&self) -> String {
        self.caption.replace('&', "")
    }
}

fn command_buttons() -> Vec<CommandButton> {
    vec![
        CommandButton {
            caption: "&Run",
            tooltip: "run command",
            action: ButtonAction::Run,
        },
        CommandButton {
            caption: "&Copy",
            tooltip: "copy command to clipboard",
            action: ButtonAction::Copy,
        },
    ]
}

/// Subcommand pages of a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tabs {
    pages: Vec<(String, LayoutId)>,
    active: usize,
}

impl Tabs {
    pub fn pages(&self) -> &[(String, LayoutId)] {
        &self.pages
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_page(&self) -> Option<LayoutId> {
        self.pages.get(self.active).map(|(_, id)| *id)
    }
}

/// Content of one grid cell.
#[derive(Debug, Clone)]
pub enum LayoutItem {
    Help(String),
    Separator,
    Widget(Widget),
    Tabs(Tabs),
    Buttons(Vec<CommandButton>),
}

/// A placed item.
#[derive(Debug, Clone)]
pub struct GridItem {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub item: LayoutItem,
}

/// Items placed on rows and columns.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    items: Vec<GridItem>,
}

impl Grid {
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        item: LayoutItem,
    ) {
        self.items.push(GridItem {
            row,
            col,
            row_span,
            col_span,
            item,
        });
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    /// One past the last occupied row.
    pub fn row_count(&self) -> usize {
        self.items
            .iter()
            .map(|i| i.row + i.row_span)
            .max()
            .unwrap_or(0)
    }

    /// The item whose origin is `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> Option<&LayoutItem> {
        self.items
            .iter()
            .find(|i| i.row == row && i.col == col)
            .map(|i| &i.item)
    }

    /// Items on `row`, left to right.
    pub fn row(&self, row: usize) -> Vec<&GridItem> {
        let mut items: Vec<&GridItem> = self.items.iter().filter(|i| i.row == row).collect();
        items.sort_by_key(|i| i.col);
        items
    }

    fn tabs_mut(&mut self) -> Option<&mut Tabs> {
        self.items.iter_mut().find_map(|i| match &mut i.item {
            LayoutItem::Tabs(t) => Some(t),
            _ => None,
        })
    }

    fn tabs(&self) -> Option<&Tabs> {
        self.items.iter().find_map(|i| match &i.item {
            LayoutItem::Tabs(t) => Some(t),
            _ => None,
        })
    }
}

/// Controls of one parameter, as placed in its layout.
#[derive(Debug, Clone)]
pub struct ParamWidgets {
    pub name: String,
    pub row: usize,
    pub widgets: Vec<Widget>,
}

/// The form for one command level.
pub struct CommandLayout {
    id: LayoutId,
    name: String,
    parent: Option<LayoutId>,
    background: Option<bool>,
    grid: Grid,
    params: Vec<ParamWidgets>,
    readers: Vec<ValueReader>,
}

impl CommandLayout {
    pub fn id(&self) -> LayoutId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// Per-command execution override.
    pub fn background(&self) -> Option<bool> {
        self.background
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn params(&self) -> &[ParamWidgets] {
        &self.params
    }

    pub fn tabs(&self) -> Option<&Tabs> {
        self.grid.tabs()
    }

    pub fn is_dispatcher(&self) -> bool {
        self.tabs().is_some()
    }

    /// This level's own tokens, name first.
    pub fn level(&self) -> CommandLevel<'_> {
        CommandLevel {
            name: &self.name,
            readers: &self.readers,
        }
    }
}

impl fmt::Debug for CommandLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLayout")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// All command layouts of a form.
#[derive(Debug)]
pub struct FormTree {
    layouts: Vec<CommandLayout>,
}

impl FormTree {
    /// Builds layouts for `spec` and every subcommand below it.
    pub fn build(spec: &CommandSpec, style: &FormStyle) -> Self {
        let mut tree = Self {
            layouts: Vec::new(),
        };
        tree.build_level(spec, None, style);
        tracing::debug!(
            command = %spec.name,
            layouts = tree.layouts.len(),
            "built form layouts"
        );
        tree
    }

    fn build_level(
        &mut self,
        spec: &CommandSpec,
        parent: Option<LayoutId>,
        style: &FormStyle,
    ) -> LayoutId {
        let id = LayoutId(self.layouts.len());
        self.layouts.push(CommandLayout {
            id,
            name: spec.name.clone(),
            parent,
            background: spec.background,
            grid: Grid::default(),
            params: Vec::new(),
            readers: Vec::new(),
        });

        let mut grid = Grid::default();
        if let Some(help) = &spec.help {
            grid.place(0, 0, 1, 2, LayoutItem::Help(help.clone()));
            grid.place(1, 0, 1, 2, LayoutItem::Separator);
        }

        let mut params = Vec::with_capacity(spec.params.len());
        let mut readers = Vec::with_capacity(spec.params.len());
        for param in &spec.params {
            let row = grid.row_count();
            let built = factory::build(param, style);
            for (col, widget) in built.widgets.iter().enumerate() {
                grid.place(row, col, 1, 1, LayoutItem::Widget(widget.clone()));
            }
            params.push(ParamWidgets {
                name: param.name.clone(),
                row,
                widgets: built.widgets,
            });
            readers.push(built.reader);
        }

        if spec.is_dispatcher() {
            let pages = spec
                .subcommands
                .iter()
                .map(|sub| (sub.name.clone(), self.build_level(sub, Some(id), style)))
                .collect();
            let row = grid.row_count();
            grid.place(row, 0, 1, 2, LayoutItem::Tabs(Tabs { pages, active: 0 }));
        } else {
            let row = grid.row_count() + 1;
            grid.place(row, 0, 1, 2, LayoutItem::Buttons(command_buttons()));
        }

        let layout = &mut self.layouts[id.0];
        layout.grid = grid;
        layout.params = params;
        layout.readers = readers;
        id
    }

    pub fn root(&self) -> LayoutId {
        LayoutId(0)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn layout(&self, id: LayoutId) -> Option<&CommandLayout> {
        self.layouts.get(id.0)
    }

    pub fn layouts(&self) -> &[CommandLayout] {
        &self.layouts
    }

    /// Finds a layout by its command path below the root, e.g.
    /// `["remote", "add"]`. An empty path is the root.
    pub fn find(&self, path: &[&str]) -> Option<LayoutId> {
        let mut current = self.root();
        for name in path {
            let tabs = self.layout(current)?.tabs()?;
            current = tabs
                .pages()
                .iter()
                .find(|(page, _)| page == name)
                .map(|(_, id)| *id)?;
        }
        Some(current)
    }

    /// Layout ids from the root down to `id`.
    pub fn chain(&self, id: LayoutId) -> Vec<LayoutId> {
        let mut chain = Vec::new();
        let mut next = self.layout(id).map(|l| l.id);
        while let Some(current) = next {
            chain.push(current);
            next = self.layouts[current.0].parent;
        }
        chain.reverse();
        chain
    }

    /// The argument vector for running the command shown by `id`.
    pub fn argv(&self, id: LayoutId) -> Vec<String> {
        argv::assemble(
            self.chain(id)
                .into_iter()
                .map(|l| self.layouts[l.0].level()),
        )
    }

    /// Activates tab `index` of dispatcher `id`.
    pub fn select_tab(&mut self, id: LayoutId, index: usize) -> bool {
        let Some(tabs) = self.layouts.get_mut(id.0).and_then(|l| l.grid.tabs_mut()) else {
            return false;
        };
        if index >= tabs.pages.len() {
            return false;
        }
        tabs.active = index;
        true
    }

    /// Activates the tab named `name` of dispatcher `id`.
    pub fn select_tab_named(&mut self, id: LayoutId, name: &str) -> bool {
        let index = self
            .layout(id)
            .and_then(|l| l.tabs())
            .and_then(|t| t.pages.iter().position(|(page, _)| page == name));
        match index {
            Some(i) => self.select_tab(id, i),
            None => false,
        }
    }

    /// Follows active tabs from the root to the leaf currently shown.
    pub fn active_leaf(&self) -> LayoutId {
        let mut current = self.root();
        while let Some(next) = self
            .layout(current)
            .and_then(|l| l.tabs())
            .and_then(Tabs::active_page)
        {
            current = next;
        }
        current
    }

    /// Controls of parameter `param` in layout `id`.
    pub fn widgets_for(&self, id: LayoutId, param: &str) -> Option<&[Widget]> {
        self.layout(id)?
            .params
            .iter()
            .find(|p| p.name == param)
            .map(|p| p.widgets.as_slice())
    }
}
