//! Text rendering of a form.
//!
//! Produces a terminal picture of the current form state: help text and
//! separator, one line per parameter (label column, then a summary of the
//! control), the tab strip of a dispatcher followed by its active page,
//! and the command buttons of a leaf. With `styled` set the output carries
//! ANSI colours taken from the [`FormStyle`]; without it the output is
//! plain text, which is what tests compare against.

use console::{Color, Style};
use unicode_width::UnicodeWidthStr;

use clapform_widgets::control::{ListView, TextField};
use clapform_widgets::layout::{GridItem, Tabs};
use clapform_widgets::{FormStyle, FormTree, LayoutId, LayoutItem, MultipleRows, Widget};

const SEPARATOR_WIDTH: usize = 40;
const INDENT: &str = "  ";

/// Renders `tree` from its root, following the active tab at each level.
pub fn render(tree: &FormTree, style: &FormStyle, styled: bool) -> String {
    let painter = Painter::new(style, styled);
    let mut out = String::new();
    painter.layout(tree, tree.root(), 0, &mut out);
    out
}

struct Painter {
    styled: bool,
    text: Style,
    placeholder: Style,
    label: Style,
    help: Style,
    active_tab: Style,
}

impl Painter {
    fn new(form_style: &FormStyle, styled: bool) -> Self {
        let base = Style::new().force_styling(styled);
        let text = match form_style.text() {
            Ok(color) => base.clone().fg(color),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring text colour");
                base.clone()
            }
        };
        let placeholder = match form_style.placeholder() {
            Ok(color) => base.clone().fg(color),
            Err(_) => base.clone().fg(Color::Black).dim(),
        };
        let label = if form_style.bold_labels {
            text.clone().bold()
        } else {
            text.clone()
        };
        let help = if form_style.italic_help {
            text.clone().italic()
        } else {
            text.clone()
        };
        Self {
            styled,
            active_tab: text.clone().bold().underlined(),
            text,
            placeholder,
            label,
            help,
        }
    }

    fn paint(&self, style: &Style, s: &str) -> String {
        if self.styled {
            style.apply_to(s).to_string()
        } else {
            s.to_string()
        }
    }

    fn layout(&self, tree: &FormTree, id: LayoutId, depth: usize, out: &mut String) {
        let Some(layout) = tree.layout(id) else {
            return;
        };
        let indent = INDENT.repeat(depth);
        let grid = layout.grid();
        let label_width = label_column_width(grid.items());

        for row in 0..grid.row_count() {
            let items = grid.row(row);
            let Some(first) = items.first() else {
                continue;
            };
            match &first.item {
                LayoutItem::Help(help) => {
                    for line in help.lines() {
                        out.push_str(&format!("{indent}{}\n", self.paint(&self.help, line)));
                    }
                }
                LayoutItem::Separator => {
                    out.push_str(&format!("{indent}{}\n", "─".repeat(SEPARATOR_WIDTH)));
                }
                LayoutItem::Tabs(tabs) => self.tabs(tree, tabs, depth, out),
                LayoutItem::Buttons(buttons) => {
                    let strip: Vec<String> = buttons
                        .iter()
                        .map(|b| format!("[{}]", b.text()))
                        .collect();
                    out.push_str(&format!("{indent}{}\n", strip.join(" ")));
                }
                LayoutItem::Widget(_) => self.param_row(&items, label_width, &indent, out),
            }
        }
    }

    fn param_row(&self, items: &[&GridItem], label_width: usize, indent: &str, out: &mut String) {
        let mut label = String::new();
        let mut controls = Vec::new();
        for item in items {
            let LayoutItem::Widget(widget) = &item.item else {
                continue;
            };
            match widget {
                Widget::Label(l) => label = l.text.clone(),
                other => controls.push(self.widget(other)),
            }
        }
        let padded = pad(&label, label_width);
        let body = controls.join(" ");
        if label.is_empty() && label_width == 0 {
            out.push_str(&format!("{indent}{body}\n"));
        } else {
            out.push_str(&format!(
                "{indent}{}  {body}\n",
                self.paint(&self.label, &padded)
            ));
        }
    }

    fn tabs(&self, tree: &FormTree, tabs: &Tabs, depth: usize, out: &mut String) {
        let indent = INDENT.repeat(depth);
        let strip: Vec<String> = tabs
            .pages()
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                if i == tabs.active() {
                    self.paint(&self.active_tab, &format!("[{name}]"))
                } else {
                    format!(" {name} ")
                }
            })
            .collect();
        out.push_str(&format!("{indent}{}\n", strip.join("|")));
        if let Some(page) = tabs.active_page() {
            self.layout(tree, page, depth + 1, out);
        }
    }

    fn widget(&self, widget: &Widget) -> String {
        match widget {
            Widget::Label(l) => self.paint(&self.text, &l.text),
            Widget::Text(field) => self.text_field(&field.borrow()),
            Widget::Path(picker) => format!("{} [...]", self.text_field(picker.borrow().field())),
            Widget::Slider(slider) => {
                let s = slider.borrow();
                format!(
                    "{} [{}..{}]",
                    self.paint(&self.text, &format!("{:>w$}", s.value(), w = s.label_width())),
                    s.min(),
                    s.max()
                )
            }
            Widget::Choice(combo) => {
                let c = combo.borrow();
                let current = c.current_text().unwrap_or("");
                format!("{} ▾", self.paint(&self.text, current))
            }
            Widget::Check(check) => {
                let c = check.borrow();
                let mark = if c.is_checked() { "[x]" } else { "[ ]" };
                format!("{mark} {}", self.paint(&self.label, &c.label))
            }
            Widget::Spin(spin) => format!("[{}] ⇅", spin.borrow().value()),
            Widget::List(list) => self.list(&list.borrow()),
            Widget::Multiple(rows) => self.multiple(&rows.borrow()),
            Widget::Custom(custom) => self.paint(&self.text, &custom.summary()),
        }
    }

    fn text_field(&self, field: &TextField) -> String {
        if field.is_empty() {
            self.paint(&self.placeholder, &format!("<{}>", field.placeholder()))
        } else {
            self.paint(&self.text, &field.display())
        }
    }

    fn list(&self, list: &ListView) -> String {
        let cells: Vec<String> = list
            .rows()
            .values()
            .map(|cell| {
                if cell.is_blank() {
                    self.paint(&self.placeholder, &format!("<{}>", cell.display()))
                } else {
                    self.paint(&self.text, cell.text())
                }
            })
            .collect();
        let extend = if list.is_extensible() { " (+)" } else { "" };
        format!("[{}]{extend}", cells.join(", "))
    }

    fn multiple(&self, rows: &MultipleRows) -> String {
        let occurrences: Vec<String> = rows
            .rows()
            .values()
            .map(|occ| format!("{} [+] [-]", self.widget(occ.widget())))
            .collect();
        occurrences.join("; ")
    }
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

fn label_column_width(items: &[GridItem]) -> usize {
    items
        .iter()
        .filter(|item| item.col == 0)
        .filter_map(|item| match &item.item {
            LayoutItem::Widget(Widget::Label(l)) => Some(l.text.width()),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}
