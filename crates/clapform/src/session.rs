//! Form sessions.
//!
//! A [`Form`] owns everything one open form needs: the layout tree built
//! from the command description, the style, the executor that runs
//! submissions, the clipboard for the copy action, and the output panel
//! and notices fed by finished runs.
//!
//! The form itself stays on the thread that created it (its controls are
//! `Rc<RefCell<_>>` handles). Background runs report back over a channel
//! that [`Form::poll`] drains; a UI loop calls it once per frame, a
//! headless driver calls [`Form::wait`].

use std::fmt;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use clap::{ArgMatches, Command};
use clapform_dispatch::{
    ClapRunner, Clipboard, Executor, Notice, OutputSink, RunId, RunReport, Runner,
    SystemClipboard, UiEvent,
};
use clapform_widgets::{
    command_line, ButtonAction, ClapImporter, CommandLayout, CommandSpec, FormStyle, FormTree,
    LayoutId,
};

use crate::error::FormError;
use crate::gui_flag::GUI_FLAG;
use crate::options::FormOptions;
use crate::render;

/// What a button press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pressed {
    Ran(RunId),
    Copied(Notice),
}

enum Source {
    Clap(Box<Command>),
    Spec(CommandSpec),
}

/// Builder for a [`Form`].
pub struct FormBuilder {
    source: Source,
    importer: ClapImporter,
    runner: Option<Arc<dyn Runner>>,
    options: FormOptions,
    style: Option<FormStyle>,
    clipboard: Option<Arc<dyn Clipboard>>,
}

impl FormBuilder {
    fn new(source: Source) -> Self {
        Self {
            source,
            importer: ClapImporter::new().skip(GUI_FLAG),
            runner: None,
            options: FormOptions::default(),
            style: None,
            clipboard: None,
        }
    }

    /// Replaces the importer used for clap commands.
    ///
    /// The `--gui` flag is skipped whatever the importer says.
    pub fn importer(mut self, importer: ClapImporter) -> Self {
        self.importer = importer.skip(GUI_FLAG);
        self
    }

    pub fn runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Some(Arc::new(runner));
        self
    }

    /// Runs submissions through the clap command the form was built from,
    /// handing the matches to `handler`.
    ///
    /// For forms built from a [`CommandSpec`] this has no command to
    /// re-parse with and leaves the runner unset.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ArgMatches, &dyn OutputSink) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        if let Source::Clap(cmd) = &self.source {
            self.runner = Some(Arc::new(ClapRunner::new((**cmd).clone(), handler)));
        } else {
            tracing::warn!("handler ignored: form was not built from a clap command");
        }
        self
    }

    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses `style` instead of the preset named in the options.
    pub fn style(mut self, style: FormStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn build(self) -> Result<Form, FormError> {
        let spec = match self.source {
            Source::Clap(cmd) => self.importer.import(&cmd)?,
            Source::Spec(spec) => spec,
        };
        let runner = self.runner.ok_or_else(|| FormError::NoRunner(spec.name.clone()))?;
        let style = self.style.unwrap_or_else(|| self.options.form_style());
        let tree = FormTree::build(&spec, &style);
        let (executor, events) = Executor::new(runner);
        let executor = executor.with_output(self.options.output_target());
        let clipboard = self
            .clipboard
            .unwrap_or_else(|| Arc::new(SystemClipboard::new()));

        tracing::debug!(form = %spec.name, style = %style.name, "form ready");
        Ok(Form {
            title: spec.name,
            tree,
            style,
            options: self.options,
            executor,
            events,
            clipboard,
            output: String::new(),
            notices: Vec::new(),
            finished: Vec::new(),
        })
    }
}

/// One open form.
pub struct Form {
    title: String,
    tree: FormTree,
    style: FormStyle,
    options: FormOptions,
    executor: Executor,
    events: Receiver<UiEvent>,
    clipboard: Arc<dyn Clipboard>,
    output: String,
    notices: Vec<Notice>,
    finished: Vec<RunReport>,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("title", &self.title)
            .field("style", &self.style.name)
            .field("options", &self.options)
            .field("notices", &self.notices)
            .finish_non_exhaustive()
    }
}

impl Form {
    /// Starts a form for a clap command.
    ///
    /// ```rust
    /// use clap::{Arg, Command};
    /// use clapform::Form;
    ///
    /// let cmd = Command::new("greet").arg(Arg::new("name").long("name").default_value("world"));
    /// let mut form = Form::for_clap(cmd)
    ///     .handler(|m, out| {
    ///         out.line(&format!("Hello, {}!", m.get_one::<String>("name").unwrap()));
    ///         Ok(())
    ///     })
    ///     .build()
    ///     .unwrap();
    ///
    /// let root = form.tree().root();
    /// form.run(root).unwrap();
    /// assert_eq!(form.output(), "Hello, world!\n");
    /// ```
    pub fn for_clap(cmd: Command) -> FormBuilder {
        FormBuilder::new(Source::Clap(Box::new(cmd)))
    }

    /// Starts a form for a hand-written command description.
    pub fn for_spec(spec: CommandSpec) -> FormBuilder {
        FormBuilder::new(Source::Spec(spec))
    }

    /// Root command name, used as the window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FormTree {
        &mut self.tree
    }

    pub fn style(&self) -> &FormStyle {
        &self.style
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    fn layout(&self, id: LayoutId) -> Result<&CommandLayout, FormError> {
        self.tree.layout(id).ok_or(FormError::UnknownLayout(id))
    }

    /// The argument vector the command at `id` would run with right now.
    pub fn argv(&self, id: LayoutId) -> Result<Vec<String>, FormError> {
        self.layout(id)?;
        Ok(self.tree.argv(id))
    }

    /// The shell-quoted command line for `id`.
    pub fn command_line(&self, id: LayoutId) -> Result<String, FormError> {
        Ok(command_line(&self.argv(id)?))
    }

    /// Submits the command at `id`.
    ///
    /// The command's own execution override wins over the session's
    /// `execution` option. Inline runs have finished, and their output is
    /// in the panel, by the time this returns.
    pub fn run(&mut self, id: LayoutId) -> Result<RunId, FormError> {
        let layout = self.layout(id)?;
        if layout.is_dispatcher() {
            return Err(FormError::NotALeaf(layout.name().to_string()));
        }
        let mode = self.options.exec_mode(layout.background());
        let argv = self.tree.argv(id);
        let run = self.executor.launch(argv, mode);
        self.poll();
        Ok(run)
    }

    /// Submits the leaf reached by following the active tabs.
    pub fn run_active(&mut self) -> Result<RunId, FormError> {
        let leaf = self.tree.active_leaf();
        self.run(leaf)
    }

    /// Copies the command line for `id` to the clipboard.
    pub fn copy(&mut self, id: LayoutId) -> Result<Notice, FormError> {
        let line = self.command_line(id)?;
        if let Err(err) = self.clipboard.copy(&line) {
            tracing::warn!(error = %err, "copy to clipboard failed");
            return Err(err.into());
        }
        let notice = Notice::info(format!("copy '{line}' to clipboard"));
        self.notices.push(notice.clone());
        Ok(notice)
    }

    /// Handles a press of one of the command buttons of `id`.
    pub fn press(&mut self, id: LayoutId, action: ButtonAction) -> Result<Pressed, FormError> {
        match action {
            ButtonAction::Run => self.run(id).map(Pressed::Ran),
            ButtonAction::Copy => self.copy(id).map(Pressed::Copied),
        }
    }

    /// Applies pending run events; returns the runs that finished.
    ///
    /// Output chunks are appended to the output panel. Rejected and
    /// failed runs add a warning notice.
    pub fn poll(&mut self) -> Vec<RunReport> {
        let events: Vec<UiEvent> = self.events.try_iter().collect();
        events
            .into_iter()
            .filter_map(|event| self.apply(event))
            .collect()
    }

    /// Blocks until `run` has finished and returns its report.
    ///
    /// Returns `None` at once for an id this form never launched. Every
    /// launched run posts a report, panics and spawn failures included.
    pub fn wait(&mut self, run: RunId) -> Option<RunReport> {
        if !self.executor.issued(run) {
            tracing::debug!(%run, "wait on a run this form did not launch");
            return None;
        }
        if let Some(report) = self.finished.iter().find(|r| r.run == run) {
            return Some(report.clone());
        }
        while let Ok(event) = self.events.recv() {
            if let Some(report) = self.apply(event) {
                if report.run == run {
                    return Some(report);
                }
            }
        }
        None
    }

    fn apply(&mut self, event: UiEvent) -> Option<RunReport> {
        match event {
            UiEvent::Output { text, .. } => {
                self.output.push_str(&text);
                None
            }
            UiEvent::Finished(report) => {
                if let Some(notice) = report.notice() {
                    self.notices.push(notice);
                }
                self.finished.push(report.clone());
                Some(report)
            }
        }
    }

    /// Everything written to the output panel so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Empties the output panel.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Removes and returns pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Reports of every run that has finished, in completion order.
    pub fn finished(&self) -> &[RunReport] {
        &self.finished
    }

    /// Text picture of the form, following the active tabs.
    pub fn render(&self, styled: bool) -> String {
        render::render(&self.tree, &self.style, styled)
    }
}
