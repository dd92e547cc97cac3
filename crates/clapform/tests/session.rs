//! Driving a form built from a clap application, the way a UI loop would.

use std::sync::Arc;

use clap::{Arg, ArgAction, Command};
use clapform::{
    with_gui_flag, BadParameter, ButtonAction, ClapImporter, Form, FormOptions, MockClipboard,
    NoticeLevel, Pressed, RunOutcome,
};

fn app() -> Command {
    with_gui_flag(
        Command::new("tool")
            .about("Project helper")
            .subcommand(
                Command::new("build")
                    .about("Compile a target")
                    .arg(Arg::new("fast").long("fast").action(ArgAction::SetTrue))
                    .arg(
                        Arg::new("jobs")
                            .short('j')
                            .value_parser(clap::value_parser!(u8))
                            .default_value("1"),
                    )
                    .arg(Arg::new("target").required(true)),
            )
            .subcommand(Command::new("where")),
    )
}

fn form_with(importer: ClapImporter, options: FormOptions) -> (Form, Arc<MockClipboard>) {
    let clip = Arc::new(MockClipboard::new());
    let form = Form::for_clap(app())
        .importer(importer)
        .options(options)
        .clipboard(clip.clone())
        .handler(|matches, out| match matches.subcommand() {
            Some(("build", sub)) => {
                let jobs = *sub.get_one::<u8>("jobs").unwrap();
                if jobs == 0 {
                    return Err(BadParameter::new("jobs must be positive").into());
                }
                let target = sub.get_one::<String>("target").unwrap();
                let fast = if sub.get_flag("fast") { " (fast)" } else { "" };
                out.line(&format!("building {target} with {jobs} jobs{fast}"));
                Ok(())
            }
            Some(("where", _)) => {
                out.line(std::thread::current().name().unwrap_or("unnamed"));
                Ok(())
            }
            _ => Err(BadParameter::new("pick a subcommand").into()),
        })
        .build()
        .unwrap();
    (form, clip)
}

fn form() -> (Form, Arc<MockClipboard>) {
    form_with(ClapImporter::new(), FormOptions::default())
}

#[test]
fn gui_flag_is_not_part_of_the_form() {
    let (form, _) = form();
    let root = form.tree().layout(form.tree().root()).unwrap();
    assert!(root.params().iter().all(|p| p.name != "gui"));
    assert_eq!(form.title(), "tool");
}

#[test]
fn edited_controls_reach_the_handler() {
    let (mut form, _) = form();
    let build = form.tree().find(&["build"]).unwrap();
    {
        let tree = form.tree();
        let fast = tree.widgets_for(build, "fast").unwrap();
        fast[0].as_check().unwrap().borrow_mut().set_checked(true);
        let jobs = tree.widgets_for(build, "jobs").unwrap();
        assert!(jobs[1].as_text().unwrap().borrow_mut().set_text("4"));
        let target = tree.widgets_for(build, "target").unwrap();
        assert!(target[1].as_text().unwrap().borrow_mut().set_text("lib"));
    }

    assert_eq!(
        form.argv(build).unwrap(),
        ["tool", "build", "--fast", "-j", "4", "lib"]
    );
    form.run(build).unwrap();
    assert_eq!(form.output(), "building lib with 4 jobs (fast)\n");
    assert!(form.notices().is_empty());
}

#[test]
fn missing_required_value_becomes_a_warning() {
    let (mut form, _) = form();
    let build = form.tree().find(&["build"]).unwrap();
    let run = form.run(build).unwrap();

    let report = form.wait(run).unwrap();
    assert!(matches!(report.outcome, RunOutcome::Rejected(_)));
    let notices = form.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].text.contains("target"));

    // The form keeps working after a rejected run.
    let target = form.tree().widgets_for(build, "target").unwrap();
    target[1].as_text().unwrap().borrow_mut().set_text("bin");
    let run = form.run(build).unwrap();
    assert_eq!(form.wait(run).unwrap().outcome, RunOutcome::Succeeded);
    assert_eq!(form.output(), "building bin with 1 jobs\n");
}

#[test]
fn handler_rejection_is_reported() {
    let (mut form, _) = form();
    let build = form.tree().find(&["build"]).unwrap();
    {
        let tree = form.tree();
        tree.widgets_for(build, "jobs").unwrap()[1]
            .as_text()
            .unwrap()
            .borrow_mut()
            .set_text("0");
        tree.widgets_for(build, "target").unwrap()[1]
            .as_text()
            .unwrap()
            .borrow_mut()
            .set_text("lib");
    }
    form.run(build).unwrap();
    assert_eq!(form.notices()[0].text, "jobs must be positive");
}

#[test]
fn background_runs_report_through_wait() {
    let (mut form, _) = form_with(ClapImporter::new(), FormOptions::default().background());
    let here = form.tree().find(&["where"]).unwrap();
    let run = form.run(here).unwrap();
    let report = form.wait(run).unwrap();
    assert!(report.succeeded());
    assert_eq!(report.command_line, "tool where");
    assert!(form.output().starts_with("clapform-run-"));
}

#[test]
fn command_override_beats_session_option() {
    let (mut form, _) = form_with(
        ClapImporter::new().background("where", true),
        FormOptions::default(),
    );
    let here = form.tree().find(&["where"]).unwrap();
    let run = form.run(here).unwrap();
    form.wait(run).unwrap();
    assert_eq!(form.output(), format!("clapform-run-{}\n", run.get()));
}

#[test]
fn copy_button_puts_command_line_on_clipboard() {
    let (mut form, clip) = form();
    let build = form.tree().find(&["build"]).unwrap();
    form.tree().widgets_for(build, "target").unwrap()[1]
        .as_text()
        .unwrap()
        .borrow_mut()
        .set_text("my lib");

    let pressed = form.press(build, ButtonAction::Copy).unwrap();
    let Pressed::Copied(notice) = pressed else {
        panic!("expected a copy, got {pressed:?}");
    };
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(clip.last().as_deref(), Some("tool build -j 1 'my lib'"));
    assert_eq!(notice.text, "copy 'tool build -j 1 'my lib'' to clipboard");
}

#[test]
fn run_active_follows_tabs() {
    let (mut form, _) = form_with(ClapImporter::new(), FormOptions::default());
    let root = form.tree().root();
    assert!(form.tree_mut().select_tab_named(root, "where"));
    let run = form.run_active().unwrap();
    assert_eq!(form.wait(run).unwrap().command_line, "tool where");
}

#[test]
fn render_reflects_edits() {
    let (form, _) = form();
    let text = form.render(false);
    assert!(text.starts_with("Project helper\n"));
    assert!(text.contains("[build]| where "));
    assert!(text.contains("<text>"));

    let build = form.tree().find(&["build"]).unwrap();
    form.tree().widgets_for(build, "target").unwrap()[1]
        .as_text()
        .unwrap()
        .borrow_mut()
        .set_text("lib");
    let text = form.render(false);
    assert!(text.contains("target  lib"));
    assert!(text.contains("[Run] [Copy]"));
}
