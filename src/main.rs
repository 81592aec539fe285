//! termloom demo — a small echo assistant exercising the whole engine.
//!
//! Streams a canned reply back token by token for every submission, with a
//! spinner while "thinking", a sample nested menu on `/menu`, theme
//! switching, and an output-only log-viewer mode.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use termloom::{Command, Menu, Role, Tui, TuiConfig};

/// Demo chat shell for the termloom engine.
#[derive(Parser, Debug)]
#[command(name = "termloom-demo", version, about)]
struct Args {
    /// Theme to start with (default, amber, blue, mono).
    #[arg(long, default_value = "default")]
    theme: String,

    /// Output-only mode: no input box, just a scrolling log.
    #[arg(long)]
    log_viewer: bool,
}

fn demo_menu() -> Menu {
    let theme_menu = ["default", "amber", "blue", "mono"]
        .iter()
        .fold(Menu::new("Theme"), |menu, name| {
            let chosen = name.to_string();
            menu.leaf(
                name,
                Arc::new(move |tui: &Tui, _: &str| {
                    tui.set_theme(&chosen);
                    tui.add_message(Role::System, &format!("Theme set to {chosen}"));
                }),
            )
        });
    Menu::new("Options")
        .submenu("Theme", theme_menu)
        .prompt(
            "Status text",
            "New status",
            Arc::new(|tui: &Tui, input: &str| {
                tui.set_status(input, "");
            }),
        )
        .leaf(
            "Quit",
            Arc::new(|tui: &Tui, _: &str| {
                tui.exit();
            }),
        )
}

/// Stream a canned echo reply in a background thread.
fn reply(tui: &Tui, text: &str) {
    tui.add_message(Role::User, text);
    let tui = tui.clone();
    let text = text.to_string();
    thread::spawn(move || {
        tui.start_spinner("thinking");
        thread::sleep(Duration::from_millis(600));
        tui.stop_spinner();
        tui.start_streaming();
        for word in format!("You said: {text}").split_inclusive(' ') {
            tui.stream_chunk(word);
            thread::sleep(Duration::from_millis(60));
        }
        tui.stream_complete();
    });
}

fn commands() -> Vec<Command> {
    vec![
        Command::new("clear", "Clear the transcript", |tui, _| {
            tui.clear_messages();
        }),
        Command::with_args(
            "theme",
            "Switch the color theme",
            &["default", "amber", "blue", "mono"],
            |tui, args| {
                if tui.set_theme(args) {
                    tui.add_message(Role::System, &format!("Theme set to {args}"));
                } else {
                    tui.add_message(Role::System, &format!("No such theme: {args}"));
                }
            },
        ),
        Command::new("menu", "Open the options menu", |tui, _| {
            tui.open_menu(demo_menu());
        }),
        Command::new("progress", "Show a fake progress bar", |tui, _| {
            let tui = tui.clone();
            thread::spawn(move || {
                for pct in (0..=100).step_by(5) {
                    tui.set_progress("syncing", pct);
                    thread::sleep(Duration::from_millis(80));
                }
                tui.clear_progress();
            });
        }),
        Command::new("help", "List available commands", |tui, _| {
            tui.add_message(
                Role::System,
                "Commands: /clear /theme /menu /progress /help /exit\n\
                 Shift+Enter inserts a newline; Esc dismisses the palette.",
            );
        }),
        Command::new("exit", "Leave the session", |tui, _| {
            tui.exit();
        }),
    ]
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let shutdown = Arc::new(AtomicBool::new(false));
    let mut config = TuiConfig::new();
    config.theme = args.theme;
    config.commands = commands();
    config.status_left = "termloom demo".to_string();
    config.status_right = "/help for commands".to_string();
    config.show_char_count = true;
    config.input_enabled = !args.log_viewer;
    config.shutdown = Some(Arc::clone(&shutdown));
    config.on_submit = Some(Arc::new(|tui: &Tui, text: &str| {
        reply(tui, text);
    }));
    config.on_escape = Some(Arc::new(|tui: &Tui| {
        tui.open_menu(demo_menu());
    }));

    let tui = Tui::new(config);
    tui.add_message(
        Role::System,
        "Welcome to the termloom demo. Type a message, or /help.",
    );

    if args.log_viewer {
        // Feed the log from a background thread to show output-only mode.
        let feeder = tui.clone();
        thread::spawn(move || {
            for i in 1.. {
                feeder.add_message_as(Role::System, "tick", &format!("log line {i}"));
                thread::sleep(Duration::from_secs(1));
            }
        });
    }

    tui.run()
}
