//! Public-surface integration tests for the session handle.
//!
//! These run headless: until `run()` owns a terminal, every mutator updates
//! state without writing a byte, so the full API is exercisable from tests
//! and from host threads before the UI is up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use termloom::{Command, Menu, Role, Tui, TuiConfig};

fn session() -> Tui {
    let mut config = TuiConfig::new();
    config.commands = vec![Command::new("noop", "Do nothing", |_, _| {})];
    Tui::new(config)
}

#[test]
fn test_streaming_matches_direct_append() {
    let tui = session();
    tui.start_streaming();
    tui.stream_chunk("a");
    tui.stream_chunk("b");
    assert!(tui.is_streaming());
    tui.stream_complete();
    assert!(!tui.is_streaming());
    assert_eq!(tui.message_count(), 1);

    tui.add_message(Role::Assistant, "ab");
    assert_eq!(tui.message_count(), 2);
}

#[test]
fn test_clear_messages_resets_log() {
    let tui = session();
    tui.add_message(Role::User, "one");
    tui.add_message_as(Role::System, "custom", "two");
    assert_eq!(tui.message_count(), 2);
    tui.clear_messages();
    assert_eq!(tui.message_count(), 0);
}

#[test]
fn test_theme_registry_surface() {
    let tui = session();
    assert!(tui.theme_names().contains(&"amber".to_string()));
    assert!(!tui.set_theme("custom"));
    tui.register_theme("custom", termloom::theme::MONO_THEME);
    assert!(tui.set_theme("custom"));
}

#[test]
fn test_shutdown_flag_is_shared_with_config() {
    let flag = Arc::new(AtomicBool::new(false));
    let mut config = TuiConfig::new();
    config.shutdown = Some(Arc::clone(&flag));
    let tui = Tui::new(config);
    tui.shutdown_flag().store(true, Ordering::SeqCst);
    assert!(flag.load(Ordering::SeqCst));
}

#[test]
fn test_menu_open_close() {
    let tui = session();
    tui.open_menu(Menu::new("Root").leaf("item", Arc::new(|_: &Tui, _: &str| {})));
    tui.close_menu();
}

#[test]
fn test_status_and_progress_mutators() {
    let tui = session();
    tui.set_status("left", "right");
    tui.set_top_status("ready");
    tui.set_progress("sync", 250); // clamped internally
    tui.clear_progress();
}

#[test]
fn test_concurrent_mutators_do_not_corrupt_state() {
    let tui = session();
    let mut handles = Vec::new();

    for t in 0..4 {
        let tui = tui.clone();
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                tui.add_message(Role::System, &format!("thread {t} message {i}"));
            }
        }));
    }

    {
        let tui = tui.clone();
        handles.push(thread::spawn(move || {
            for pct in 0..100 {
                tui.set_progress("load", pct);
            }
            tui.clear_progress();
        }));
    }

    {
        let tui = tui.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..20 {
                tui.start_spinner("busy");
                tui.stop_spinner();
            }
        }));
    }

    {
        let tui = tui.clone();
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                tui.start_streaming();
                tui.stream_chunk(&format!("chunk {i}"));
                tui.stream_complete();
            }
        }));
    }

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
    tui.stop_spinner();

    // 4 threads x 50 messages + 50 completed streams.
    assert_eq!(tui.message_count(), 250);
    assert!(!tui.is_streaming());
}
