//! Authentication Flow
//!
//! This example drives a small app's views from two pieces of session data.
//!
//! Key concepts:
//! - Groups whose condition gates every nested view
//! - Automatic triggers reacting to external data
//! - Explicit action transitions requested by the user
//! - Change notifications delivered to a subscriber
//!
//! Run with: cargo run --example auth_flow

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use waystate::builder::{action, trigger, StateManagerBuilder};
use waystate::core::State;
use waystate::engine::{ChangeCause, StateManager};

// Session data owned by the host application
#[derive(Clone, Default)]
struct Session {
    signed_in: Arc<AtomicBool>,
    is_admin: Arc<AtomicBool>,
}

impl Session {
    fn signed_in(&self) -> impl Fn() -> bool + Clone + Send + Sync + 'static {
        let flag = Arc::clone(&self.signed_in);
        move || flag.load(Ordering::SeqCst)
    }

    fn is_admin(&self) -> impl Fn() -> bool + Clone + Send + Sync + 'static {
        let flag = Arc::clone(&self.is_admin);
        move || flag.load(Ordering::SeqCst)
    }
}

fn build(session: &Session) -> StateManager {
    StateManagerBuilder::new()
        .state(State::start("login"))
        .state(
            State::group(
                "logged_in",
                vec![
                    State::plain("dashboard"),
                    State::group("admin_area", vec![State::plain("settings")])
                        .when(session.is_admin(), "dashboard"),
                ],
            )
            .when(session.signed_in(), "login"),
        )
        .transition(trigger("sign_in", "login", "dashboard", session.signed_in()))
        .transition(action("open_settings", "dashboard", "settings"))
        .transition(action("close_settings", "admin_area", "dashboard"))
        .build()
        .unwrap()
}

fn show(manager: &StateManager) {
    let view = manager.current_id().map(|id| id.as_str()).unwrap_or("-");
    println!("  Current view: {view}\n");
}

fn main() {
    println!("=== Authentication Flow Example ===\n");

    let session = Session::default();
    let mut manager = build(&session);

    manager.subscribe(|change| {
        let from = change.from.as_ref().map(|id| id.as_str()).unwrap_or("(none)");
        let why = match &change.cause {
            ChangeCause::Initialized => "initialized".to_string(),
            ChangeCause::Triggered => "data changed".to_string(),
            ChangeCause::Requested { target } => format!("requested {target}"),
        };
        println!("  [event] {from} -> {} ({why})", change.to);
    });

    println!("Step 1: Initialize");
    manager.initialize().unwrap();
    show(&manager);

    println!("Step 2: Open settings while signed out");
    let moved = manager.attempt_transition("settings").unwrap();
    println!("  Moved: {moved}");
    show(&manager);

    println!("Step 3: Sign in as an admin");
    session.signed_in.store(true, Ordering::SeqCst);
    session.is_admin.store(true, Ordering::SeqCst);
    manager.reevaluate().unwrap();
    show(&manager);

    println!("Step 4: Open settings");
    manager.attempt_transition("settings").unwrap();
    show(&manager);

    println!("Step 5: Admin rights revoked");
    session.is_admin.store(false, Ordering::SeqCst);
    manager.reevaluate().unwrap();
    show(&manager);

    println!("Step 6: Sign out");
    session.signed_in.store(false, Ordering::SeqCst);
    manager.reevaluate().unwrap();
    show(&manager);

    println!("Graph description:");
    match manager.graph() {
        Ok(graph) => match graph.describe().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => println!("  Could not serialize graph: {e}"),
        },
        Err(e) => println!("  Graph unavailable: {e}"),
    }

    println!("\n=== Example Complete ===");
}
