//! Title Screen Flow
//!
//! This example drives a small game front-end from a fixed-rate loop.
//!
//! Key concepts:
//! - Enter/exit sequences that span several ticks (fades)
//! - Handlers requesting transitions through the host context
//! - Requests during a transition are rejected, not queued
//! - Commit notifications and transition history
//!
//! Run with: RUST_LOG=debug cargo run --example title_flow

use std::cell::RefCell;
use std::rc::Rc;
use tickstate::core::{Sequence, StateHandler, StateId, Step, TransitionRecord};
use tickstate::engine::{FnHost, StateMachine};
use tickstate::state_ids;

/// Shared mailbox handlers post transition requests to.
type Mailbox = Rc<RefCell<Vec<Screen>>>;

/// Fades in, waits for the player, then asks for the menu.
#[derive(Default)]
struct Title {
    mailbox: Mailbox,
}

impl StateHandler<Mailbox> for Title {
    fn setup(&mut self, context: &Mailbox) {
        self.mailbox = Rc::clone(context);
    }

    fn enter(&mut self) -> Sequence {
        let mailbox = Rc::clone(&self.mailbox);
        println!("  [title] fading in");
        Sequence::ticks(3).then(Sequence::action(move || {
            println!("  [title] press start!");
            mailbox.borrow_mut().push(Screen::Menu);
        }))
    }

    fn exit(&mut self) -> Sequence {
        println!("  [title] fading out");
        Sequence::ticks(2)
    }
}

/// Lets the player pick "play" after a short pause.
#[derive(Default)]
struct Menu {
    mailbox: Mailbox,
}

impl StateHandler<Mailbox> for Menu {
    fn setup(&mut self, context: &Mailbox) {
        self.mailbox = Rc::clone(context);
    }

    fn enter(&mut self) -> Sequence {
        let mailbox = Rc::clone(&self.mailbox);
        let mut remaining = 4;
        Sequence::from_fn(move || {
            if remaining == 0 {
                println!("  [menu] play selected");
                mailbox.borrow_mut().push(Screen::Playing);
                return Step::Complete;
            }
            remaining -= 1;
            Step::Suspended
        })
    }
}

#[derive(Default)]
struct Playing {
    frames: u32,
}

impl Playing {
    fn update(&mut self) {
        self.frames += 1;
    }
}

impl StateHandler<Mailbox> for Playing {
    fn enter(&mut self) -> Sequence {
        println!("  [playing] loading level");
        Sequence::ticks(1)
    }
}

state_ids! {
    enum Screen {
        Title => Title,
        Menu => Menu,
        Playing => Playing,
    }
    context: Mailbox
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Title Screen Flow ===\n");

    let host = FnHost::new(
        Mailbox::default(),
        |_: &Mailbox, record: &TransitionRecord<Screen>| {
            let from = record.from.as_ref().map_or("(none)", StateId::name);
            println!(
                "  -> committed {from} => {} after {} ticks",
                record.to.name(),
                record.ticks
            );
        },
    );
    let mut machine = StateMachine::new(host);
    machine
        .initialize(Screen::ALL.iter().copied())
        .expect("screens register once");

    machine
        .host()
        .context()
        .borrow_mut()
        .push(Screen::Title);

    for tick in 1..=20 {
        let requests: Vec<Screen> = machine.host().context().borrow_mut().drain(..).collect();
        for request in requests {
            match machine.change_state(request) {
                Ok(()) => println!("tick {tick:>2}: requested {}", request.name()),
                Err(error) => println!("tick {tick:>2}: {error}"),
            }
        }

        // Impatient player mashing buttons during the title fade-out.
        if machine.pending_id() == Some(Screen::Menu) {
            if let Err(error) = machine.change_state(Screen::Playing) {
                println!("tick {tick:>2}: {error}");
            }
        }

        let phase = machine.advance();
        println!("tick {tick:>2}: {phase}");

        machine.dispatch_as(|playing: &mut Playing| playing.update());
    }

    let frames = machine
        .active_as::<Playing>()
        .map_or(0, |playing| playing.frames);
    println!("\nPlayed {frames} frames");

    let path: Vec<&str> = machine
        .history()
        .get_path()
        .into_iter()
        .map(|screen| screen.name())
        .collect();
    println!("Path: {}", path.join(" -> "));

    match machine.snapshot().to_json() {
        Ok(json) => println!("\nSnapshot:\n{json}"),
        Err(error) => println!("\nSnapshot failed: {error}"),
    }

    println!("\n=== Example Complete ===");
}
