//! # Events Module
//!
//! Event-driven progress reporting for any front end.
//!
//! ## Design
//! The engine emits events through a channel; the collaborator (CLI, GUI)
//! drains the receiver on its own thread and may coalesce rapid progress
//! updates for display. Events are delivered in emission order and never dropped
//! while the receiver is alive.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Fingerprint(FingerprintEvent::Progress(p)) => println!("{:.0}%", p.fraction * 100.0),
//!             Event::Error(e) => eprintln!("{}: {}", e.kind, e.message),
//!             _ => {}
//!         }
//!     }
//! });
//!
//! engine.run_with_events(&request, &sender, &CancellationToken::new())?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
