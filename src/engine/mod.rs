//! Waiting and alarm machinery.
//!
//! - `timer`: fixed and indefinite waits that race a cancellation token
//! - `alarm`: repeating alarm over a sound player
//! - `interrupt`: Ctrl-C listener handing out cancellation tokens

pub mod alarm;
pub mod interrupt;
pub mod timer;

pub use alarm::{Alarm, Repeat};
pub use interrupt::Interrupts;
pub use timer::{Timer, TimerPhase, WaitOutcome};
