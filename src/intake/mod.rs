//! Guided entry intake
//!
//! A dialogue that collects amount, type, narration, payee, date,
//! counterparty and account one answer at a time, then renders a new ledger
//! entry for confirmation.

pub mod entry_builder;
pub mod session;
pub mod state;

pub use entry_builder::{EntryAmount, EntryType, NewEntry};
pub use session::{IntakeSession, SessionStore};
pub use state::{Input, InputError, IntakeContext, IntakeFault, IntakeState, Prompt, Transition};
