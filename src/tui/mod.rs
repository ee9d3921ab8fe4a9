//! TUI integration layer (crossterm + ratatui).
//!
//! Kept apart from `kernel`/`models` so the core never touches terminal state.

pub mod terminal_guard;

pub use terminal_guard::{TerminalGuard, TerminalRestorer, TerminationSignal};
