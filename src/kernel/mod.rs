//! Headless application core (state/action/effect).

pub mod action;
pub mod editor;
pub mod effect;
pub mod explorer;
pub mod language;
pub mod script;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use editor::{Document, DocumentId};
pub use effect::Effect;
pub use explorer::{BuildRequest, ExplorerError, ProjectExplorer, ProjectOpened};
pub use language::LanguageId;
pub use script::{MacroCompiler, ScriptApi, ScriptCompiler, ScriptError, ScriptHost};
pub use state::{
    AppState, ConfirmDialogState, FocusTarget, InputDialogKind, InputDialogState, PendingAction,
    SavePromptState, UiState,
};
pub use store::{DispatchResult, Store};
