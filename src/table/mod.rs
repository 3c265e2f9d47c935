//! The table: zone transitions, gestures, dialogs and key bindings

pub mod config;
pub mod details;
pub mod drag;
pub mod layout;
pub mod logger;
pub mod search;
pub mod session;
pub mod setup;
pub mod shortcuts;
pub mod state;
pub mod transitions;

pub use config::TableConfig;
pub use details::{GameDetails, ManaColor};
pub use drag::{DragCoordinator, DragState, DropResult};
pub use layout::{HitTest, ZoneLayout};
pub use logger::{OutputFormat, OutputMode, TableLogger, VerbosityLevel};
pub use search::{SearchClose, SearchOption, SearchPreview, SearchSession};
pub use session::{Key, Modal, Session};
pub use setup::HandSetup;
pub use shortcuts::{Dispatch, Shortcut};
pub use state::TableState;
pub use transitions::TransferOutcome;
