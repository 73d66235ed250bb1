pub mod animation;
pub mod board;
pub mod canvas;
pub mod commands;
pub mod config;
pub mod dictionary;
pub mod events;
pub mod gestures;
pub mod host;
pub mod item;
pub mod order;
pub mod schedule;
pub mod shortcuts;
pub mod sidebar;
pub mod toolbar;

pub use board::Board;
pub use commands::BoardCommand;
pub use config::{BoardConfig, ContentOption};
pub use dictionary::Dictionary;
pub use events::{BoardEvent, DialogTarget, Sequence};
pub use host::{ClipboardPayload, ConfirmationRequest, FormChild, Host, SubForm};
pub use sidebar::{ListInput, MenuAction};
