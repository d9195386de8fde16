pub mod controller;
pub mod state;

pub use controller::{SessionController, SubmitOutcome};
pub use state::{DatasetRef, DatasetSource, SessionState, SessionStatus};
