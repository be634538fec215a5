#![forbid(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod gate;
pub mod model;
pub mod navigator;
pub mod session;

pub use dispatch::{Alert, Effect, EntryOutcome, Event, Transition};
pub use error::{Failure, Request};
pub use gate::{Access, Gate, GateStep, Refusal};
pub use navigator::{NavInput, QuestionNavigator, SwipeDirection};
pub use session::{Screen, ViewerSession};
