//! Small engine-wide utilities

mod observable;

pub use observable::{Observable, ObserverKey};
