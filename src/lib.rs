//! `devutils` is a library of developer text utilities (Base64 and URL
//! codecs, JSON formatting, CSV conversion, counters and generators) built on
//! a single transform engine.
//!
//! Every tool is a named operation run through [`engine::Engine`], which
//! returns an [`outcome::Outcome`]: either the transformed text plus display
//! statistics, or a typed failure. Operations never panic into the caller.
//!
//! Per-tool UI state (input, last result, the "copied" indicator) lives in
//! [`session::ToolSession`], and [`catalog`] describes the tool pages for the
//! presentation shell.
//!
//! "Hello world" example:
//! ```
//! use devutils::prelude::*;
//!
//! let engine = Engine::new();
//! let outcome = engine.run("base64-encode", "Hello world!", &Options::new());
//! assert_eq!(outcome.output(), Some("SGVsbG8gd29ybGQh"));
//!
//! let stats = outcome.stats().unwrap();
//! assert_eq!((stats.characters, stats.words), (12, 2));
//! ```

pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod log;
pub mod options;
pub mod outcome;
pub mod session;
pub mod stats;
pub mod transforms;

/// The devutils prelude
///
/// This module re-exports the most commonly used items from devutils.
/// You can use it with `use devutils::prelude::*;` to bring all common items into scope.
pub mod prelude {
    // Re-export commonly used traits
    pub use crate::clipboard::Clipboard;
    pub use crate::transforms::Transform;

    // Re-export commonly used types
    pub use crate::config::EngineConfig;
    pub use crate::engine::Engine;
    pub use crate::error::Result;
    pub use crate::options::Options;
    pub use crate::outcome::{ErrorKind, Failure, Outcome};
    pub use crate::session::{ToolSession, ToolState};
    pub use crate::stats::{Metric, Stats};

    // Re-export commonly used functions
    pub use crate::engine::run;
}
