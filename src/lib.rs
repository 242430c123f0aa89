//! Runs the Nu Html Checker (`vnu`) on HTML documents and reports its
//! findings as editor diagnostics.
//!
//! The pipeline is: [`resolver`] locates the checker, [`runner`] invokes it
//! for one file, [`translate`] normalizes its JSON report, and [`session`]
//! applies the result to the editor through a [`host::Host`].

pub mod diagnostics;
pub mod exit_codes;
pub mod finding;
pub mod host;
pub mod lsp;
pub mod output;
pub mod platform;
pub mod resolver;
pub mod runner;
pub mod session;
pub mod settings;
pub mod state;
pub mod translate;

pub use finding::{Finding, Severity, ValidationOutcome};
pub use host::{Document, Host};
pub use platform::PlatformFamily;
pub use resolver::{ExecutableLocation, ExecutableOrigin, ResolveError, Resolver};
pub use runner::{ValidationError, ValidationRequest, ValidationRunner};
pub use session::{Session, SessionEnvironment, SkipReason, ValidationStatus};
pub use translate::translate;
