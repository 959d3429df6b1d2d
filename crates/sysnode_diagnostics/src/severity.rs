//! How serious a diagnostic is, and what that means for a test instance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::code::Category;

/// The severity level of a diagnostic message.
///
/// Declaration order is significance order, so `Note < Warning < Error` and
/// output can be filtered with [`Severity::at_least`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Run metadata, e.g. the seed of an instance.
    Note,
    /// Reported, but never changes the outcome of an instance.
    Warning,
    /// The instance failed.
    Error,
}

impl Severity {
    /// The severity a diagnostic code of `category` is raised with.
    pub fn of(category: Category) -> Self {
        match category {
            Category::Error => Severity::Error,
            Category::Warning => Severity::Warning,
            Category::Note => Severity::Note,
        }
    }

    /// Returns `true` if this severity passes a `minimum` output filter.
    pub fn at_least(self, minimum: Severity) -> bool {
        self >= minimum
    }

    /// Bold ANSI color used for the header of a terminal diagnostic.
    pub(crate) fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Note => "\x1b[1;36m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}
