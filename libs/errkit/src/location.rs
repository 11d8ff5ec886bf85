//! Caller-supplied source locations.
//!
//! A [`CallSite`] is an explicit location descriptor handed to the builder
//! instead of being discovered by walking the call stack. [`CallSite::capture`]
//! records the file and line of its caller at compile time through
//! `#[track_caller]`; the [`callsite!`](crate::callsite) macro additionally
//! records the caller's module path as the qualified-name component.

/// Source location of the point where an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    module: &'static str,
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Build a call site from parts. Usually invoked through the
    /// [`callsite!`](crate::callsite) macro rather than directly.
    #[must_use]
    pub const fn new(module: &'static str, file: &'static str, line: u32) -> Self {
        Self { module, file, line }
    }

    /// Record the file and line of the caller.
    ///
    /// The module path is not recoverable here and stays empty; downstream
    /// consumers tolerate the blank component.
    #[track_caller]
    #[must_use]
    pub fn capture() -> Self {
        let caller = std::panic::Location::caller();
        Self {
            module: "",
            file: caller.file(),
            line: caller.line(),
        }
    }

    #[must_use]
    pub const fn module(&self) -> &'static str {
        self.module
    }

    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

/// Capture the current call site, including the module path.
///
/// ```
/// let site = errkit::callsite!();
/// assert!(site.line() > 0);
/// ```
#[macro_export]
macro_rules! callsite {
    () => {
        $crate::CallSite::new(::core::module_path!(), ::core::file!(), ::core::line!())
    };
}
