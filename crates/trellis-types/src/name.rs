//! Name newtypes for runtimes and modules.
//!
//! Trellis identifies runtimes and modules by caller-chosen names. The
//! newtypes exist so a module name can never be passed where a runtime name
//! is expected; they carry no generated identity beyond the string itself.
//!
//! Construction is infallible. The places that require a non-empty name
//! (directory creation, registry lookups) validate with [`is_empty`]
//! at their own boundary and fail with their own error kind.
//!
//! [`is_empty`]: RuntimeName::is_empty

use serde::{Deserialize, Serialize};

macro_rules! name_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a name from any string-like value.
            #[must_use]
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// Returns the name as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the name is empty.
            ///
            /// Empty names are representable but rejected wherever a name
            /// is actually required.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(name.to_string())
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

name_type! {
    /// Identity of a runtime container.
    ///
    /// Unique within a [`RuntimeDirectory`]; two containers with the same
    /// name cannot coexist in one directory.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis_types::RuntimeName;
    ///
    /// let name = RuntimeName::new("app");
    /// assert_eq!(name.as_str(), "app");
    /// assert!(!name.is_empty());
    /// ```
    ///
    /// [`RuntimeDirectory`]: https://docs.rs/trellis-runtime
    RuntimeName
}

name_type! {
    /// Identity of a module within one runtime container.
    ///
    /// Doubles as the event namespace: every bus event a module raises or
    /// listens for is scoped under its module name.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis_types::ModuleName;
    ///
    /// let name = ModuleName::from("counter");
    /// assert_eq!(name.to_string(), "counter");
    /// ```
    ModuleName
}
