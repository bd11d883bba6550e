//! View layer errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`UnknownElement`](ViewError::UnknownElement) | `VIEW_UNKNOWN_ELEMENT` | No |
//! | [`RootDetach`](ViewError::RootDetach) | `VIEW_ROOT_DETACH` | No |

use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_types::ErrorCode;

/// View layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ViewError {
    /// The element id does not belong to this tree (or was removed).
    ///
    /// Note the distinction from *detached*: a detached element still
    /// exists and stays usable; a removed one does not.
    ///
    /// **Not recoverable** - the id will not come back.
    #[error("element is not part of this tree")]
    UnknownElement,

    /// The document root cannot be detached or removed.
    ///
    /// **Not recoverable** - by construction.
    #[error("the document root cannot be detached")]
    RootDetach,
}

impl ErrorCode for ViewError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownElement => "VIEW_UNKNOWN_ELEMENT",
            Self::RootDetach => "VIEW_ROOT_DETACH",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&[ViewError::UnknownElement, ViewError::RootDetach], "VIEW_");
    }

    #[test]
    fn display_is_descriptive() {
        assert!(ViewError::UnknownElement.to_string().contains("not part"));
        assert!(ViewError::RootDetach.to_string().contains("root"));
    }
}
