//! Interaction vocabulary.
//!
//! The set of interaction kinds a delegate can translate is closed: only
//! kinds that bubble reliably through a visual-element tree are supported,
//! and the list is not extensible at runtime. A delegate republishes a kind
//! under the module-scoped key whose local name is
//! [`InteractionKind::as_str`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_types::ElementId;

/// One of the supported low-level interaction kinds.
///
/// # Variants
///
/// | Group | Kinds |
/// |-------|-------|
/// | Pointer | `PointerActivate`, `DoubleActivate`, `PointerPress`, `PointerRelease`, `PointerMove`, `PointerOver`, `PointerOut`, `PointerEnter`, `PointerLeave`, `ContextMenu` |
/// | Key | `KeyDown`, `KeyPress`, `KeyUp` |
/// | Form | `Submit`, `Change`, `TextInput` |
/// | Focus | `FocusIn`, `FocusOut` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionKind {
    /// Primary activation (click/tap).
    PointerActivate,
    /// Two rapid activations.
    DoubleActivate,
    /// Pointer button pressed.
    PointerPress,
    /// Pointer button released.
    PointerRelease,
    /// Pointer moved within the subtree.
    PointerMove,
    /// Pointer moved onto an element (bubbles).
    PointerOver,
    /// Pointer moved off an element (bubbles).
    PointerOut,
    /// Pointer entered the element itself.
    PointerEnter,
    /// Pointer left the element itself.
    ///
    /// May fire on an element that has already been detached from the
    /// tree; origin resolution must tolerate that.
    PointerLeave,
    /// Secondary-action menu requested.
    ContextMenu,
    /// Key pressed down.
    KeyDown,
    /// Key press produced input.
    KeyPress,
    /// Key released.
    KeyUp,
    /// Form submission requested.
    Submit,
    /// Committed value change on a form element.
    Change,
    /// Incremental text input.
    TextInput,
    /// Element gained focus (bubbles).
    FocusIn,
    /// Element lost focus (bubbles).
    FocusOut,
}

impl InteractionKind {
    /// Every supported kind, in delegate attachment order.
    pub const ALL: [InteractionKind; 18] = [
        Self::PointerActivate,
        Self::DoubleActivate,
        Self::PointerPress,
        Self::PointerRelease,
        Self::PointerMove,
        Self::PointerOver,
        Self::PointerOut,
        Self::PointerEnter,
        Self::PointerLeave,
        Self::ContextMenu,
        Self::KeyDown,
        Self::KeyPress,
        Self::KeyUp,
        Self::Submit,
        Self::Change,
        Self::TextInput,
        Self::FocusIn,
        Self::FocusOut,
    ];

    /// Canonical kebab-case name; also the local event name a delegate
    /// publishes under.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerActivate => "pointer-activate",
            Self::DoubleActivate => "double-activate",
            Self::PointerPress => "pointer-press",
            Self::PointerRelease => "pointer-release",
            Self::PointerMove => "pointer-move",
            Self::PointerOver => "pointer-over",
            Self::PointerOut => "pointer-out",
            Self::PointerEnter => "pointer-enter",
            Self::PointerLeave => "pointer-leave",
            Self::ContextMenu => "context-menu",
            Self::KeyDown => "key-down",
            Self::KeyPress => "key-press",
            Self::KeyUp => "key-up",
            Self::Submit => "submit",
            Self::Change => "change",
            Self::TextInput => "text-input",
            Self::FocusIn => "focus-in",
            Self::FocusOut => "focus-out",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw interaction as delivered by the visual-element tree.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    /// What happened.
    pub kind: InteractionKind,
    /// Element the interaction originated on. May already be detached
    /// from the tree by the time handlers observe it.
    pub origin: ElementId,
    /// Kind-specific detail (position, key, input text, …).
    pub detail: Value,
}

impl InteractionEvent {
    /// Creates an interaction event.
    #[must_use]
    pub fn new(kind: InteractionKind, origin: ElementId, detail: Value) -> Self {
        Self {
            kind,
            origin,
            detail,
        }
    }
}

/// What a delegate publishes for one interaction: the raw event plus the
/// resolved nearest typed ancestor, so consumers choose which to read.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionNotice {
    /// The raw interaction, untouched.
    pub event: InteractionEvent,
    /// Nearest ancestor of the origin (inclusive) carrying a role marker,
    /// bounded by the module root. `None` when no typed element matched or
    /// the origin was detached.
    pub target: Option<ElementId>,
    /// Role marker of `target`.
    pub target_role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_kinds_listed_once() {
        let unique: HashSet<_> = InteractionKind::ALL.iter().collect();
        assert_eq!(unique.len(), InteractionKind::ALL.len());
    }

    #[test]
    fn names_are_kebab_case_and_unique() {
        let mut seen = HashSet::new();
        for kind in InteractionKind::ALL {
            let name = kind.as_str();
            assert!(seen.insert(name), "duplicate kind name: {name}");
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '-'),
                "kind name not kebab-case: {name}"
            );
        }
    }

    #[test]
    fn serde_uses_canonical_name() {
        let json = serde_json::to_string(&InteractionKind::PointerActivate).expect("serialize");
        assert_eq!(json, "\"pointer-activate\"");

        let back: InteractionKind = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, InteractionKind::PointerActivate);
    }

    #[test]
    fn event_construction() {
        let event = InteractionEvent::new(
            InteractionKind::KeyDown,
            ElementId::default(),
            serde_json::json!({ "key": "Enter" }),
        );
        assert_eq!(event.kind, InteractionKind::KeyDown);
        assert_eq!(event.detail["key"], "Enter");
    }
}
