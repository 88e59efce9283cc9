//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("V", false, false, "Select tool"),
            Shortcut::new("P", false, false, "Draw tool"),
            Shortcut::new("R", false, false, "Rectangle tool"),
            Shortcut::new("C", false, false, "Circle tool"),
            Shortcut::new("T", false, false, "Text tool"),
            Shortcut::new("A", true, false, "Select all shapes"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("C", true, false, "Copy shapes"),
            Shortcut::new("X", true, false, "Cut shapes"),
            Shortcut::new("V", true, false, "Paste shapes"),
            Shortcut::new("Delete", false, false, "Delete selected shapes"),
            Shortcut::new("Backspace", false, false, "Delete selected shapes"),
            Shortcut::new("Escape", false, false, "Cancel current action"),
            Shortcut::new(
                "Shift+Drag",
                false,
                false,
                "Maintain aspect ratio while resizing",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Z", true, true, "Redo").format(), "Ctrl+Shift+Z");
        assert_eq!(Shortcut::new("V", false, false, "Select").format(), "V");
    }

    #[test]
    fn test_registry_covers_tools() {
        let all = ShortcutRegistry::all();
        for key in ["V", "P", "R", "C", "T"] {
            assert!(all.iter().any(|s| s.key == key && !s.ctrl));
        }
    }
}
