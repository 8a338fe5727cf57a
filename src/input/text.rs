//! Text-mode input.

/// Visible rows of the text area; longer input scrolls.
pub const TEXT_AREA_ROWS: usize = 12;

/// Free-text input for text-mode tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    placeholder: Option<&'static str>,
}

impl TextInput {
    pub fn new(placeholder: Option<&'static str>) -> Self {
        Self {
            value: String::new(),
            placeholder,
        }
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.placeholder
    }

    /// True when nothing but whitespace has been typed.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// The submit action is enabled only for non-blank input while idle.
    pub fn can_submit(&self, busy: bool) -> bool {
        !busy && !self.is_blank()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Lines that would be visible in the bounded text area.
    pub fn visible_lines(&self) -> impl Iterator<Item = &str> {
        self.value.lines().take(TEXT_AREA_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_cannot_submit() {
        let mut t = TextInput::new(None);
        assert!(!t.can_submit(false));
        t.set("  \n\t ");
        assert!(t.is_blank());
        assert!(!t.can_submit(false));
    }

    #[test]
    fn busy_blocks_submit() {
        let mut t = TextInput::new(Some("Type here"));
        t.set("hello");
        assert!(t.can_submit(false));
        assert!(!t.can_submit(true));
    }

    #[test]
    fn value_is_sent_untrimmed() {
        let mut t = TextInput::default();
        t.set("  keep spacing  ");
        assert_eq!(t.value(), "  keep spacing  ");
    }

    #[test]
    fn visible_lines_are_bounded() {
        let mut t = TextInput::default();
        t.set((0..40).map(|i| i.to_string()).collect::<Vec<_>>().join("\n"));
        assert_eq!(t.visible_lines().count(), TEXT_AREA_ROWS);
    }
}
