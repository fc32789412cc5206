//! Sentence accumulator shared by the branch composers.

/// Report text under construction.
///
/// Sentences end with `". "` and paragraphs are separated by a blank line,
/// so a paragraph break after a sentence leaves `". \n\n"`. Pathology
/// systems that receive the text expect exactly that layout.
#[derive(Debug, Default)]
pub(crate) struct Narrative {
    text: String,
}

impl Narrative {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Header line followed by the one-line diagnosis statement.
    pub(crate) fn heading(&mut self, header: &str, diagnosis: &str) {
        self.text.push_str(header);
        self.text.push_str("\n\n");
        self.text.push_str(diagnosis);
        self.text.push_str(" (See note.)\n\n");
    }

    /// Append a sentence; `". "` is added.
    pub(crate) fn sentence(&mut self, sentence: impl AsRef<str>) {
        self.text.push_str(sentence.as_ref());
        self.text.push_str(". ");
    }

    /// Append a sentence only when `value` is present.
    pub(crate) fn sentence_if<T>(&mut self, value: Option<T>, build: impl FnOnce(T) -> String) {
        if let Some(v) = value {
            self.sentence(build(v));
        }
    }

    pub(crate) fn paragraph_break(&mut self) {
        self.text.push_str("\n\n");
    }

    /// Stand-alone paragraph (the ancillary testing statement).
    pub(crate) fn paragraph(&mut self, text: &str) {
        self.paragraph_break();
        self.text.push_str(text);
        self.paragraph_break();
    }

    /// Final sentence; the caller supplies its full stop.
    pub(crate) fn closing(mut self, text: &str) -> String {
        self.text.push_str(text);
        self.text
    }
}

/// Displayed text, or the default phrase when unselected.
pub(crate) fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut n = Narrative::new();
        n.heading("XSYN (Example Synoptic Report)", "Example.");
        n.sentence("Note: one");
        n.sentence_if(None::<&str>, |v| format!("skipped {v}"));
        n.sentence_if(Some("two"), |v| format!("Then {v}"));
        n.paragraph("Flow pending");
        let text = n.closing("Done.");

        assert_eq!(
            text,
            "XSYN (Example Synoptic Report)\n\nExample. (See note.)\n\nNote: one. Then two. \n\nFlow pending\n\nDone."
        );
    }
}
