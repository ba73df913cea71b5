//! Free-text paragraph parsing for application fields

/// Kind of a parsed paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    Title,
    Paragraph,
}

/// A single block of text ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub text: String,
}

impl Paragraph {
    fn title(text: impl Into<String>) -> Self {
        Self {
            kind: ParagraphKind::Title,
            text: text.into(),
        }
    }

    fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: ParagraphKind::Paragraph,
            text: text.into(),
        }
    }

    pub fn is_title(&self) -> bool {
        self.kind == ParagraphKind::Title
    }
}

/// Split text on blank-line boundaries and classify each block.
///
/// - `#### Heading` becomes a title with the marker stripped
/// - `**bold**` blocks become titles kept verbatim
/// - everything else is a trimmed paragraph
///
/// An empty input yields exactly one empty paragraph.
pub fn parse_paragraphs(input: &str) -> Vec<Paragraph> {
    split_blank_lines(input)
        .into_iter()
        .map(|block| {
            if let Some(rest) = block.strip_prefix("####") {
                Paragraph::title(rest.trim())
            } else if block.starts_with("**") {
                Paragraph::title(block)
            } else {
                Paragraph::paragraph(block.trim())
            }
        })
        .collect()
}

/// Split on runs of two or more consecutive newlines
fn split_blank_lines(input: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' && bytes.get(i + 1) == Some(&b'\n') {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'\n' {
                i += 1;
            }
            blocks.push(&input[start..run_start]);
            start = i;
        } else {
            i += 1;
        }
    }
    blocks.push(&input[start..]);

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_then_body() {
        let parsed = parse_paragraphs("#### Title\n\nBody text");
        assert_eq!(
            parsed,
            vec![Paragraph::title("Title"), Paragraph::paragraph("Body text")]
        );
    }

    #[test]
    fn test_single_newlines_stay_in_one_paragraph() {
        let parsed = parse_paragraphs("line one\nline two");
        assert_eq!(parsed, vec![Paragraph::paragraph("line one\nline two")]);
    }

    #[test]
    fn test_empty_input_yields_one_empty_paragraph() {
        let parsed = parse_paragraphs("");
        assert_eq!(parsed, vec![Paragraph::paragraph("")]);
    }

    #[test]
    fn test_long_newline_runs_collapse() {
        let parsed = parse_paragraphs("a\n\n\n\nb");
        assert_eq!(
            parsed,
            vec![Paragraph::paragraph("a"), Paragraph::paragraph("b")]
        );
    }

    #[test]
    fn test_bold_block_is_title_kept_verbatim() {
        let parsed = parse_paragraphs("**Goal** \n\ntext");
        assert_eq!(parsed[0], Paragraph::title("**Goal** "));
        assert!(parsed[0].is_title());
        assert!(!parsed[1].is_title());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let input = "#### A\n\nb\n\n**c**";
        assert_eq!(parse_paragraphs(input), parse_paragraphs(input));
    }

    #[test]
    fn test_trailing_blank_lines_leave_empty_block() {
        let parsed = parse_paragraphs("body\n\n");
        assert_eq!(
            parsed,
            vec![Paragraph::paragraph("body"), Paragraph::paragraph("")]
        );
    }
}
