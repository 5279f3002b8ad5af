use std::ops::Range;

const OPEN: &str = "/*";
const CLOSE: &str = "*/";

/// Byte offsets of one `/* ... */` comment: where the opening marker starts
/// and where the closing marker starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSpan {
    pub open: usize,
    pub close: usize,
}

/// Outcome of scanning a text for block comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockScan {
    /// No `/*` anywhere in the text.
    Empty,
    /// A `/*` at `open` has no `*/` after it. Nothing found before it is kept.
    Unclosed { open: usize },
    /// Every block comment, left to right, non-overlapping.
    Spans(Vec<CommentSpan>),
}

/// Locate all block comments in a single left-to-right pass.
///
/// The first `*/` after an opening `/*` always closes it; nested openers are
/// just part of the body.
pub fn locate_block_comments(text: &str) -> BlockScan {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(OPEN) {
        let open = cursor + rel;
        let body = open + OPEN.len();
        let Some(rel_close) = text[body..].find(CLOSE) else {
            return BlockScan::Unclosed { open };
        };
        let close = body + rel_close;
        spans.push(CommentSpan { open, close });
        cursor = close + CLOSE.len();
    }

    if spans.is_empty() {
        BlockScan::Empty
    } else {
        BlockScan::Spans(spans)
    }
}

/// Line context of a single block comment within its source text.
#[derive(Debug, Clone)]
pub struct BlockComment {
    span: CommentSpan,
    len: usize,
    /// Newline before the opening line, if any.
    line_break_before: Option<usize>,
    /// Newline after the closing marker, if any.
    line_break_after: Option<usize>,
    opens_on_new_line: bool,
    closes_on_new_line: bool,
}

impl BlockComment {
    pub fn new(text: &str, span: CommentSpan) -> Self {
        let line_break_before = text[..span.open].rfind('\n');
        let line_break_after = text[span.close..].find('\n').map(|i| span.close + i);

        let start_of_line = line_break_before.unwrap_or(0);
        let opens_on_new_line = is_blank(&text[start_of_line..span.open]);

        let after_close = span.close + CLOSE.len();
        let line_end = line_break_after.map_or(text.len(), |nl| nl + 1);
        let closes_on_new_line = is_blank(&text[after_close..line_end]);

        Self {
            span,
            len: text.len(),
            line_break_before,
            line_break_after,
            opens_on_new_line,
            closes_on_new_line,
        }
    }

    /// Index of the newline that precedes the opening line, or 0 when the
    /// comment starts on the first line.
    pub fn start_of_line(&self) -> usize {
        self.line_break_before.unwrap_or(0)
    }

    /// Index of the newline that ends the closing line, or the last index of
    /// the text when the comment ends on the last line.
    pub fn end_of_line(&self) -> usize {
        self.line_break_after
            .unwrap_or_else(|| self.len.saturating_sub(1))
    }

    pub fn opens_on_new_line(&self) -> bool {
        self.opens_on_new_line
    }

    pub fn closes_on_new_line(&self) -> bool {
        self.closes_on_new_line
    }

    /// Text to put where the comment was.
    ///
    /// `None` when the comment has its lines to itself and they are dropped
    /// whole. A single newline when code sits on only one side of it, so that
    /// code stays on a line of its own. Empty when it is inline with code on
    /// both sides.
    pub fn replacement_text(&self) -> Option<&'static str> {
        match (self.opens_on_new_line, self.closes_on_new_line) {
            (true, true) => None,
            (true, false) | (false, true) => Some("\n"),
            (false, false) => Some(""),
        }
    }

    /// Byte range of the original text replaced by [`Self::replacement_text`].
    pub fn removal_range(&self) -> Range<usize> {
        let after_close = self.span.close + CLOSE.len();
        match (self.opens_on_new_line, self.closes_on_new_line) {
            (true, true) => {
                let end = match (self.line_break_before, self.line_break_after) {
                    // Keep the trailing newline as the join with what follows.
                    (Some(_), Some(nl)) => nl,
                    // First line: nothing precedes, so the newline goes too.
                    (None, Some(nl)) => nl + 1,
                    (_, None) => self.len,
                };
                self.start_of_line()..end
            }
            (true, false) => self.start_of_line()..after_close,
            (false, true) => {
                let end = self.line_break_after.map_or(self.len, |nl| nl + 1);
                self.span.open..end
            }
            (false, false) => self.span.open..after_close,
        }
    }

    /// Whether whitespace between the preceding code and the comment should be
    /// dropped before the replacement newline is written.
    pub fn trims_code_before(&self) -> bool {
        !self.opens_on_new_line && self.closes_on_new_line
    }
}

fn is_blank(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}
