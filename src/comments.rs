use crate::block::{BlockComment, BlockScan, locate_block_comments};

const LINE: &str = "//";

/// Result of one removal pass.
///
/// `Unchanged` means the pass found nothing to remove, which is not the same
/// as `Changed` to a string that happens to equal the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Unchanged,
    Changed(String),
}

impl Removal {
    pub fn is_changed(&self) -> bool {
        matches!(self, Removal::Changed(_))
    }

    pub fn into_changed(self) -> Option<String> {
        match self {
            Removal::Changed(text) => Some(text),
            Removal::Unchanged => None,
        }
    }
}

/// Comments stripped from one piece of source text.
///
/// Block comments go first, then line comments on whatever is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFilter {
    output: String,
    had_comments: bool,
}

impl CommentFilter {
    pub fn new(input: &str) -> Self {
        let block = remove_block_comments(input);
        let line = match &block {
            Removal::Changed(text) => remove_line_comments(text),
            Removal::Unchanged => remove_line_comments(input),
        };

        let had_comments = block.is_changed() || line.is_changed();
        let output = line
            .into_changed()
            .or_else(|| block.into_changed())
            .unwrap_or_else(|| input.to_string());

        Self {
            output,
            had_comments,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn had_comments(&self) -> bool {
        self.had_comments
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

/// Shorthand for [`CommentFilter::new`].
pub fn filter(input: &str) -> CommentFilter {
    CommentFilter::new(input)
}

/// Remove every `/* ... */` comment.
///
/// An opener without a closer anywhere after it leaves the text untouched.
/// Positions are taken from the original text, so earlier removals never
/// shift later ones.
pub fn remove_block_comments(input: &str) -> Removal {
    let spans = match locate_block_comments(input) {
        BlockScan::Spans(spans) => spans,
        BlockScan::Empty | BlockScan::Unclosed { .. } => return Removal::Unchanged,
    };

    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;

    for span in spans {
        let comment = BlockComment::new(input, span);
        let range = comment.removal_range();
        // A previous comment may already have consumed part of this line.
        let start = range.start.max(cursor);

        let mut kept = &input[cursor..start];
        if comment.trims_code_before() {
            kept = kept.trim_end_matches([' ', '\t']);
        }
        out.push_str(kept);

        if let Some(replacement) = comment.replacement_text() {
            out.push_str(replacement);
        }
        cursor = range.end.max(start);
    }

    out.push_str(&input[cursor..]);
    Removal::Changed(out)
}

/// Remove every `//` comment up to the end of its line.
///
/// The code between comments is trimmed on both ends, and the newline ending
/// each comment is where the next piece resumes. Comment lines at the very
/// top of the text are dropped along with their newline.
pub fn remove_line_comments(input: &str) -> Removal {
    if !input.contains(LINE) {
        return Removal::Unchanged;
    }

    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;

    while let Some(rel) = input[cursor..].find(LINE) {
        let marker = cursor + rel;
        let segment = input[cursor..marker].trim();
        out.push_str(segment);

        let Some(rel_nl) = input[marker..].find('\n') else {
            // Comment runs to the end of input.
            return Removal::Changed(out);
        };
        let newline = marker + rel_nl;

        cursor = if out.is_empty() { newline + 1 } else { newline };
    }

    out.push_str(&input[cursor..]);
    Removal::Changed(out)
}
