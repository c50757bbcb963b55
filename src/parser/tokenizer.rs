/*!
Bounded splitting of a message payload into lines and of a line into columns.

Splitting is strict: no trimming, no quoting and no unescaping. Columns are opaque text.
*/

pub const RECORD_DELIMITER: char = '\n';
pub const FIELD_DELIMITER: char = '\t';

/// Result of a bounded split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    pub items: Vec<&'a str>,
    /// Input was cut at the cap; everything after the last item was dropped.
    pub truncated: bool,
}

/// Splits a payload into at most `max_lines` records. A trailing newline terminates the last
/// record and does not start an empty one.
pub fn split_lines(payload: &str, max_lines: usize) -> Tokens<'_> {
    split_bounded(payload.split_terminator(RECORD_DELIMITER), max_lines)
}

/// Splits one record into at most `max_fields` columns. Empty columns are kept, including a
/// trailing one.
pub fn split_fields(line: &str, max_fields: usize) -> Tokens<'_> {
    split_bounded(line.split(FIELD_DELIMITER), max_fields)
}

fn split_bounded<'a, I>(mut iter: I, max: usize) -> Tokens<'a>
where
    I: Iterator<Item = &'a str>,
{
    let items = iter.by_ref().take(max).collect::<Vec<_>>();
    let truncated = iter.next().is_some();
    Tokens { items, truncated }
}
