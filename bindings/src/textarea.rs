//! Editing aids for `<textarea>` elements.
//!
//! - <kbd>Tab</kbd> indents every line touched by the selection with one tab character.
//! - <kbd>End</kbd> moves the caret to the end of the current line.
//! - <kbd>Ctrl</kbd>+<kbd>End</kbd> moves the caret to the end of the content and asks the caller
//!   to scroll the element to the bottom.
//!
//! Offsets here are byte offsets into a Rust `String`. The DOM reports selections in UTF-16 code
//! units, so the browser adapter converts with [`utf16_to_byte_offset`] and
//! [`byte_to_utf16_offset`] on the way in and out.

use page_hooks_protocol::Modifiers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextareaState {
    pub value: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl TextareaState {
    pub fn new(value: impl Into<String>, selection_start: usize, selection_end: usize) -> Self {
        Self {
            value: value.into(),
            selection_start,
            selection_end,
        }
    }

    pub fn with_cursor(value: impl Into<String>, cursor: usize) -> Self {
        Self::new(value, cursor, cursor)
    }

    /// Build from a DOM selection, whose bounds count UTF-16 code units.
    pub fn from_utf16_selection(value: impl Into<String>, start: usize, end: usize) -> Self {
        let value = value.into();
        let start = utf16_to_byte_offset(&value, start);
        let end = utf16_to_byte_offset(&value, end);
        Self::new(value, start, end)
    }

    /// Selection bounds ordered and clamped to char boundaries.
    fn selection(&self) -> (usize, usize) {
        let a = clamp_to_char_boundary(&self.value, self.selection_start);
        let b = clamp_to_char_boundary(&self.value, self.selection_end);
        (a.min(b), a.max(b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextareaCommand {
    IndentSelection,
    MoveToDocumentEnd,
    MoveToLineEnd,
}

impl TextareaCommand {
    /// At most one command per keystroke: `Ctrl+End` never also runs the line-end move.
    pub fn for_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        match key {
            "Tab" => Some(TextareaCommand::IndentSelection),
            "End" if modifiers.ctrl => Some(TextareaCommand::MoveToDocumentEnd),
            "End" => Some(TextareaCommand::MoveToLineEnd),
            _ => None,
        }
    }
}

/// The result of a command. `value` is `None` when the content is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextareaEdit {
    pub value: Option<String>,
    pub cursor: usize,
    /// Scroll the element to its bottom once the caret move has been applied.
    pub scroll_to_bottom: bool,
}

impl TextareaEdit {
    fn caret(cursor: usize) -> Self {
        Self {
            value: None,
            cursor,
            scroll_to_bottom: false,
        }
    }

    /// The caret as a `setSelectionRange` argument, given the content after the edit.
    pub fn utf16_cursor(&self, value: &str) -> u32 {
        u32::try_from(byte_to_utf16_offset(value, self.cursor)).unwrap_or(u32::MAX)
    }
}

pub fn apply(state: &TextareaState, command: TextareaCommand) -> TextareaEdit {
    match command {
        TextareaCommand::IndentSelection => indent_selection(state),
        TextareaCommand::MoveToDocumentEnd => TextareaEdit {
            value: None,
            cursor: state.value.len(),
            scroll_to_bottom: true,
        },
        TextareaCommand::MoveToLineEnd => {
            let (cursor, _) = state.selection();
            TextareaEdit::caret(line_end(&state.value, cursor))
        }
    }
}

fn indent_selection(state: &TextareaState) -> TextareaEdit {
    let (start, end) = state.selection();
    let selected = &state.value[start..end];

    let mut indented = String::with_capacity(selected.len() + selected.lines().count() + 1);
    for (idx, line) in selected.split('\n').enumerate() {
        if idx > 0 {
            indented.push('\n');
        }
        indented.push('\t');
        indented.push_str(line);
    }

    let mut value = String::with_capacity(state.value.len() + indented.len() - selected.len());
    value.push_str(&state.value[..start]);
    value.push_str(&indented);
    value.push_str(&state.value[end..]);

    TextareaEdit {
        value: Some(value),
        cursor: start + indented.len(),
        scroll_to_bottom: false,
    }
}

/// First `\n` at or after `cursor`, or the end of `text`.
pub fn line_end(text: &str, cursor: usize) -> usize {
    let cursor = clamp_to_char_boundary(text, cursor);
    text[cursor..]
        .find('\n')
        .map_or(text.len(), |offset| cursor + offset)
}

fn clamp_to_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Convert a UTF-16 offset (as reported by `selectionStart`) into a byte offset.
pub fn utf16_to_byte_offset(text: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (byte_idx, ch) in text.char_indices() {
        if units >= utf16_offset {
            return byte_idx;
        }
        units += ch.len_utf16();
    }
    text.len()
}

/// Convert a byte offset into the UTF-16 offset expected by `setSelectionRange`.
pub fn byte_to_utf16_offset(text: &str, byte_offset: usize) -> usize {
    let byte_offset = clamp_to_char_boundary(text, byte_offset);
    text[..byte_offset].encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_map_to_exactly_one_command() {
        assert_eq!(
            TextareaCommand::for_key("Tab", Modifiers::NONE),
            Some(TextareaCommand::IndentSelection)
        );
        assert_eq!(
            TextareaCommand::for_key("End", Modifiers::CTRL),
            Some(TextareaCommand::MoveToDocumentEnd)
        );
        assert_eq!(
            TextareaCommand::for_key("End", Modifiers::SHIFT),
            Some(TextareaCommand::MoveToLineEnd)
        );
        assert_eq!(TextareaCommand::for_key("Home", Modifiers::NONE), None);
        assert_eq!(TextareaCommand::for_key("a", Modifiers::CTRL), None);
    }

    #[test]
    fn tab_at_cursor_inserts_single_tab() {
        let state = TextareaState::with_cursor("abc", 1);
        let edit = apply(&state, TextareaCommand::IndentSelection);
        assert_eq!(
            edit,
            TextareaEdit {
                value: Some("a\tbc".to_string()),
                cursor: 2,
                scroll_to_bottom: false,
            }
        );
    }

    #[test]
    fn tab_indents_every_selected_line() {
        let value = "one\ntwo\nthree\nfour";
        // Selection covers "two\nthree".
        let state = TextareaState::new(value, 4, 13);
        let edit = apply(&state, TextareaCommand::IndentSelection);
        assert_eq!(edit.value.as_deref(), Some("one\n\ttwo\n\tthree\nfour"));
        assert_eq!(edit.cursor, 13 + 2);
    }

    #[test]
    fn tab_advances_cursor_by_line_count_from_selection_end() {
        for (value, start, end, lines) in [
            ("a\nb\nc", 0, 5, 3),
            ("a\nb\nc", 2, 3, 1),
            ("\n\n", 0, 2, 3),
            ("xy", 2, 2, 1),
        ] {
            let state = TextareaState::new(value, start, end);
            let edit = apply(&state, TextareaCommand::IndentSelection);
            assert_eq!(edit.cursor, end + lines, "value={value:?} {start}..{end}");
            let new_value = edit.value.expect("indent rewrites the value");
            assert_eq!(new_value.matches('\t').count(), lines);
        }
    }

    #[test]
    fn tab_accepts_backwards_selection() {
        let state = TextareaState::new("ab\ncd", 5, 0);
        let edit = apply(&state, TextareaCommand::IndentSelection);
        assert_eq!(edit.value.as_deref(), Some("\tab\n\tcd"));
        assert_eq!(edit.cursor, 7);
    }

    #[test]
    fn end_moves_to_current_line_end() {
        let state = TextareaState::with_cursor("abc\ndef", 1);
        assert_eq!(apply(&state, TextareaCommand::MoveToLineEnd).cursor, 3);
    }

    #[test]
    fn end_on_last_line_goes_to_content_end() {
        let state = TextareaState::with_cursor("abc\ndef", 5);
        assert_eq!(apply(&state, TextareaCommand::MoveToLineEnd).cursor, 7);
    }

    #[test]
    fn end_before_newline_stays_put() {
        let state = TextareaState::with_cursor("abc\ndef", 3);
        let edit = apply(&state, TextareaCommand::MoveToLineEnd);
        assert_eq!(edit, TextareaEdit::caret(3));
    }

    #[test]
    fn end_never_passes_next_newline_or_content_end() {
        let value = "ab\n\ncd\nefg";
        for cursor in 0..=value.len() + 2 {
            let edit = apply(
                &TextareaState::with_cursor(value, cursor),
                TextareaCommand::MoveToLineEnd,
            );
            assert!(edit.cursor <= value.len());
            let clamped = cursor.min(value.len());
            assert!(edit.cursor >= clamped);
            assert!(!value[clamped..edit.cursor].contains('\n'));
        }
    }

    #[test]
    fn ctrl_end_always_lands_at_content_end() {
        let value = "first\nsecond\nthird";
        for cursor in [0, 3, 6, value.len()] {
            let edit = apply(
                &TextareaState::with_cursor(value, cursor),
                TextareaCommand::MoveToDocumentEnd,
            );
            assert_eq!(
                edit,
                TextareaEdit {
                    value: None,
                    cursor: value.len(),
                    scroll_to_bottom: true,
                }
            );
        }
    }

    #[test]
    fn utf16_offsets_round_trip_through_multibyte_text() {
        let text = "日本\n😀x";
        // 日(1) 本(1) \n(1) 😀(2) x(1)
        assert_eq!(utf16_to_byte_offset(text, 0), 0);
        assert_eq!(utf16_to_byte_offset(text, 2), 6);
        assert_eq!(utf16_to_byte_offset(text, 3), 7);
        assert_eq!(utf16_to_byte_offset(text, 5), 11);
        assert_eq!(utf16_to_byte_offset(text, 6), text.len());
        assert_eq!(utf16_to_byte_offset(text, 99), text.len());

        assert_eq!(byte_to_utf16_offset(text, 6), 2);
        assert_eq!(byte_to_utf16_offset(text, 11), 5);
        assert_eq!(byte_to_utf16_offset(text, text.len()), 6);
    }

    #[test]
    fn indent_keeps_multibyte_text_intact() {
        let text = "日本\n語";
        let state = TextareaState::new(text, 0, text.len());
        let edit = apply(&state, TextareaCommand::IndentSelection);
        assert_eq!(edit.value.as_deref(), Some("\t日本\n\t語"));
        assert_eq!(edit.cursor, text.len() + 2);
    }

    #[test]
    fn dom_selections_round_trip_through_utf16_offsets() {
        // "é" is one UTF-16 unit and two bytes; the emoji is two units and four bytes.
        let value = "é🙂\nline";
        let state = TextareaState::from_utf16_selection(value, 3, 3);
        assert_eq!(state.selection_start, 6);

        let edit = apply(&state, TextareaCommand::MoveToLineEnd);
        assert_eq!(edit.cursor, 6);
        assert_eq!(edit.utf16_cursor(value), 3);

        let edit = apply(&state, TextareaCommand::IndentSelection);
        let indented = edit.value.clone().expect("indented");
        assert_eq!(indented, "é🙂\t\nline");
        assert_eq!(edit.utf16_cursor(&indented), 4);
    }
}
