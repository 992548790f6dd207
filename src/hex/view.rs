//! Offset / hex / ASCII view of a byte store.

use super::store::{Block, ByteStore};
use crate::error::Result;
use crate::input::{KeyCode, KeyEvent};
use crate::style::{StyleId, StyleSheet};
use crate::text::StyledText;
use crate::window::{Response, Window, WindowCore};

/// Bytes shown per row.
pub const BYTES_PER_LINE: usize = 16;

/// Columns taken by the offset label, `+0000010: `.
const OFFSET_COLUMNS: u32 = 10;

#[derive(Clone, Copy, Debug)]
struct ViewStyles {
    default: StyleId,
    offset: StyleId,
    offset_focus: StyleId,
    pending: StyleId,
    absent: StyleId,
}

impl ViewStyles {
    fn resolve(sheet: &StyleSheet) -> Self {
        Self {
            default: StyleId::DEFAULT,
            offset: sheet.id_or_default("hex_offset"),
            offset_focus: sheet.id_or_default("hex_offset_focus"),
            pending: sheet.id_or_default("hex_pending"),
            absent: sheet.id_or_default("hex_absent"),
        }
    }
}

/// Signed offset label: sign plus seven hex digits.
#[must_use]
pub fn offset_label(offset: i64) -> String {
    let sign = if offset < 0 { '-' } else { '+' };
    format!("{sign}{:07X}", offset.unsigned_abs())
}

/// Scrollable hex dump of one store.
pub struct StreamView {
    core: WindowCore,
    store: Box<dyn ByteStore>,
    uri: String,
    offset: i64,
    styles: ViewStyles,
}

impl StreamView {
    /// View over `store`, labelled `uri`, with styles looked up in `sheet`.
    pub fn new(store: impl ByteStore + 'static, uri: impl Into<String>, sheet: &StyleSheet) -> Self {
        Self {
            core: WindowCore::focusable(),
            store: Box::new(store),
            uri: uri.into(),
            offset: 0,
            styles: ViewStyles::resolve(sheet),
        }
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Stream offset of the top row.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Scroll by `lines` rows; negative scrolls up.
    pub fn vmove(&mut self, lines: i64) {
        let step = lines.saturating_mul(BYTES_PER_LINE as i64);
        self.offset = self.offset.saturating_add(step);
        self.refresh_all();
    }

    fn line(&self, row: i32) -> StyledText {
        let styles = self.styles;
        let start = self
            .offset
            .saturating_add(i64::from(row) * BYTES_PER_LINE as i64);
        let offset_style = if self.core.in_focus() {
            styles.offset_focus
        } else {
            styles.offset
        };

        let mut text = StyledText::new();
        text.push(offset_style, &offset_label(start))
            .push(styles.default, ": ");

        let size = i64::try_from(self.store.size()).unwrap_or(i64::MAX);
        let mut ascii = StyledText::new();
        let mut pos = start;
        for block in self.store.get(start, BYTES_PER_LINE) {
            match block {
                Block::Resident(bytes) => {
                    pos += bytes.len() as i64;
                    text.switch(styles.default);
                    ascii.switch(styles.default);
                    for b in bytes {
                        text.push_str(&format!("{b:02X} "));
                        let c = if b.is_ascii_graphic() || b == b' ' {
                            b as char
                        } else {
                            '.'
                        };
                        ascii.push_str(c.encode_utf8(&mut [0; 4]));
                    }
                }
                Block::Pending(n) => {
                    text.push(styles.pending, &"?? ".repeat(n));
                    ascii.push(styles.pending, &"?".repeat(n));
                    pos += n as i64;
                }
                Block::Absent(n) => {
                    // Past the end shows nothing; holes show dashes
                    let cell = if pos >= size { "   " } else { "-- " };
                    text.push(styles.absent, &cell.repeat(n));
                    ascii.push(styles.absent, &" ".repeat(n));
                    pos += n as i64;
                }
            }
        }
        text.push(styles.default, " ").push_str(ascii.as_str());
        text
    }
}

impl Window for StreamView {
    fn core(&self) -> &WindowCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WindowCore {
        &mut self.core
    }

    fn refresh_strip(&mut self, row: i32, col: i32, width: u32) {
        let mut line = self.line(row);
        let pad = (self.core.width() as usize).saturating_sub(line.width());
        line.push(self.styles.default, &" ".repeat(pad));
        self.core
            .put_clipped(row, 0, self.styles.default, &line, col, width);
    }

    fn on_focus_enter(&mut self) {
        self.refresh(0, 0, self.height(), OFFSET_COLUMNS);
    }

    fn on_focus_leave(&mut self) {
        self.refresh(0, 0, self.height(), OFFSET_COLUMNS);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<Response> {
        let page = i64::from(self.height().max(1));
        let lines = match key.code {
            KeyCode::Char('j' | 'J') | KeyCode::Down if !key.ctrl() => 1,
            KeyCode::Char('k' | 'K') | KeyCode::Up if !key.ctrl() => -1,
            KeyCode::Char('f') if key.ctrl() => page,
            KeyCode::Char('b') if key.ctrl() => -page,
            KeyCode::PageDown => page,
            KeyCode::PageUp => -page,
            _ => return Ok(Response::Ignored),
        };
        self.vmove(lines);
        Ok(Response::Consumed)
    }

    fn handle_tick(&mut self) {
        if self.store.reset_updated() {
            self.refresh_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::store::MemoryStore;

    fn text_of(view: &mut StreamView) -> Vec<String> {
        let updates = view.fetch_updates();
        (0..view.height() as i32)
            .map(|row| {
                updates
                    .row(row)
                    .iter()
                    .map(|strip| strip.text.as_str())
                    .collect()
            })
            .collect()
    }

    fn view(data: &[u8], resident: u64) -> StreamView {
        let mut store = MemoryStore::new(data.to_vec());
        store.load(0, resident);
        StreamView::new(store, "mem://t", &StyleSheet::new())
    }

    #[test]
    fn test_offset_label() {
        assert_eq!(offset_label(0), "+0000000");
        assert_eq!(offset_label(0x120), "+0000120");
        assert_eq!(offset_label(-16), "-0000010");
    }

    #[test]
    fn test_rows_show_hex_pending_and_end() {
        let mut v = view(b"AB\x00CDEFGHIJKLMNOPQ", 3);
        v.resize(80, 2);
        let rows = text_of(&mut v);
        let first = format!(
            "+0000000: 41 42 00 {} AB.{}",
            "?? ".repeat(13),
            "?".repeat(13)
        );
        assert_eq!(rows[0], format!("{first:<80}"));
        let second = format!("+0000010: ?? ?? {} ??", "   ".repeat(14));
        assert_eq!(rows[1], format!("{second:<80}"));
    }

    #[test]
    fn test_rows_before_start_are_dashed() {
        let mut v = view(&[0x41; 32], 32);
        v.resize(80, 1);
        let _ = v.fetch_updates();
        v.vmove(-1);
        let rows = text_of(&mut v);
        assert!(rows[0].starts_with(&format!("-0000010: {}", "-- ".repeat(16))));
    }

    #[test]
    fn test_keys_scroll() {
        let mut v = view(&[0; 256], 256);
        v.resize(80, 4);
        v.handle_key(&KeyEvent::char('j')).unwrap();
        assert_eq!(v.offset(), 16);
        v.handle_key(&KeyEvent::with_ctrl(KeyCode::Char('f')))
            .unwrap();
        assert_eq!(v.offset(), 80);
        v.handle_key(&KeyEvent::key(KeyCode::PageUp)).unwrap();
        v.handle_key(&KeyEvent::key(KeyCode::Up)).unwrap();
        assert_eq!(v.offset(), 0);
        assert_eq!(
            v.handle_key(&KeyEvent::char('x')).unwrap(),
            Response::Ignored
        );
    }

    #[test]
    fn test_tick_redraws_only_on_new_data() {
        let store = MemoryStore::new(vec![0x30; 16]).with_trickle(16);
        let mut v = StreamView::new(store, "mem://t", &StyleSheet::new());
        v.resize(80, 1);
        assert!(text_of(&mut v)[0].contains("??"));

        v.handle_tick();
        assert!(text_of(&mut v)[0].contains("30 30"));
        v.handle_tick();
        assert!(!v.core().has_updates());
    }

    #[test]
    fn test_focus_restyles_offset_column() {
        let sheet = StyleSheet::parse(
            "hex_offset fg=blue hex_offset_focus attr=bold fg=yellow",
        )
        .unwrap();
        let mut v = StreamView::new(MemoryStore::new(vec![0; 4]), "x", &sheet);
        v.resize(80, 2);
        let _ = v.fetch_updates();
        assert!(v.focus(true));
        let updates = v.fetch_updates();
        let strip = &updates.row(1)[0];
        assert_eq!(strip.text, "+0000010");
        assert_eq!(strip.style, sheet.id("hex_offset_focus").unwrap());
        assert_eq!(updates.row(1).len(), 2);
    }
}
