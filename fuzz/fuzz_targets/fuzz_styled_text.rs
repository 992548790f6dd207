//! Fuzz target for styled-text parsing and decoding.

#![no_main]

use ebfe_tui::style::StyleId;
use ebfe_tui::text::{StyledText, display_width};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(text) = StyledText::parse(data) else {
        return;
    };

    let mut total = 0;
    for chunk in text.chunks(StyleId::DEFAULT) {
        assert!(!chunk.text.is_empty(), "empty chunk in {data:?}");
        total += display_width(chunk.text);
    }
    assert_eq!(total, text.width());

    let (index, reached) = text.index_for_column(total + 1);
    assert!(index.is_none());
    assert_eq!(reached, total);
});
