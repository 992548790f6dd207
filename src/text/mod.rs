//! Styled-text codec and display width helpers.
//!
//! Windows draw either plain strings in one style or [`StyledText`], where
//! inline markers switch style mid-string. The codec answers three questions
//! about a styled string: which chunks it decodes to, how many columns it
//! occupies, and which raw byte sits at a given column.
//!
//! # Examples
//!
//! ```
//! use ebfe_tui::style::StyleId;
//! use ebfe_tui::text::StyledText;
//!
//! let label = StyleId(1);
//! let value = StyleId(2);
//! let text = StyledText::new().with(label, "size: ").with(value, "4096");
//!
//! assert_eq!(text.width(), 10);
//! let chunks: Vec<_> = text.chunks(StyleId::DEFAULT).map(|c| c.text).collect();
//! assert_eq!(chunks, ["size: ", "4096"]);
//! ```

mod styled;
mod width;

pub use styled::{Chunk, Chunks, STYLE_BEGIN, STYLE_END, StyledText};
pub use width::{char_width, display_width};
