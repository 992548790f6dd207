//! Named styles, the style description language and capability negotiation.
//!
//! Windows never carry colors directly. They refer to styles through a
//! compact [`StyleId`] resolved once, at construction, from a [`StyleSheet`].
//! At startup the application turns the sheet into one [`RenderStyle`] per
//! id, adapted to what the driver reports in its [`StyleCaps`].
//!
//! # Description language
//!
//! Whitespace-separated tokens. A bare token names a style; the
//! `key=value` tokens after it set that style's fields:
//!
//! ```text
//! default      fg=white bg=black
//! normal_title attr=bold fg=red bg=white
//! hex_pending  fg=yellow|bright
//! ```
//!
//! Keys are `attr`, `fg` and `bg`. A value is a `|`-joined set of symbols or
//! decimal integers, OR-ed together.
//!
//! ```
//! use ebfe_tui::style::StyleSheet;
//!
//! let sheet = StyleSheet::parse("title attr=bold fg=red bg=white").unwrap();
//! let title = sheet.id("title").unwrap();
//! assert_eq!(sheet.spec(title).unwrap().fg, Some(1));
//! ```

use crate::error::{Error, Result};
use bitflags::bitflags;
use std::collections::{HashMap, HashSet};

bitflags! {
    /// Text rendering attributes.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Attributes: u16 {
        /// Bold/increased intensity.
        const BOLD      = 0x01;
        /// Dim/decreased intensity.
        const DIM       = 0x02;
        /// Italic (not widely supported).
        const ITALIC    = 0x04;
        /// Underlined text.
        const UNDERLINE = 0x08;
        /// Blinking text (rarely supported).
        const BLINK     = 0x10;
        /// Swapped foreground/background.
        const INVERSE   = 0x20;
    }
}

/// Compact handle to a named style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleId(pub u16);

impl StyleId {
    /// The `default` style, present in every sheet.
    pub const DEFAULT: Self = Self(0);

    /// Index into per-style tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Requested look of a style before negotiation.
///
/// `None` colors mean "the driver's default".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StyleSpec {
    pub attrs: Attributes,
    pub fg: Option<u16>,
    pub bg: Option<u16>,
}

impl StyleSpec {
    /// Spec with both colors set.
    #[must_use]
    pub const fn colors(fg: u16, bg: u16) -> Self {
        Self {
            attrs: Attributes::empty(),
            fg: Some(fg),
            bg: Some(bg),
        }
    }

    /// Return this spec with extra attributes.
    #[must_use]
    pub const fn with_attrs(self, attrs: Attributes) -> Self {
        Self {
            attrs: Attributes::from_bits_retain(self.attrs.bits() | attrs.bits()),
            ..self
        }
    }
}

/// Style capabilities reported by a driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleCaps {
    /// Attributes the driver can render.
    pub attrs: Attributes,
    /// Number of foreground colors.
    pub fg_count: u16,
    /// Number of background colors.
    pub bg_count: u16,
    /// Foreground used when a style leaves it unset or out of range.
    pub fg_default: u16,
    /// Background used when a style leaves it unset or out of range.
    pub bg_default: u16,
}

impl Default for StyleCaps {
    fn default() -> Self {
        Self {
            attrs: Attributes::BOLD,
            fg_count: 8,
            bg_count: 8,
            fg_default: 7,
            bg_default: 0,
        }
    }
}

/// Fully negotiated style handed to a driver's `build_style`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderStyle {
    pub attrs: Attributes,
    pub fg: u16,
    pub bg: u16,
}

/// Named styles, indexed by [`StyleId`].
#[derive(Clone, Debug)]
pub struct StyleSheet {
    names: Vec<String>,
    specs: Vec<StyleSpec>,
    index: HashMap<String, StyleId>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSheet {
    /// Name of the style every sheet starts with.
    pub const DEFAULT_NAME: &'static str = "default";

    /// Create a sheet holding only the `default` style.
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: vec![Self::DEFAULT_NAME.to_string()],
            specs: vec![StyleSpec::default()],
            index: HashMap::from([(Self::DEFAULT_NAME.to_string(), StyleId::DEFAULT)]),
        }
    }

    /// Parse a style description into a new sheet.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sheet = Self::new();
        sheet.apply(text)?;
        Ok(sheet)
    }

    /// Define or replace a style, returning its id.
    ///
    /// Fails once every [`StyleId`] is taken.
    pub fn define(&mut self, name: &str, spec: StyleSpec) -> Result<StyleId> {
        if let Some(&id) = self.index.get(name) {
            self.specs[id.index()] = spec;
            return Ok(id);
        }
        let id = u16::try_from(self.names.len())
            .map(StyleId)
            .map_err(|_| sheet_error(name, "too many styles"))?;
        self.names.push(name.to_string());
        self.specs.push(spec);
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Apply a style description on top of this sheet.
    ///
    /// Styles named in `text` replace existing ones of the same name. Naming
    /// the same style twice within one description is an error.
    pub fn apply(&mut self, text: &str) -> Result<()> {
        let mut seen = HashSet::new();
        let mut current: Option<(&str, StyleSpec)> = None;

        for token in text.split_whitespace() {
            let Some((key, value)) = token.split_once('=') else {
                if !seen.insert(token) {
                    return Err(sheet_error(token, "style defined twice"));
                }
                if let Some((name, spec)) = current.take() {
                    self.define(name, spec)?;
                }
                current = Some((token, StyleSpec::default()));
                continue;
            };

            let Some((_, spec)) = current.as_mut() else {
                return Err(sheet_error(token, "attribute before any style name"));
            };
            match key {
                "attr" => {
                    let bits = parse_value(token, value, attr_symbol)?;
                    let attrs = Attributes::from_bits(bits as u16)
                        .filter(|_| bits <= u32::from(u16::MAX))
                        .ok_or_else(|| sheet_error(token, "unsupported attribute bits"))?;
                    spec.attrs = attrs;
                }
                "fg" => spec.fg = Some(parse_color(token, value)?),
                "bg" => spec.bg = Some(parse_color(token, value)?),
                _ => return Err(sheet_error(token, "unknown key")),
            }
        }

        if let Some((name, spec)) = current {
            self.define(name, spec)?;
        }
        Ok(())
    }

    /// Look up a style id by name.
    pub fn id(&self, name: &str) -> Result<StyleId> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownStyle(name.to_string()))
    }

    /// Look up a style id by name, falling back to `default`.
    #[must_use]
    pub fn id_or_default(&self, name: &str) -> StyleId {
        self.index.get(name).copied().unwrap_or(StyleId::DEFAULT)
    }

    /// Name of a style.
    #[must_use]
    pub fn name(&self, id: StyleId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Requested look of a style.
    #[must_use]
    pub fn spec(&self, id: StyleId) -> Option<&StyleSpec> {
        self.specs.get(id.index())
    }

    /// Number of styles, `default` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// A sheet always holds `default`, so this is never true.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Negotiate every style against a driver's capabilities.
    ///
    /// The result is indexed by [`StyleId`]. Attributes the driver cannot
    /// render are masked off; unset or out-of-range colors fall back to the
    /// driver's defaults.
    #[must_use]
    pub fn negotiate(&self, caps: &StyleCaps) -> Vec<RenderStyle> {
        self.specs
            .iter()
            .map(|spec| RenderStyle {
                attrs: spec.attrs & caps.attrs,
                fg: spec
                    .fg
                    .filter(|&c| c < caps.fg_count)
                    .unwrap_or(caps.fg_default),
                bg: spec
                    .bg
                    .filter(|&c| c < caps.bg_count)
                    .unwrap_or(caps.bg_default),
            })
            .collect()
    }
}

fn sheet_error(token: &str, reason: &str) -> Error {
    Error::StyleSheet {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

fn attr_symbol(symbol: &str) -> Option<u32> {
    let attrs = match symbol {
        "normal" => Attributes::empty(),
        "bold" => Attributes::BOLD,
        "dim" => Attributes::DIM,
        "italic" => Attributes::ITALIC,
        "underline" => Attributes::UNDERLINE,
        "blink" => Attributes::BLINK,
        "reverse" | "inverse" => Attributes::INVERSE,
        _ => return None,
    };
    Some(u32::from(attrs.bits()))
}

fn color_symbol(symbol: &str) -> Option<u32> {
    let color = match symbol {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" => 7,
        "bright" => 8,
        _ => return None,
    };
    Some(color)
}

fn parse_color(token: &str, value: &str) -> Result<u16> {
    let color = parse_value(token, value, color_symbol)?;
    u16::try_from(color).map_err(|_| sheet_error(token, "color index too large"))
}

fn parse_value(token: &str, value: &str, symbols: fn(&str) -> Option<u32>) -> Result<u32> {
    let mut bits = 0u32;
    for part in value.split('|') {
        if part.is_empty() {
            return Err(sheet_error(token, "empty value"));
        }
        let v = if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse::<u32>()
                .map_err(|_| sheet_error(token, "number too large"))?
        } else {
            symbols(part).ok_or_else(|| sheet_error(token, "unknown symbol"))?
        };
        bits |= v;
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sheet_has_default() {
        let sheet = StyleSheet::new();
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.id("default").unwrap(), StyleId::DEFAULT);
        assert_eq!(sheet.name(StyleId::DEFAULT), Some("default"));
    }

    #[test]
    fn test_parse_description() {
        let sheet =
            StyleSheet::parse("default fg=white bg=black\n title attr=bold|underline fg=red bg=7")
                .unwrap();
        assert_eq!(sheet.len(), 2);

        let default = sheet.spec(StyleId::DEFAULT).unwrap();
        assert_eq!(default.fg, Some(7));
        assert_eq!(default.bg, Some(0));

        let title = sheet.spec(sheet.id("title").unwrap()).unwrap();
        assert_eq!(title.attrs, Attributes::BOLD | Attributes::UNDERLINE);
        assert_eq!(title.fg, Some(1));
        assert_eq!(title.bg, Some(7));
    }

    #[test]
    fn test_values_are_ored() {
        let sheet = StyleSheet::parse("hot fg=red|bright bg=4|8").unwrap();
        let spec = sheet.spec(sheet.id("hot").unwrap()).unwrap();
        assert_eq!(spec.fg, Some(9));
        assert_eq!(spec.bg, Some(12));
    }

    #[test]
    fn test_unknown_symbol_is_error() {
        let err = StyleSheet::parse("x fg=mauve").unwrap_err();
        assert!(matches!(err, Error::StyleSheet { ref token, .. } if token == "fg=mauve"));
    }

    #[test]
    fn test_unknown_key_is_error() {
        assert!(StyleSheet::parse("x size=3").is_err());
    }

    #[test]
    fn test_attribute_before_name_is_error() {
        assert!(StyleSheet::parse("fg=red x").is_err());
    }

    #[test]
    fn test_empty_value_is_error() {
        assert!(StyleSheet::parse("x fg=").is_err());
        assert!(StyleSheet::parse("x fg=red|").is_err());
    }

    #[test]
    fn test_duplicate_in_one_description_is_error() {
        assert!(StyleSheet::parse("x fg=1 x fg=2").is_err());
    }

    #[test]
    fn test_apply_replaces_existing() {
        let mut sheet = StyleSheet::parse("x fg=1").unwrap();
        let id = sheet.id("x").unwrap();
        sheet.apply("x fg=2").unwrap();
        assert_eq!(sheet.id("x").unwrap(), id);
        assert_eq!(sheet.spec(id).unwrap().fg, Some(2));
    }

    #[test]
    fn test_define_fails_when_ids_run_out() {
        let mut sheet = StyleSheet::new();
        for i in 1..=u16::MAX {
            assert_eq!(sheet.define(&format!("s{i}"), StyleSpec::default()).unwrap(), StyleId(i));
        }
        assert!(matches!(
            sheet.define("one_more", StyleSpec::default()),
            Err(Error::StyleSheet { .. })
        ));
        assert!(sheet.apply("another fg=red").is_err());
        // Redefining an existing name still works
        assert_eq!(sheet.define("s7", StyleSpec::colors(1, 0)).unwrap(), StyleId(7));
        assert_eq!(sheet.len(), usize::from(u16::MAX) + 1);
    }

    #[test]
    fn test_color_too_large() {
        assert!(StyleSheet::parse("x fg=70000").is_err());
    }

    #[test]
    fn test_unknown_style_lookup() {
        let sheet = StyleSheet::new();
        assert!(matches!(sheet.id("nope"), Err(Error::UnknownStyle(_))));
        assert_eq!(sheet.id_or_default("nope"), StyleId::DEFAULT);
    }

    #[test]
    fn test_negotiate_masks_and_falls_back() {
        let sheet = StyleSheet::parse("a attr=bold|underline fg=12 bg=3 b attr=bold").unwrap();
        let caps = StyleCaps {
            attrs: Attributes::BOLD,
            fg_count: 8,
            bg_count: 8,
            fg_default: 7,
            bg_default: 0,
        };
        let map = sheet.negotiate(&caps);
        assert_eq!(map.len(), 3);
        // default
        assert_eq!(map[0], RenderStyle { attrs: Attributes::empty(), fg: 7, bg: 0 });
        // fg 12 does not fit into 8 colors
        assert_eq!(map[1], RenderStyle { attrs: Attributes::BOLD, fg: 7, bg: 3 });
        assert_eq!(map[2], RenderStyle { attrs: Attributes::BOLD, fg: 7, bg: 0 });
    }

    #[test]
    fn test_negotiate_256_colors_keeps_bright() {
        let sheet = StyleSheet::parse("a fg=12").unwrap();
        let caps = StyleCaps {
            fg_count: 256,
            bg_count: 256,
            ..StyleCaps::default()
        };
        assert_eq!(sheet.negotiate(&caps)[1].fg, 12);
    }

    #[test]
    fn test_spec_builders() {
        let spec = StyleSpec::colors(1, 7).with_attrs(Attributes::BOLD);
        assert_eq!(spec.fg, Some(1));
        assert_eq!(spec.bg, Some(7));
        assert!(spec.attrs.contains(Attributes::BOLD));
    }
}
