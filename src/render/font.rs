//! Metrics and encoding for the built-in Helvetica font.
//!
//! Built-in PDF fonts only carry the WinAnsi character set; anything outside it
//! never reaches the page, so text is folded to that set before layout.

/// Helvetica advance widths (AFM units per 1000 em) for U+0020..=U+007E
const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Width used for Latin-1 letters and symbols not in the ASCII table
const FALLBACK_WIDTH: u16 = 667;

/// Drawn in place of characters the font cannot encode
pub const REPLACEMENT_CHAR: char = '?';

/// Advance width of `c` in em
pub fn glyph_width_em(c: char) -> f32 {
    let code = c as u32;
    let units = if (0x20..=0x7E).contains(&code) {
        HELVETICA_ASCII_WIDTHS[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    };
    f32::from(units) / 1000.0
}

/// Width of `text` in points at `font_size_pt`
pub fn text_width_pt(text: &str, font_size_pt: f32) -> f32 {
    text.chars().map(glyph_width_em).sum::<f32>() * font_size_pt
}

/// Fold `text` into characters the built-in font can draw.
///
/// Common typographic punctuation is mapped to ASCII, invisible joiners and
/// emoji variation selectors are dropped, and every other unsupported character
/// becomes `?`. Returns the folded text and the number of `?` substitutions.
pub fn fold_to_win_ansi(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut replaced = 0;

    for c in text.chars() {
        match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => out.push(c),
            '\t' => out.push(' '),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{2023}' | '\u{25CF}' => out.push('*'),
            '\u{2026}' => out.push_str("..."),
            '\u{20AC}' => out.push_str("EUR"),
            '\u{2122}' => out.push_str("TM"),
            '\u{2192}' => out.push_str("->"),
            '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FE00}'..='\u{FE0F}' | '\u{FEFF}' => {}
            _ => {
                out.push(REPLACEMENT_CHAR);
                replaced += 1;
            }
        }
    }

    (out, replaced)
}
