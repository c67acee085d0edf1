//! Fixed 8x8 bitmap font
//!
//! The atlas is a 128x48 sheet of 16x6 cells covering ASCII 32..=127,
//! unpacked once from a compact 6-bits-per-character encoding.

use super::pixel::Pixel;
use super::pixel_buffer::PixelBuffer;
use log::debug;

pub const GLYPH_WIDTH: i32 = 8;
pub const GLYPH_HEIGHT: i32 = 8;
pub const ATLAS_WIDTH: u32 = 128;
pub const ATLAS_HEIGHT: u32 = 48;

const FIRST_CHAR: u32 = 32;
const LAST_CHAR: u32 = 127;
const CELLS_PER_ROW: u32 = 16;

// Each group of 4 characters encodes 24 pixels, column by column, 48 per column.
const FONT_DATA: &str = concat!(
    "?Q`0001oOch0o01o@F40o0<AGD4090LAGD<090@A7ch0?00O7Q`0600>00000000",
    "O000000nOT0063Qo4d8>?7a14Gno94AA4gno94AaOT0>o3`oO400o7QN00000400",
    "Of80001oOg<7O7moBGT7O7lABET024@aBEd714AiOdl717a_=TH013Q>00000000",
    "720D000V?V5oB3Q_HdUoE7a9@DdDE4A9@DmoE4A;Hg]oM4Aj8S4D84@`00000000",
    "OaPT1000Oa`^13P1@AI[?g`1@A=[OdAoHgljA4Ao?WlBA7l1710007l100000000",
    "ObM6000oOfMV?3QoBDD`O7a0BDDH@5A0BDD<@5A0BGeVO5ao@CQR?5Po00000000",
    "Oc``000?Ogij70PO2D]??0Ph2DUM@7i`2DTg@7lh2GUj?0TO0C1870T?00000000",
    "70<4001o?P<7?1QoHg43O;`h@GT0@:@LB@d0>:@hN@L0@?aoN@<0O7ao0000?000",
    "OcH0001SOglLA7mg24TnK7ln24US>0PL24U140PnOgl0>7QgOcH0K71S0000A000",
    "00H00000@Dm1S007@DUSg00?OdTnH7YhOfTL<7Yh@Cl0700?@Ah0300700000000",
    "<008001QL00ZA41a@6HnI<1i@FHLM81M@@0LG81?O`0nC?Y7?`0ZA7Y300080000",
    "O`082000Oh0827mo6>Hn?Wmo?6HnMb11MP08@C11H`08@FP0@@0004@000000000",
    "00P00001Oab00003OcKP0006@6=PMgl<@440MglH@000000`@000001P00000000",
    "Ob@8@@00Ob@8@Ga13R@8Mga172@8?PAo3R@827QoOb@820@0O`0007`0000007P0",
    "O`000P08Od400g`<3V=P0G`673IP0`@3>1`00P@6O`P00g`<O`000GP800000000",
    "?P9PL020O`<`N3R0@E4HC7b0@ET<ATB0@@l6C4B0O`H3N7b0?P01L3R000000020",
);

/// Bitmap font sheet used by text rendering
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    sheet: PixelBuffer,
}

impl GlyphAtlas {
    /// Decode the embedded font sheet
    pub fn new() -> Self {
        let mut sheet = PixelBuffer::new(ATLAS_WIDTH, ATLAS_HEIGHT);
        let (mut px, mut py) = (0, 0);

        for group in FONT_DATA.as_bytes().chunks_exact(4) {
            let word = group
                .iter()
                .fold(0u32, |acc, &sym| acc << 6 | (sym as u32 - 48));

            for bit in 0..24 {
                let k = if word & (1 << bit) != 0 { 255 } else { 0 };
                sheet.set_pixel(px, py, Pixel::rgba(k, k, k, k));
                py += 1;
                if py == ATLAS_HEIGHT as i32 {
                    px += 1;
                    py = 0;
                }
            }
        }

        debug!("glyph atlas decoded ({}x{})", ATLAS_WIDTH, ATLAS_HEIGHT);
        Self { sheet }
    }

    /// The decoded sheet
    pub fn sheet(&self) -> &PixelBuffer {
        &self.sheet
    }

    /// Top-left corner of a character's cell, or `None` outside 32..=127
    pub fn glyph_origin(&self, ch: char) -> Option<(i32, i32)> {
        let code = ch as u32;
        if !(FIRST_CHAR..=LAST_CHAR).contains(&code) {
            return None;
        }
        let cell = code - FIRST_CHAR;
        Some((
            (cell % CELLS_PER_ROW) as i32 * GLYPH_WIDTH,
            (cell / CELLS_PER_ROW) as i32 * GLYPH_HEIGHT,
        ))
    }

    /// Whether glyph pixel (gx, gy) of `ch` is set. Unmapped characters are blank.
    #[inline]
    pub fn is_lit(&self, ch: char, gx: i32, gy: i32) -> bool {
        if gx < 0 || gx >= GLYPH_WIDTH || gy < 0 || gy >= GLYPH_HEIGHT {
            return false;
        }
        self.glyph_origin(ch)
            .is_some_and(|(ox, oy)| self.sheet.get_pixel(ox + gx, oy + gy).r > 0)
    }
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel width of the widest line of `text` at `scale`
pub fn text_width(text: &str, scale: u32) -> i32 {
    text.split('\n')
        .map(|line| line.chars().count() as i32 * GLYPH_WIDTH * scale as i32)
        .max()
        .unwrap_or(0)
}
