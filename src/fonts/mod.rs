// Mono fonts for the stream view and the matching wrap measurer.
// Three sizes: 0=Small, 1=Medium, 2=Large.

pub mod wrap;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_8X13, FONT_10X20};

pub use wrap::WrapMeasure;

// body font by index: 0 = Small, 1 = Medium, 2 = Large
pub fn body_font(idx: u8) -> &'static MonoFont<'static> {
    match idx {
        1 => &FONT_8X13,
        2 => &FONT_10X20,
        _ => &FONT_6X10,
    }
}

// measurer for body text laid out `width_px` wide
pub fn body_measure(idx: u8, width_px: u32) -> WrapMeasure {
    WrapMeasure::new(body_font(idx), width_px).with_line_spacing(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Measure;

    #[test]
    fn unknown_index_falls_back_to_small() {
        assert_eq!(body_font(9).character_size, FONT_6X10.character_size);
        assert_eq!(body_font(2).character_size, FONT_10X20.character_size);
    }

    #[test]
    fn body_measure_uses_font_height_plus_spacing() {
        assert_eq!(body_measure(1, 480).line_height(), 15);
    }
}
