// Wrapped-line height of a text chunk in a mono font.
//
// Greedy word wrap: '\n' breaks, '\r' is ignored, a word that does not
// fit moves to the next line, a word wider than a line is cut at the
// column limit. UTF-8 continuation bytes take no column.

use embedded_graphics::mono_font::MonoFont;

use crate::stream::Measure;

#[derive(Clone, Copy)]
pub struct WrapMeasure {
    font: &'static MonoFont<'static>,
    width_px: u32,
    line_spacing: u32,
}

impl WrapMeasure {
    pub const fn new(font: &'static MonoFont<'static>, width_px: u32) -> Self {
        Self {
            font,
            width_px,
            line_spacing: 0,
        }
    }

    pub const fn with_line_spacing(mut self, px: u32) -> Self {
        self.line_spacing = px;
        self
    }

    // n glyphs span n * w + (n - 1) * spacing
    pub fn columns(&self) -> usize {
        let spacing = self.font.character_spacing;
        let advance = self.font.character_size.width + spacing;
        if advance == 0 {
            return 1;
        }
        (((self.width_px + spacing) / advance) as usize).max(1)
    }

    pub fn count_lines(&self, text: &[u8]) -> usize {
        if text.is_empty() {
            return 0;
        }

        let cols = self.columns();
        let mut lines = 1;
        let mut col = 0;
        let mut word = 0;

        for &b in text {
            match b {
                b'\n' => {
                    place_word(&mut lines, &mut col, &mut word, cols);
                    lines += 1;
                    col = 0;
                }
                b'\r' => {}
                b' ' | b'\t' => {
                    place_word(&mut lines, &mut col, &mut word, cols);
                    // a space hanging past the edge is swallowed
                    if col < cols {
                        col += 1;
                    }
                }
                _ if b & 0xC0 == 0x80 => {}
                _ => word += 1,
            }
        }
        place_word(&mut lines, &mut col, &mut word, cols);

        lines
    }
}

fn place_word(lines: &mut usize, col: &mut usize, word: &mut usize, cols: usize) {
    if *word == 0 {
        return;
    }
    if *col + *word <= cols {
        *col += *word;
    } else {
        if *col > 0 {
            *lines += 1;
        }
        let mut rest = *word;
        while rest > cols {
            rest -= cols;
            *lines += 1;
        }
        *col = rest;
    }
    *word = 0;
}

impl Measure for WrapMeasure {
    fn measure(&mut self, text: &[u8]) -> i32 {
        self.count_lines(text) as i32 * self.line_height()
    }

    fn line_height(&self) -> i32 {
        (self.font.character_size.height + self.line_spacing) as i32
    }
}
