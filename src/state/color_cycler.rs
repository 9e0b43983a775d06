/// Default matplotlib property cycle.
pub const COLOR_PALETTE: [[u8; 4]; 10] = [
    [0x1f, 0x77, 0xb4, 255], // #1f77b4 blue
    [0xff, 0x7f, 0x0e, 255], // #ff7f0e orange
    [0x2c, 0xa0, 0x2c, 255], // #2ca02c green
    [0xd6, 0x27, 0x28, 255], // #d62728 red
    [0x94, 0x67, 0xbd, 255], // #9467bd purple
    [0x8c, 0x56, 0x4b, 255], // #8c564b brown
    [0xe3, 0x77, 0xc2, 255], // #e377c2 pink
    [0x7f, 0x7f, 0x7f, 255], // #7f7f7f gray
    [0xbc, 0xbd, 0x22, 255], // #bcbd22 olive
    [0x17, 0xbe, 0xcf, 255], // #17becf cyan
];

/// Hands out palette colors round-robin, starting at the first entry.
#[derive(Debug, Clone, Default)]
pub struct ColorCycler {
    index: usize,
}

impl ColorCycler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_color(&mut self) -> [u8; 4] {
        let color = COLOR_PALETTE[self.index];
        self.index = (self.index + 1) % COLOR_PALETTE.len();
        color
    }
}
