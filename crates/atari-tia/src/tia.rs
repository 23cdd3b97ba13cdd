//! The chip: write dispatch, per-line latches and the line renderer.

use emu_core::{Observable, Value};

use crate::objects::{Layout, Object, ball_width, missile_width};
use crate::palette;
use crate::playfield::{Playfield, WIDTH};
use crate::registers::{
    self, AUDC0, AUDV1, COLUBK, COLUP0, COLUP1, COLUPF, CTRLPF, CXCLR, CXM0P, CXPPMM, ENABL,
    ENAM0, ENAM1, GRP0, GRP1, HMBL, HMCLR, HMM0, HMM1, HMOVE, HMP0, HMP1, Latch, NUSIZ0, NUSIZ1,
    PF0, PF1, PF2, REFP0, REFP1, RESBL, RESM0, RESM1, RESMP0, RESMP1, RESP0, RESP1, RSYNC,
    VBLANK, VDELBL, VDELP0, VSYNC, WSYNC, ctrlpf,
};
use crate::{HBLANK_CLOCKS, LINE_CLOCKS, TiaBus};

/// Which scanlines end up in the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConfig {
    /// First line counter value that is rendered.
    pub first_visible_line: u16,
    /// Number of rendered lines, and the framebuffer height.
    pub visible_lines: u16,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            first_visible_line: 40,
            visible_lines: 192,
        }
    }
}

/// Line the counter restarts from after vertical sync.
const LINE_AFTER_VSYNC: u16 = 3;

/// Players' output latch sits five pixels after the reset point.
const PLAYER_RESET_DELAY: i16 = 5;

/// Missile placed at the middle of its player by RESMP.
const RESMP_OFFSET: i16 = 4;

/// VBLANK bit that blanks the beam.
const VBLANK_ON: u8 = 0x02;

/// Bit that marks RESMP as engaged.
const RESMP_LOCK: u8 = 0x02;

/// REFPx bit that mirrors the player.
const REFLECT_PLAYER: u8 = 0x08;

pub struct Tia {
    config: VideoConfig,
    /// Scanline counter since the last vertical sync.
    line: u16,
    /// Set on the VSYNC falling edge, cleared by the driver.
    frame_complete: bool,
    /// Last VSYNC value, for falling-edge detection.
    vsync: u8,
    /// Background colour changes this line: (pixel offset, colour).
    background: Vec<(u16, u8)>,
    playfield: Playfield,
    players: [Object; 2],
    missiles: [Object; 2],
    ball: Object,
    /// RGB24, `WIDTH` x `config.visible_lines`.
    framebuffer: Vec<u8>,
}

/// Clock to object pixel, or pixel 1 if the beam is still in blank.
fn reset_position(clock: u16, delay: i16) -> i16 {
    if clock >= HBLANK_CLOCKS {
        (clock - HBLANK_CLOCKS) as i16 + delay
    } else {
        1
    }
}

fn overlaps(a: &[bool; WIDTH], b: &[bool; WIDTH]) -> bool {
    a.iter().zip(b).any(|(&x, &y)| x && y)
}

impl Tia {
    #[must_use]
    pub fn new(config: VideoConfig) -> Self {
        let size = WIDTH * usize::from(config.visible_lines) * 3;
        Self {
            config,
            line: 0,
            frame_complete: false,
            vsync: 0,
            background: vec![(0, 0)],
            playfield: Playfield::default(),
            players: Default::default(),
            missiles: Default::default(),
            ball: Object::default(),
            framebuffer: vec![0; size],
        }
    }

    /// Current scanline counter.
    #[must_use]
    pub fn line(&self) -> u16 {
        self.line
    }

    /// Clear and return the frame-complete flag.
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    /// RGB24 frame, rows of `WIDTH` pixels.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        WIDTH as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        u32::from(self.config.visible_lines)
    }

    /// One rendered row, or `None` past the bottom of the frame.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        self.framebuffer.chunks_exact(WIDTH * 3).nth(y)
    }

    /// Background colour timeline accumulated so far on this line.
    #[must_use]
    pub fn background(&self) -> &[(u16, u8)] {
        &self.background
    }

    #[must_use]
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    #[must_use]
    pub fn player(&self, n: usize) -> &Object {
        &self.players[n]
    }

    #[must_use]
    pub fn missile(&self, n: usize) -> &Object {
        &self.missiles[n]
    }

    #[must_use]
    pub fn ball(&self) -> &Object {
        &self.ball
    }

    /// Handle a write to `register`. The value is read back from memory.
    pub fn write<M: TiaBus>(&mut self, register: u16, memory: &mut M) {
        let value = memory.peek(register);
        let clock = memory.line_cycle();
        log::trace!("TIA ${register:02X} <- ${value:02X} @ line {} clock {clock}", self.line);

        match register {
            VSYNC => {
                if value == 0 && self.vsync != 0 {
                    self.end_frame();
                }
                self.vsync = value;
            }
            WSYNC => memory.set_line_cycle(LINE_CLOCKS),
            RSYNC => memory.set_line_cycle(LINE_CLOCKS - 3),
            COLUBK => {
                if clock >= HBLANK_CLOCKS {
                    self.background.push((clock - HBLANK_CLOCKS, value));
                } else {
                    self.background[0] = (0, value);
                }
            }
            CTRLPF => self.playfield.write_control(value, clock),
            PF0 | PF1 | PF2 => self.playfield.write(register, value, clock),
            RESP0 => self.players[0].set_position(reset_position(clock, PLAYER_RESET_DELAY)),
            RESP1 => self.players[1].set_position(reset_position(clock, PLAYER_RESET_DELAY)),
            RESM0 => self.missiles[0].set_position(reset_position(clock, 0)),
            RESM1 => self.missiles[1].set_position(reset_position(clock, 0)),
            RESBL => self.ball.set_position(reset_position(clock, 0)),
            GRP0 => {
                self.players[0].latch(value, clock, Layout::from_nusiz(memory.peek(NUSIZ0)));
            }
            GRP1 => {
                self.players[1].latch(value, clock, Layout::from_nusiz(memory.peek(NUSIZ1)));
            }
            ENAM0 => {
                self.missiles[0].latch(value, clock, Layout::from_nusiz(memory.peek(NUSIZ0)));
            }
            ENAM1 => {
                self.missiles[1].latch(value, clock, Layout::from_nusiz(memory.peek(NUSIZ1)));
            }
            ENABL => {
                self.ball.latch(value, clock, Layout::SINGLE);
            }
            RESMP0 | RESMP1 => {
                let n = usize::from(register == RESMP1);
                if value & RESMP_LOCK != 0 {
                    let centre = self.players[n].position() + RESMP_OFFSET;
                    self.missiles[n].set_position(centre);
                }
            }
            HMOVE => {
                self.players[0].apply_motion(memory.peek(HMP0));
                self.players[1].apply_motion(memory.peek(HMP1));
                self.missiles[0].apply_motion(memory.peek(HMM0));
                self.missiles[1].apply_motion(memory.peek(HMM1));
                self.ball.apply_motion(memory.peek(HMBL));
            }
            HMCLR => {
                for reg in HMP0..=HMBL {
                    memory.poke(reg, 0);
                }
            }
            CXCLR => {
                for reg in CXM0P..=CXPPMM {
                    memory.poke(reg, 0);
                }
            }
            // Sampled at end of line, or audio/delay registers kept only
            // as stored values.
            VBLANK | NUSIZ0 | NUSIZ1 | COLUP0 | COLUP1 | COLUPF | REFP0 | REFP1
            | AUDC0..=AUDV1 | HMP0..=HMBL | VDELP0..=VDELBL => {}
            _ => log::warn!("write to unmapped TIA register ${register:02X}"),
        }
    }

    fn end_frame(&mut self) {
        self.frame_complete = true;
        log::debug!("vertical sync at line {}", self.line);
        self.line = LINE_AFTER_VSYNC;
    }

    /// Row of the framebuffer the current line maps to, if visible.
    fn visible_row(&self) -> Option<usize> {
        let first = self.config.first_visible_line;
        let row = self.line.checked_sub(first)?;
        (row < self.config.visible_lines).then_some(usize::from(row))
    }

    /// Commit the current line and prepare the next.
    pub fn line_update<M: TiaBus>(&mut self, memory: &mut M) {
        if let Some(row) = self.visible_row() {
            if memory.peek(VBLANK) & VBLANK_ON != 0 {
                let start = row * WIDTH * 3;
                self.framebuffer[start..start + WIDTH * 3].fill(0);
            } else {
                self.render_row(row, memory);
            }
        }

        memory.set_line_cycle(memory.line_cycle() % LINE_CLOCKS);
        self.relatch(memory);
        self.line = self.line.saturating_add(1);
    }

    /// Load next-line latches from the persistent register values.
    fn relatch<M: TiaBus>(&mut self, memory: &M) {
        self.background.clear();
        self.background.push((0, memory.peek(COLUBK)));
        self.playfield.relatch(
            memory.peek(PF0),
            memory.peek(PF1),
            memory.peek(PF2),
            memory.peek(CTRLPF),
        );
        self.players[0].start_line(memory.peek(GRP0));
        self.players[1].start_line(memory.peek(GRP1));
        self.missiles[0].start_line(memory.peek(ENAM0));
        self.missiles[1].start_line(memory.peek(ENAM1));
        self.ball.start_line(memory.peek(ENABL));
    }

    fn render_row<M: TiaBus>(&mut self, row: usize, memory: &mut M) {
        let nusiz = [memory.peek(NUSIZ0), memory.peek(NUSIZ1)];
        let refp = [memory.peek(REFP0), memory.peek(REFP1)];
        let resmp = [memory.peek(RESMP0), memory.peek(RESMP1)];
        let control = memory.peek(CTRLPF);

        let pf = self.playfield.mask();
        let p: [[bool; WIDTH]; 2] = std::array::from_fn(|n| {
            self.players[n].player_mask(nusiz[n], refp[n] & REFLECT_PLAYER != 0)
        });
        let m: [[bool; WIDTH]; 2] = std::array::from_fn(|n| {
            if resmp[n] & RESMP_LOCK != 0 {
                [false; WIDTH]
            } else {
                self.missiles[n]
                    .bar_mask(Layout::from_nusiz(nusiz[n]), missile_width(nusiz[n]))
            }
        });
        let bl = self.ball.bar_mask(Layout::SINGLE, ball_width(control));

        record_collisions(memory, &p, &m, &bl, &pf);

        let colup = [memory.peek(COLUP0), memory.peek(COLUP1)];
        let colupf = memory.peek(COLUPF);
        let line = &mut self.framebuffer[row * WIDTH * 3..(row + 1) * WIDTH * 3];

        for (i, &(start, colour)) in self.background.iter().enumerate() {
            let end = self.background.get(i + 1).map_or(WIDTH, |next| usize::from(next.0));
            let start = usize::from(start).min(WIDTH);
            paint_span(line, start, end.min(WIDTH), colour);
        }

        let score = control & ctrlpf::SCORE != 0;
        let pf_colour = |x: usize| match (score, x < WIDTH / 2) {
            (true, true) => colup[0],
            (true, false) => colup[1],
            (false, _) => colupf,
        };

        let paint_playfield = |line: &mut [u8]| {
            paint_mask(line, &pf, &pf_colour);
            paint_mask(line, &bl, |_| colupf);
        };
        let paint_objects = |line: &mut [u8]| {
            paint_mask(line, &m[1], |_| colup[1]);
            paint_mask(line, &m[0], |_| colup[0]);
            paint_mask(line, &p[1], |_| colup[1]);
            paint_mask(line, &p[0], |_| colup[0]);
        };

        if control & ctrlpf::PRIORITY != 0 {
            paint_objects(line);
            paint_playfield(line);
        } else {
            paint_playfield(line);
            paint_objects(line);
        }
    }
}

/// Set the sticky latch bit for every overlapping pair.
fn record_collisions<M: TiaBus>(
    memory: &mut M,
    p: &[[bool; WIDTH]; 2],
    m: &[[bool; WIDTH]; 2],
    bl: &[bool; WIDTH],
    pf: &[bool; WIDTH],
) {
    let pairs: [(&[bool; WIDTH], &[bool; WIDTH], Latch); 15] = [
        (&m[0], &p[1], registers::M0_P1),
        (&m[0], &p[0], registers::M0_P0),
        (&m[1], &p[0], registers::M1_P0),
        (&m[1], &p[1], registers::M1_P1),
        (&p[0], pf, registers::P0_PF),
        (&p[0], bl, registers::P0_BL),
        (&p[1], pf, registers::P1_PF),
        (&p[1], bl, registers::P1_BL),
        (&m[0], pf, registers::M0_PF),
        (&m[0], bl, registers::M0_BL),
        (&m[1], pf, registers::M1_PF),
        (&m[1], bl, registers::M1_BL),
        (bl, pf, registers::BL_PF),
        (&p[0], &p[1], registers::P0_P1),
        (&m[0], &m[1], registers::M0_M1),
    ];
    for (a, b, latch) in pairs {
        if overlaps(a, b) {
            let current = memory.peek(latch.address);
            memory.poke(latch.address, current | latch.bit);
        }
    }
}

fn paint_span(line: &mut [u8], start: usize, end: usize, colour: u8) {
    let rgb = palette::rgb(colour);
    for x in start..end {
        line[x * 3..x * 3 + 3].copy_from_slice(&rgb);
    }
}

fn paint_mask(line: &mut [u8], mask: &[bool; WIDTH], colour: impl Fn(usize) -> u8) {
    for (x, _) in mask.iter().enumerate().filter(|(_, on)| **on) {
        line[x * 3..x * 3 + 3].copy_from_slice(&palette::rgb(colour(x)));
    }
}

const QUERY_PATHS: &[&str] = &[
    "line",
    "vsync",
    "p0.x",
    "p1.x",
    "m0.x",
    "m1.x",
    "bl.x",
    "pf.reflect",
];

impl Observable for Tia {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "line" => Some(self.line.into()),
            "vsync" => Some(self.vsync.into()),
            "p0.x" => Some(self.players[0].position().into()),
            "p1.x" => Some(self.players[1].position().into()),
            "m0.x" => Some(self.missiles[0].position().into()),
            "m1.x" => Some(self.missiles[1].position().into()),
            "bl.x" => Some(self.ball.position().into()),
            "pf.reflect" => Some(self.playfield.reflect.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat register file plus a beam counter.
    struct TestBus {
        bytes: Vec<u8>,
        line_cycle: u16,
    }

    impl TestBus {
        fn new() -> Self {
            Self {
                bytes: vec![0; 0x200],
                line_cycle: 0,
            }
        }
    }

    impl TiaBus for TestBus {
        fn peek(&self, address: u16) -> u8 {
            self.bytes[usize::from(address)]
        }

        fn poke(&mut self, address: u16, value: u8) {
            self.bytes[usize::from(address)] = value;
        }

        fn line_cycle(&self) -> u16 {
            self.line_cycle
        }

        fn set_line_cycle(&mut self, clocks: u16) {
            self.line_cycle = clocks;
        }
    }

    fn write_at(tia: &mut Tia, memory: &mut TestBus, register: u16, value: u8, clock: u16) {
        memory.poke(register, value);
        memory.set_line_cycle(clock);
        tia.write(register, memory);
    }

    /// One hidden line followed by one visible line.
    fn one_line() -> Tia {
        Tia::new(VideoConfig {
            first_visible_line: 1,
            visible_lines: 1,
        })
    }

    /// Latch from `setup` on a hidden line, then render one visible line.
    fn render(setup: impl FnOnce(&mut TestBus)) -> (Tia, TestBus) {
        let mut tia = one_line();
        let mut memory = TestBus::new();
        setup(&mut memory);
        tia.line_update(&mut memory);
        tia.line_update(&mut memory);
        (tia, memory)
    }

    fn pixel(tia: &Tia, x: usize) -> [u8; 3] {
        let row = tia.row(0).expect("row 0 is rendered");
        [row[x * 3], row[x * 3 + 1], row[x * 3 + 2]]
    }

    fn latches(memory: &TestBus) -> Vec<(u16, u8)> {
        (CXM0P..=CXPPMM)
            .map(|reg| (reg, memory.peek(reg)))
            .filter(|&(_, value)| value != 0)
            .collect()
    }

    #[test]
    fn background_timeline_records_visible_writes() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, COLUBK, 0x1E, 100);
        assert_eq!(tia.background(), &[(0, 0x00), (32, 0x1E)]);

        write_at(&mut tia, &mut memory, COLUBK, 0x44, 20);
        assert_eq!(tia.background()[0], (0, 0x44), "hblank write replaces start colour");
    }

    #[test]
    fn mid_line_background_write_splits_rendered_row() {
        let mut tia = Tia::new(VideoConfig {
            first_visible_line: 0,
            visible_lines: 1,
        });
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, COLUBK, 0x1E, 100);
        tia.line_update(&mut memory);

        assert_eq!(pixel(&tia, 31), palette::rgb(0x00));
        assert_eq!(pixel(&tia, 32), palette::rgb(0x1E));
        assert_eq!(pixel(&tia, 159), palette::rgb(0x1E));
    }

    #[test]
    fn mid_line_grp0_write_changes_later_copies_only() {
        let mut tia = one_line();
        let mut memory = TestBus::new();
        memory.poke(NUSIZ0, 0x03);
        memory.poke(COLUP0, 0x40);
        memory.poke(GRP0, 0xFF);
        write_at(&mut tia, &mut memory, RESP0, 0, 100);
        tia.line_update(&mut memory);

        // Copies at 37, 53 and 69; the beam is past the first at clock 110.
        write_at(&mut tia, &mut memory, GRP0, 0x00, 110);
        tia.line_update(&mut memory);

        let player = palette::rgb(0x40);
        let background = palette::rgb(0x00);
        assert!((37..45).all(|x| pixel(&tia, x) == player));
        assert_eq!(pixel(&tia, 36), background);
        assert_eq!(pixel(&tia, 45), background);
        assert!((53..61).all(|x| pixel(&tia, x) == background));
        assert!((69..77).all(|x| pixel(&tia, x) == background));
    }

    #[test]
    fn wsync_and_rsync_move_the_beam() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, WSYNC, 0, 40);
        assert_eq!(memory.line_cycle(), 228);
        write_at(&mut tia, &mut memory, RSYNC, 0, 40);
        assert_eq!(memory.line_cycle(), 225);
    }

    #[test]
    fn reset_strobes_position_objects() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, RESP0, 0, 100);
        assert_eq!(tia.player(0).position(), 37);
        write_at(&mut tia, &mut memory, RESM1, 0, 100);
        assert_eq!(tia.missile(1).position(), 32);
        write_at(&mut tia, &mut memory, RESBL, 0, 30);
        assert_eq!(tia.ball().position(), 1, "strobe during blank");
    }

    #[test]
    fn late_reset_strobe_wraps_player() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, RESP0, 0, 226);
        assert_eq!(tia.player(0).position(), 3);
    }

    #[test]
    fn vsync_falling_edge_ends_frame() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        for _ in 0..10 {
            tia.line_update(&mut memory);
        }
        write_at(&mut tia, &mut memory, VSYNC, 0x02, 0);
        assert!(!tia.take_frame_complete());
        write_at(&mut tia, &mut memory, VSYNC, 0x00, 0);
        assert_eq!(tia.line(), 3);
        assert!(tia.take_frame_complete());
        assert!(!tia.take_frame_complete());

        write_at(&mut tia, &mut memory, VSYNC, 0x00, 0);
        assert!(!tia.take_frame_complete(), "zero to zero is not an edge");
    }

    #[test]
    fn hmove_applies_and_hmclr_clears_motion() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, RESP0, 0, 100);
        memory.poke(HMP0, 0x20);
        memory.poke(HMBL, 0xF0);
        write_at(&mut tia, &mut memory, HMOVE, 0, 0);
        assert_eq!(tia.player(0).position(), 35);
        assert_eq!(tia.ball().position(), 1);

        write_at(&mut tia, &mut memory, HMCLR, 0, 0);
        assert!((HMP0..=HMBL).all(|reg| memory.peek(reg) == 0));
    }

    #[test]
    fn hmove_positive_nibble_moves_left() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, RESP0, 0, 100);
        memory.poke(HMP0, 0x70);
        write_at(&mut tia, &mut memory, HMOVE, 0, 0);
        assert_eq!(tia.player(0).position(), 30);
    }

    #[test]
    fn hmove_strobed_every_line_keeps_positions_on_screen() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        memory.poke(GRP0, 0xFF);
        memory.poke(ENAM1, 0x02);
        memory.poke(HMP0, 0x70);
        memory.poke(HMM1, 0x80);
        for _ in 0..5000 {
            write_at(&mut tia, &mut memory, WSYNC, 0, 0);
            write_at(&mut tia, &mut memory, HMOVE, 0, 0);
            tia.line_update(&mut memory);
            assert!((0..WIDTH as i16).contains(&tia.player(0).position()));
            assert!((0..WIDTH as i16).contains(&tia.missile(1).position()));
        }
        // -35000 and +40000, both mod 160.
        assert_eq!(tia.player(0).position(), 40);
        assert_eq!(tia.missile(1).position(), 0);
    }

    #[test]
    fn resmp_centres_missile_on_player() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, RESP0, 0, 100);
        write_at(&mut tia, &mut memory, RESMP0, 0x02, 0);
        assert_eq!(tia.missile(0).position(), 41);
    }

    #[test]
    fn resmp_wraps_past_right_edge() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        write_at(&mut tia, &mut memory, RESP1, 0, 225);
        assert_eq!(tia.player(1).position(), 2);
        memory.poke(HMP1, 0x30);
        write_at(&mut tia, &mut memory, HMOVE, 0, 0);
        assert_eq!(tia.player(1).position(), 159);
        write_at(&mut tia, &mut memory, RESMP1, 0x02, 0);
        assert_eq!(tia.missile(1).position(), 3);
    }

    #[test]
    fn colours_come_from_the_palette() {
        let (tia, _) = render(|memory| memory.poke(COLUBK, 0x1E));
        assert_eq!(pixel(&tia, 0), palette::rgb(0x1E));
        assert_eq!(pixel(&tia, 159), palette::rgb(0x1E));
    }

    #[test]
    fn score_mode_colours_playfield_halves() {
        let (tia, _) = render(|memory| {
            memory.poke(PF1, 0x80);
            memory.poke(CTRLPF, ctrlpf::SCORE);
            memory.poke(COLUP0, 0x40);
            memory.poke(COLUP1, 0x80);
            memory.poke(COLUPF, 0x0E);
        });
        assert_eq!(pixel(&tia, 16), palette::rgb(0x40));
        assert_eq!(pixel(&tia, 96), palette::rgb(0x80));
        assert_eq!(pixel(&tia, 20), palette::rgb(0x00));
    }

    #[test]
    fn playfield_priority_paints_over_players() {
        let setup = |control: u8| {
            move |memory: &mut TestBus| {
                memory.poke(PF0, 0x10);
                memory.poke(GRP0, 0x80);
                memory.poke(COLUP0, 0x40);
                memory.poke(COLUPF, 0x80);
                memory.poke(CTRLPF, control);
            }
        };
        let (tia, _) = render(setup(0));
        assert_eq!(pixel(&tia, 0), palette::rgb(0x40));
        let (tia, _) = render(setup(ctrlpf::PRIORITY));
        assert_eq!(pixel(&tia, 0), palette::rgb(0x80));
    }

    #[test]
    fn overlap_sets_sticky_collision_until_cxclr() {
        let (mut tia, mut memory) = render(|memory| {
            memory.poke(PF0, 0x10);
            memory.poke(GRP0, 0xFF);
        });
        assert_eq!(latches(&memory), [(registers::CXP0FB, 0x80)]);

        memory.poke(GRP0, 0x00);
        tia.line_update(&mut memory);
        assert_eq!(memory.peek(registers::CXP0FB), 0x80, "sticky");

        write_at(&mut tia, &mut memory, CXCLR, 0, 0);
        assert!(latches(&memory).is_empty());
    }

    /// One-pixel player at 37 and a one-pixel M1 placed by `missile_clock`.
    fn single_pixel_pair(missile_clock: u16) -> (Tia, TestBus) {
        let mut tia = one_line();
        let mut memory = TestBus::new();
        memory.poke(GRP0, 0x80);
        memory.poke(ENAM1, 0x02);
        write_at(&mut tia, &mut memory, RESP0, 0, 100);
        write_at(&mut tia, &mut memory, RESM1, 0, missile_clock);
        tia.line_update(&mut memory);
        tia.line_update(&mut memory);
        (tia, memory)
    }

    #[test]
    fn single_pixel_missile_on_player_sets_only_m1_p0() {
        let (tia, memory) = single_pixel_pair(105);
        assert_eq!(tia.player(0).position(), 37);
        assert_eq!(tia.missile(1).position(), 37);
        assert_eq!(latches(&memory), [(registers::CXM1P, 0x80)]);

        let (tia, memory) = single_pixel_pair(106);
        assert_eq!(tia.missile(1).position(), 38);
        assert!(latches(&memory).is_empty(), "adjacent pixels do not collide");
    }

    #[test]
    fn vblank_blacks_out_row_without_collisions() {
        let (tia, memory) = render(|memory| {
            memory.poke(COLUBK, 0x1E);
            memory.poke(PF0, 0x10);
            memory.poke(GRP0, 0xFF);
            memory.poke(VBLANK, 0x02);
        });
        assert!(tia.row(0).expect("row 0 is rendered").iter().all(|&b| b == 0));
        assert!(latches(&memory).is_empty());
    }

    #[test]
    fn row_past_the_frame_is_none() {
        let tia = one_line();
        assert_eq!(tia.row(0).map(<[u8]>::len), Some(WIDTH * 3));
        assert!(tia.row(1).is_none());
    }

    #[test]
    fn line_update_wraps_counter_and_advances_line() {
        let mut tia = Tia::new(VideoConfig::default());
        let mut memory = TestBus::new();
        memory.set_line_cycle(231);
        tia.line_update(&mut memory);
        assert_eq!(memory.line_cycle(), 3);
        assert_eq!(tia.line(), 1);
    }
}
