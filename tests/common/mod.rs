//! Shared fixtures: synthetic page painters and scripted decoders
#![allow(dead_code)]

use qr_locator::{
    DecodeError, DecodedSymbol, Decoder, InversionMode, PixelAccessError, PixelBuffer,
    PixelSource, Point, Region,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Version 1-M symbol for "4376471154038"
pub const GOLDEN_V1_M: [&str; 21] = [
    "#######.....#.#######",
    "#.....#..#....#.....#",
    "#.###.#...##..#.###.#",
    "#.###.#...#...#.###.#",
    "#.###.#..####.#.###.#",
    "#.....#.#.#...#.....#",
    "#######.#.#.#.#######",
    ".........#...........",
    "#..#.##.######.#.....",
    "###.#..##..#.#.#.##..",
    "#..#.####.##..###...#",
    "..#.#..#....#####....",
    "..#...##.#.#.###.##..",
    "........#.#..####.##.",
    "#######...###.#.####.",
    "#.....#.#.....##....#",
    "#.###.#..##.###..#.##",
    "#.###.#.#.#..####..##",
    "#.###.#..###.###.#..#",
    "#.....#..####..##..#.",
    "#######.###..#.###...",
];

/// Payload encoded by [`GOLDEN_V1_M`]
pub const GOLDEN_TEXT: &str = "4376471154038";

/// Mutable RGBA canvas, white unless painted
pub struct PageBuilder {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PageBuilder {
    pub fn white(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![255; (width * height * 4) as usize],
        }
    }

    pub fn set(&mut self, x: u32, y: u32, v: u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx..idx + 3].copy_from_slice(&[v, v, v]);
    }

    pub fn fill(mut self, x: u32, y: u32, w: u32, h: u32, v: u8) -> Self {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, v);
            }
        }
        self
    }

    /// `size` x `size` checkerboard of `module` px squares at (x, y),
    /// with the first module dark
    pub fn checker(mut self, x: u32, y: u32, size: u32, module: u32) -> Self {
        for yy in 0..size {
            for xx in 0..size {
                if ((xx / module) + (yy / module)) % 2 == 0 {
                    self.set(x + xx, y + yy, 0);
                }
            }
        }
        self
    }

    /// Render a module grid such as [`GOLDEN_V1_M`] at (x, y)
    pub fn symbol(mut self, x: u32, y: u32, rows: &[&str], module: u32) -> Self {
        for (my, row) in rows.iter().enumerate() {
            for (mx, cell) in row.bytes().enumerate() {
                if cell == b'#' {
                    let px = x + mx as u32 * module;
                    let py = y + my as u32 * module;
                    self = self.fill(px, py, module, module, 0);
                }
            }
        }
        self
    }

    pub fn build(self) -> PixelBuffer {
        PixelBuffer::new(self.width, self.height, self.pixels).unwrap()
    }
}

/// Decoder double that "decodes" the bounding box of dark pixels
///
/// Succeeds only when the dark box is fully inside the window (not touching
/// an edge), the window is at least `min_window` px wide, and the mode is
/// accepted. Reports the box corners as the quad.
pub struct BoxDecoder {
    pub payload: String,
    pub min_window: u32,
    pub only_mode: Option<InversionMode>,
    calls: AtomicUsize,
    log: Mutex<Vec<(u32, u32, InversionMode)>>,
}

impl BoxDecoder {
    pub fn new(payload: &str) -> Self {
        Self {
            payload: payload.to_string(),
            min_window: 0,
            only_mode: None,
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (window width, window height, mode) per call
    pub fn log(&self) -> Vec<(u32, u32, InversionMode)> {
        self.log.lock().unwrap().clone()
    }

    pub fn modes(&self) -> Vec<InversionMode> {
        self.log().into_iter().map(|(_, _, m)| m).collect()
    }
}

impl Decoder for BoxDecoder {
    fn decode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        mode: InversionMode,
    ) -> Result<Option<DecodedSymbol>, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push((width, height, mode));
        if self.only_mode.is_some_and(|m| m != mode) || width < self.min_window {
            return Ok(None);
        }

        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
        let mut any = false;
        for y in 0..height {
            for x in 0..width {
                let idx = ((y * width + x) * 4) as usize;
                if pixels[idx] < 128 {
                    any = true;
                    x0 = x0.min(x);
                    y0 = y0.min(y);
                    x1 = x1.max(x + 1);
                    y1 = y1.max(y + 1);
                }
            }
        }
        if !any || x0 == 0 || y0 == 0 || x1 >= width || y1 >= height {
            return Ok(None);
        }
        let (x0, y0, x1, y1) = (x0 as f32, y0 as f32, x1 as f32, y1 as f32);
        Ok(Some(DecodedSymbol {
            text: self.payload.clone(),
            quad: [
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
        }))
    }
}

/// One scripted response of [`ScriptedDecoder`]
#[derive(Clone)]
pub enum Reply {
    Found(&'static str),
    Nothing,
    Fail(&'static str),
    Panic(&'static str),
}

/// Replays replies in order, then returns `Ok(None)`
pub struct ScriptedDecoder {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl ScriptedDecoder {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Decoder for ScriptedDecoder {
    fn decode(
        &self,
        _pixels: &[u8],
        width: u32,
        height: u32,
        _mode: InversionMode,
    ) -> Result<Option<DecodedSymbol>, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply.unwrap_or(Reply::Nothing) {
            Reply::Found(text) => Ok(Some(DecodedSymbol {
                text: text.to_string(),
                quad: [
                    Point::new(0.0, 0.0),
                    Point::new(width as f32, 0.0),
                    Point::new(width as f32, height as f32),
                    Point::new(0.0, height as f32),
                ],
            })),
            Reply::Nothing => Ok(None),
            Reply::Fail(reason) => Err(DecodeError::Failed(reason.to_string())),
            Reply::Panic(msg) => panic!("{}", msg),
        }
    }
}

/// Pixel source that refuses to read regions with a given label's rectangle,
/// or refuses everything
pub struct FlakySource {
    pub page: PixelBuffer,
    pub deny: Option<Region>,
    pub deny_all: bool,
}

impl PixelSource for FlakySource {
    fn dimensions(&self) -> (u32, u32) {
        (self.page.width(), self.page.height())
    }

    fn read_region(&self, region: &Region) -> Result<PixelBuffer, PixelAccessError> {
        let denied = self.deny.as_ref().is_some_and(|d| {
            (d.x, d.y, d.width, d.height) == (region.x, region.y, region.width, region.height)
        });
        if self.deny_all || denied {
            return Err(PixelAccessError::Source("tainted canvas".into()));
        }
        self.page.crop(region)
    }
}

/// Assert every quad corner lies within `[lo - tol, hi + tol]` on both axes
pub fn assert_quad_within(quad: &[Point; 4], lo: f32, hi: f32, tol: f32) {
    for p in quad {
        assert!(
            p.x >= lo - tol && p.x <= hi + tol && p.y >= lo - tol && p.y <= hi + tol,
            "corner ({}, {}) outside [{}, {}] ± {}",
            p.x,
            p.y,
            lo,
            hi,
            tol
        );
    }
}
