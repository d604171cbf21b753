//! PNG bar chart without text.
//!
//! The image holds the plot only: bars, gridlines and axes. The chart title,
//! y-axis label and bar labels ([`CHART_TITLE`](super::CHART_TITLE),
//! [`Y_AXIS_LABEL`](super::Y_AXIS_LABEL) and [`ProgressCounts::bars`]) are
//! rendered as HTML by the progress page around the image, so no font is
//! embedded here.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use super::{ChartRenderer, ProgressCounts};
use crate::error::{Error, Result};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([230, 230, 230]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
pub(crate) const BAR_COLOR: Rgb<u8> = Rgb([31, 119, 180]);

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 50;
const GRID_LINES: u32 = 5;
const TICK_LEN: u32 = 5;

const MIN_WIDTH: u32 = MARGIN_LEFT + MARGIN_RIGHT + 20;
const MIN_HEIGHT: u32 = MARGIN_TOP + MARGIN_BOTTOM + 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Two-bar chart rasterised into an RGB buffer and encoded as PNG.
/// Bars share one colour and are scaled against the larger count.
#[derive(Debug, Clone)]
pub struct BarChartRenderer {
    width: u32,
    height: u32,
}

impl Default for BarChartRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl BarChartRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(Error::Chart(format!(
                "chart must be at least {MIN_WIDTH}x{MIN_HEIGHT}, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    fn plot_area(&self) -> Rect {
        Rect {
            x0: MARGIN_LEFT,
            y0: MARGIN_TOP,
            x1: self.width - MARGIN_RIGHT,
            y1: self.height - MARGIN_BOTTOM,
        }
    }

    /// Pixel rectangles of the bars; `None` for a zero count.
    pub(crate) fn bar_rects(&self, counts: ProgressCounts) -> [Option<Rect>; 2] {
        let plot = self.plot_area();
        let plot_height = u64::from(plot.y1 - plot.y0);
        let bars = counts.bars();
        let scale_max = bars.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1) as u64;

        let slot = (plot.x1 - plot.x0) / bars.len() as u32;
        let bar_width = slot * 3 / 5;

        let mut rects = [None; 2];
        for (i, (_, count)) in bars.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let scaled = plot_height * (*count as u64) / scale_max;
            let height = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
            let x0 = plot.x0 + slot * i as u32 + (slot - bar_width) / 2;
            rects[i] = Some(Rect {
                x0,
                y0: plot.y1 - height,
                x1: x0 + bar_width,
                y1: plot.y1,
            });
        }
        rects
    }

    fn draw(&self, counts: ProgressCounts) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let plot = self.plot_area();

        let step = (plot.y1 - plot.y0) / GRID_LINES;
        for i in 1..=GRID_LINES {
            let y = plot.y1 - step * i;
            fill(&mut img, Rect { x0: plot.x0, y0: y, x1: plot.x1, y1: y + 1 }, GRID);
            fill(
                &mut img,
                Rect { x0: plot.x0 - TICK_LEN, y0: y, x1: plot.x0, y1: y + 1 },
                AXIS,
            );
        }

        for rect in self.bar_rects(counts).into_iter().flatten() {
            fill(&mut img, rect, BAR_COLOR);
        }

        // y axis, then x axis along the bottom of the plot
        fill(&mut img, Rect { x0: plot.x0 - 1, y0: plot.y0, x1: plot.x0, y1: plot.y1 + 1 }, AXIS);
        fill(&mut img, Rect { x0: plot.x0 - 1, y0: plot.y1, x1: plot.x1, y1: plot.y1 + 1 }, AXIS);

        img
    }
}

impl ChartRenderer for BarChartRenderer {
    fn render(&self, counts: ProgressCounts) -> Result<Vec<u8>> {
        let img = self.draw(counts);

        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| Error::Chart(e.to_string()))?;

        Ok(buf.into_inner())
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }
}

fn fill(img: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    let x1 = rect.x1.min(img.width());
    let y1 = rect.y1.min(img.height());
    for y in rect.y0..y1 {
        for x in rect.x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}
