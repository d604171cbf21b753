//! Progress chart: counts derived from the catalog, rendered as a PNG bar chart.

mod bar;

pub use bar::BarChartRenderer;

use crate::error::Result;
use crate::types::Video;

pub const CHART_TITLE: &str = "Video Progress";
pub const Y_AXIS_LABEL: &str = "Number of videos";
pub const WATCHED_LABEL: &str = "Watched";
pub const NOT_WATCHED_LABEL: &str = "Not Watched";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressCounts {
    pub watched: usize,
    pub not_watched: usize,
}

impl ProgressCounts {
    /// Counts for the progress page.
    ///
    /// Every catalog video is counted as watched; per-user progress rows are not
    /// consulted, so `not_watched` is always zero. The page labels itself a
    /// placeholder until the intended semantics are settled.
    #[must_use]
    pub fn from_catalog(videos: &[Video]) -> Self {
        let watched: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
        let watched_count = watched.len();

        Self {
            watched: watched_count,
            not_watched: videos.len().saturating_sub(watched_count),
        }
    }

    /// Bar values in display order, paired with their labels.
    #[must_use]
    pub fn bars(&self) -> [(&'static str, usize); 2] {
        [
            (WATCHED_LABEL, self.watched),
            (NOT_WATCHED_LABEL, self.not_watched),
        ]
    }
}

/// Turns counts into encoded image bytes.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, counts: ProgressCounts) -> Result<Vec<u8>>;

    /// MIME type of the bytes `render` returns.
    fn content_type(&self) -> &'static str;
}

/// Aggregates the catalog and renders it in one step.
pub fn render_progress(
    videos: &[Video],
    renderer: &dyn ChartRenderer,
) -> Result<(ProgressCounts, Vec<u8>)> {
    let counts = ProgressCounts::from_catalog(videos);
    let image = renderer.render(counts)?;
    Ok((counts, image))
}
