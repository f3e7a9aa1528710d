//! Chart widget commands.
//!
//! # Advanced Chart
//!
//! Line chart with named series. [`add_point`](Widget::add_point) numbers
//! points itself: each widget keeps an x counter that starts at 0, advances
//! on every auto-numbered point and is reset by [`clear`](Widget::clear).
//!
//! # Bar Chart
//!
//! Up to [`BAR_COUNT`] bars addressed by index or bar id.

// ============================================================================
// Imports
// ============================================================================

use super::{AdvancedChart, BarChart, Color, Widget};
use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Number of bars sent by [`set_values`](Widget::set_values).
pub const BAR_COUNT: usize = 8;

/// Series used by [`add_value`](Widget::add_value).
pub const DEFAULT_SERIES: &str = "default";

// ============================================================================
// Series Style
// ============================================================================

/// Line style for one chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    /// Line color.
    pub line_color: Color,
    /// Draw a marker at each point.
    pub show_points: bool,
    /// Fill the area under the line.
    pub show_fill: bool,
}

impl SeriesStyle {
    /// Creates a plain line style.
    #[inline]
    #[must_use]
    pub const fn new(line_color: Color) -> Self {
        Self {
            line_color,
            show_points: false,
            show_fill: false,
        }
    }

    /// Enables point markers.
    #[inline]
    #[must_use]
    pub const fn with_points(mut self) -> Self {
        self.show_points = true;
        self
    }

    /// Enables area fill.
    #[inline]
    #[must_use]
    pub const fn with_fill(mut self) -> Self {
        self.show_fill = true;
        self
    }
}

// ============================================================================
// Advanced Chart Commands
// ============================================================================

impl Widget<'_, AdvancedChart> {
    /// Appends a point with an auto-numbered x.
    ///
    /// The counter advances even when sending fails, so x stays unique.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn add_point(&mut self, series_id: &str, y: f32) -> Result<&mut Self> {
        let x = self.entry_mut().take_point();
        self.send_with("adddatapoint", |p| {
            p.str("seriesId", series_id).int("x", x).float("y", y);
        })
    }

    /// Appends a point with an explicit x. The x counter is not touched.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn add_point_at(&mut self, series_id: &str, x: f32, y: f32) -> Result<&mut Self> {
        self.send_with("adddatapoint", |p| {
            p.str("seriesId", series_id).float("x", x).float("y", y);
        })
    }

    /// Appends an auto-numbered point to the default series.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn add_value(&mut self, y: f32) -> Result<&mut Self> {
        self.add_point(DEFAULT_SERIES, y)
    }

    /// Removes every point of one series.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn clear_series(&mut self, series_id: &str) -> Result<&mut Self> {
        self.send_with("clearseriesdata", |p| {
            p.str("seriesId", series_id);
        })
    }

    /// Removes every point and restarts x numbering at 0.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn clear(&mut self) -> Result<&mut Self> {
        self.entry_mut().reset_points();
        self.send("clearalldata", None)
    }

    /// Restarts x numbering at 0 without sending anything.
    pub fn reset_index(&mut self) -> &mut Self {
        self.entry_mut().reset_points();
        self
    }

    /// Returns the x the next auto-numbered point will get.
    #[must_use]
    pub fn next_index(&self) -> i32 {
        self.entry.next_point()
    }

    /// Declares a series.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn add_series(
        &mut self,
        series_id: &str,
        label: &str,
        line_color: Option<Color>,
    ) -> Result<&mut Self> {
        self.send_with("addseries", |p| {
            p.str("seriesId", series_id).str("label", label);
            if let Some(color) = line_color {
                p.color("lineColor", color);
            }
        })
    }

    /// Changes how a series is drawn.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_series_style(&mut self, series_id: &str, style: SeriesStyle) -> Result<&mut Self> {
        self.send_with("updateseriesstyle", |p| {
            p.str("seriesId", series_id)
                .color("lineColor", style.line_color)
                .bool("showPoints", style.show_points)
                .bool("showFill", style.show_fill);
        })
    }

    /// Caps the number of points kept per series.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_max_points(&mut self, max_points: i32) -> Result<&mut Self> {
        self.send_with("setmaxdatapoints", |p| {
            p.int("maxDataPoints", max_points);
        })
    }

    /// Sets the chart title and axis labels.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_labels(&mut self, title: &str, x_label: &str, y_label: &str) -> Result<&mut Self> {
        self.send_with("updateaxislabels", |p| {
            p.str("chartTitle", title)
                .str("xAxisLabel", x_label)
                .str("yAxisLabel", y_label);
        })
    }

    /// Fixes the y axis range and disables autoscale.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_y_range(&mut self, y_min: f32, y_max: f32) -> Result<&mut Self> {
        self.send_with("updaterange", |p| {
            p.float("yMin", y_min)
                .float("yMax", y_max)
                .bool("autoScale", false);
        })
    }

    /// Enables or disables y autoscale.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_auto_scale(&mut self, enabled: bool) -> Result<&mut Self> {
        self.send_with("updaterange", |p| {
            p.bool("autoScale", enabled);
        })
    }
}

// ============================================================================
// Bar Chart Commands
// ============================================================================

impl Widget<'_, BarChart> {
    /// Sets one bar by position.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_bar(&mut self, index: i32, value: f32) -> Result<&mut Self> {
        self.send_with("setbar", |p| {
            p.int("index", index).float("value", value);
        })
    }

    /// Sets one bar by id.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_bar_by_id(&mut self, bar_id: &str, value: f32) -> Result<&mut Self> {
        self.send_with("setbar", |p| {
            p.str("barId", bar_id).float("value", value);
        })
    }

    /// Sets all bars at once.
    ///
    /// Always sends [`BAR_COUNT`] values: missing ones are 0 and extra ones
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_values(&mut self, values: &[f32]) -> Result<&mut Self> {
        let mut bars = [0.0_f32; BAR_COUNT];
        for (bar, value) in bars.iter_mut().zip(values) {
            *bar = *value;
        }
        self.send_with("setvalues", |p| {
            p.floats("values", &bars);
        })
    }

    /// Zeroes every bar.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn clear(&mut self) -> Result<&mut Self> {
        self.send("clear", None)
    }
}

// ============================================================================
// Tests
// ============================================================================
