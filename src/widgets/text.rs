//! Text label commands.

use super::{Color, Text, Widget};
use crate::error::Result;

impl Widget<'_, Text> {
    /// Replaces the label text.
    ///
    /// Quotes, backslashes and control characters are escaped.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_text(&mut self, text: &str) -> Result<&mut Self> {
        self.send_with("settext", |p| {
            p.str("text", text);
        })
    }

    /// Sets the text color.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        let color = color.into();
        self.send_with("setcolor", |p| {
            p.color("color", color);
        })
    }
}
