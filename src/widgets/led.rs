//! LED widget commands.
//!
//! | Method | Event | Payload |
//! |--------|-------|---------|
//! | [`turn_on`](Widget::turn_on) | `turnon` | - |
//! | [`turn_off`](Widget::turn_off) | `turnoff` | - |
//! | [`toggle`](Widget::toggle) | `toggle` | - |
//! | [`set_brightness`](Widget::set_brightness) | `setbrightness` | `brightness` |
//! | [`set_color`](Widget::set_color) | `updateoncolors` | `led` |
//! | [`set_colors`](Widget::set_colors) | `updateoncolors` | `led`, `halo`, `rays` |
//! | [`show_halo`](Widget::show_halo) | `showhalo` | `show` |
//! | [`show_rays`](Widget::show_rays) | `showrays` | `show` |

// ============================================================================
// Imports
// ============================================================================

use super::{Color, Led, Widget};
use crate::error::Result;

// ============================================================================
// Led Commands
// ============================================================================

impl Widget<'_, Led> {
    /// Switches the LED on.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn turn_on(&mut self) -> Result<&mut Self> {
        self.send("turnon", None)
    }

    /// Switches the LED off.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn turn_off(&mut self) -> Result<&mut Self> {
        self.send("turnoff", None)
    }

    /// Flips the LED.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn toggle(&mut self) -> Result<&mut Self> {
        self.send("toggle", None)
    }

    /// Sets the brightness, `0.0` to `1.0`.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_brightness(&mut self, brightness: f32) -> Result<&mut Self> {
        self.send_with("setbrightness", |p| {
            p.float("brightness", brightness);
        })
    }

    /// Sets the color of the lit LED.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_color(&mut self, led: impl Into<Color>) -> Result<&mut Self> {
        let led = led.into();
        self.send_with("updateoncolors", |p| {
            p.color("led", led);
        })
    }

    /// Sets the LED, halo and ray colors.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_colors(
        &mut self,
        led: impl Into<Color>,
        halo: impl Into<Color>,
        rays: impl Into<Color>,
    ) -> Result<&mut Self> {
        let (led, halo, rays) = (led.into(), halo.into(), rays.into());
        self.send_with("updateoncolors", |p| {
            p.color("led", led).color("halo", halo).color("rays", rays);
        })
    }

    /// Shows or hides the halo.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn show_halo(&mut self, show: bool) -> Result<&mut Self> {
        self.send_with("showhalo", |p| {
            p.bool("show", show);
        })
    }

    /// Shows or hides the rays.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn show_rays(&mut self, show: bool) -> Result<&mut Self> {
        self.send_with("showrays", |p| {
            p.bool("show", show);
        })
    }

    /// Turns the LED on at `brightness`, or off.
    ///
    /// Switching on sends the brightness first, then `turnon`.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_state(&mut self, on: bool, brightness: f32) -> Result<&mut Self> {
        if on {
            self.set_brightness(brightness)?.turn_on()
        } else {
            self.turn_off()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
