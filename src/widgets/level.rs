//! Gauge, metric and level widget commands.
//!
//! Gauges and both level bars share the value/range vocabulary; metrics show
//! a single value with a unit.

// ============================================================================
// Imports
// ============================================================================

use super::{DisplayKind, Gauge, HorizontalLevel, Metric, VerticalLevel, Widget};
use crate::error::Result;

// ============================================================================
// Shared Commands
// ============================================================================

/// Families that accept `setvalue`.
pub trait ValueDisplay: DisplayKind {}

/// Families that accept `setrange` and `update`.
pub trait RangeDisplay: ValueDisplay {}

impl ValueDisplay for Gauge {}
impl ValueDisplay for Metric {}
impl ValueDisplay for HorizontalLevel {}
impl ValueDisplay for VerticalLevel {}

impl RangeDisplay for Gauge {}
impl RangeDisplay for HorizontalLevel {}
impl RangeDisplay for VerticalLevel {}

impl<K: ValueDisplay> Widget<'_, K> {
    /// Sets the displayed value.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_value(&mut self, value: f32) -> Result<&mut Self> {
        self.send_with("setvalue", |p| {
            p.float("value", value);
        })
    }
}

impl<K: RangeDisplay> Widget<'_, K> {
    /// Sets the scale bounds.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_range(&mut self, min: f32, max: f32) -> Result<&mut Self> {
        self.send_with("setrange", |p| {
            p.float("min", min).float("max", max);
        })
    }

    /// Sets value and bounds in one message.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn update(&mut self, value: f32, min: f32, max: f32) -> Result<&mut Self> {
        self.send_with("update", |p| {
            p.float("value", value).float("min", min).float("max", max);
        })
    }
}

// ============================================================================
// Unit Commands
// ============================================================================

impl Widget<'_, Gauge> {
    /// Sets the unit label.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_unit(&mut self, unit: &str) -> Result<&mut Self> {
        self.send_with("setunit", |p| {
            p.str("unit", unit);
        })
    }
}

impl Widget<'_, Metric> {
    /// Sets the unit label.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be sent; see [`Widget::send`].
    pub fn set_unit(&mut self, unit: &str) -> Result<&mut Self> {
        self.send_with("setunit", |p| {
            p.str("unit", unit);
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::widgets::testing::RecordingSender;
    use crate::widgets::{Gauge, Metric, VerticalLevel, Widget, WidgetEntry, WidgetKind};

    #[test]
    fn test_gauge_commands() {
        let mut sender = RecordingSender::default();
        let mut entry = WidgetEntry::new("temp", WidgetKind::Gauge);

        Widget::<Gauge>::new(&mut sender, &mut entry)
            .set_range(-10.0, 40.0)
            .and_then(|g| g.set_unit("°C"))
            .and_then(|g| g.set_value(21.456))
            .and_then(|g| g.update(22.0, 0.0, 50.0))
            .expect("send");

        assert_eq!(
            sender.payloads(),
            vec![
                ("setrange", Some(r#"{"min":-10.00,"max":40.00}"#)),
                ("setunit", Some(r#"{"unit":"°C"}"#)),
                ("setvalue", Some(r#"{"value":21.46}"#)),
                ("update", Some(r#"{"value":22.00,"min":0.00,"max":50.00}"#)),
            ]
        );
        assert!(sender.sent.iter().all(|(id, ty, _, _)| id == "temp" && ty == "gauge"));
    }

    #[test]
    fn test_metric_commands() {
        let mut sender = RecordingSender::default();
        let mut entry = WidgetEntry::new("rpm", WidgetKind::Metric);

        Widget::<Metric>::new(&mut sender, &mut entry)
            .set_value(1200.0)
            .and_then(|m| m.set_unit("rpm"))
            .expect("send");

        assert_eq!(
            sender.payloads(),
            vec![
                ("setvalue", Some(r#"{"value":1200.00}"#)),
                ("setunit", Some(r#"{"unit":"rpm"}"#)),
            ]
        );
    }

    #[test]
    fn test_level_uses_own_type() {
        let mut sender = RecordingSender::default();
        let mut entry = WidgetEntry::new("tank", WidgetKind::VerticalLevel);

        Widget::<VerticalLevel>::new(&mut sender, &mut entry)
            .update(75.0, 0.0, 100.0)
            .expect("send");

        assert_eq!(sender.sent[0].1, "verticallevel");
        assert_eq!(sender.sent[0].2, "update");
    }
}
