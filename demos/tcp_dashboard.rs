//! TCP dashboard demo.
//!
//! Serves one dashboard client on port 3333 (or `DASHLINK_PORT`), echoes
//! control events to the log, answers refresh requests for the status label
//! and streams a fake temperature reading.
//!
//! Try it without the app:
//!
//! ```text
//! cargo run --example tcp_dashboard
//! nc 127.0.0.1 3333
//! {"widgetId":"pump","type":"switch","event":"turnon"}
//! ```
//!
//! Set `RUST_LOG=dashlink=debug` for protocol-level logging.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use anyhow::Context;
use dashlink::engine::DEFAULT_TICK_PERIOD;
use dashlink::transport::TcpServerTransport;
use dashlink::{Color, DeviceConfig, Engine, Responder};
use tokio::time::interval;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Configuration
// ============================================================================

const DEFAULT_PORT: u16 = 3333;
const SENSOR_PERIOD: Duration = Duration::from_secs(1);

fn port() -> anyhow::Result<u16> {
    match std::env::var("DASHLINK_PORT") {
        Ok(value) => value.parse().context("DASHLINK_PORT must be a port number"),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let transport = TcpServerTransport::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port()?);
    let config = DeviceConfig::new()
        .with_dashboard_id("demo")
        .with_device_name("Demo Device");
    let mut engine = Engine::new(transport).with_config(config);

    register_handlers(&mut engine);
    engine.begin().context("starting transport")?;
    info!(device_id = %engine.config().device_id, "Waiting for a dashboard client");

    let mut ticker = interval(DEFAULT_TICK_PERIOD);
    let mut sensor = interval(SENSOR_PERIOD);
    let mut reading = 20.0_f32;
    let mut was_connected = false;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => engine.tick(),
            _ = sensor.tick() => {
                let connected = engine.connected();
                if connected && !was_connected {
                    setup_widgets(&mut engine)?;
                }
                was_connected = connected;
                if !connected {
                    continue;
                }

                reading = next_reading(reading);
                publish(&mut engine, reading)?;
            }
        }
    }

    let stats = engine.stats();
    info!(
        frames = stats.frames,
        handled = stats.handled_events,
        sent = stats.messages_sent,
        "Shutting down"
    );
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

fn register_handlers(engine: &mut Engine<TcpServerTransport>) {
    engine
        .handlers_mut()
        .on_switch(|event, out| {
            info!(widget = event.widget_id, on = event.is_on, "Switch");
            if let Err(e) = mirror_switch(out, event.is_on) {
                warn!(error = %e, "Pump LED not updated");
            }
        })
        .on_simple_button(|event, _| info!(widget = event.widget_id, kind = ?event.kind, "Button"))
        .on_horizontal_slider(|event, _| {
            if event.is_value_changed() {
                info!(widget = event.widget_id, value = event.value, "Slider");
            }
        })
        .on_joystick(|event, _| {
            info!(
                widget = event.widget_id,
                magnitude = event.magnitude(),
                angle = event.angle(),
                "Joystick"
            );
        })
        .on_direction_pad(|event, _| {
            if event.is_center() && event.is_long_press() {
                info!(widget = event.widget_id, "Pad reset");
            } else {
                info!(widget = event.widget_id, button = ?event.button, "Pad");
            }
        })
        .on_widget_request(|request, out| {
            info!(widget = request.widget_id, "Refresh requested");
            if request.widget_id == "status" {
                if let Err(e) = answer_status(out) {
                    warn!(error = %e, "Refresh not answered");
                }
            }
        });
}

fn mirror_switch(out: &mut Responder<'_>, on: bool) -> dashlink::Result<()> {
    out.led("pump_led")?.set_state(on, 1.0)?;
    Ok(())
}

fn answer_status(out: &mut Responder<'_>) -> dashlink::Result<()> {
    out.text("status")?.set_text("online")?.set_color(Color::GREEN)?;
    Ok(())
}

// ============================================================================
// Widgets
// ============================================================================

fn setup_widgets(engine: &mut Engine<TcpServerTransport>) -> dashlink::Result<()> {
    engine.gauge("temp")?.set_range(0.0, 40.0)?.set_unit("°C")?;
    engine
        .chart("history")?
        .set_labels("Temperature", "sample", "°C")?
        .add_series("temp", "Indoor", Some(Color::ORANGE))?;
    engine.text("status")?.set_text("online")?.set_color(Color::GREEN)?;
    Ok(())
}

/// Sends one reading; link errors are logged and skipped.
fn publish(engine: &mut Engine<TcpServerTransport>, reading: f32) -> anyhow::Result<()> {
    match send_reading(engine, reading) {
        Ok(()) => Ok(()),
        Err(e) if e.is_link_error() => {
            warn!(error = %e, "Reading not sent");
            Ok(())
        }
        Err(e) => Err(e).context("publishing reading"),
    }
}

fn send_reading(engine: &mut Engine<TcpServerTransport>, reading: f32) -> dashlink::Result<()> {
    engine.gauge("temp")?.set_value(reading)?;
    engine.chart("history")?.add_point("temp", reading)?;
    engine.led("heater")?.set_state(reading < 19.0, 1.0)?;
    Ok(())
}

/// Deterministic wobble between 17 and 23 degrees.
fn next_reading(previous: f32) -> f32 {
    let next = previous + 0.7;
    if next > 23.0 { 17.0 + (next - 23.0) } else { next }
}
