//! Prometheus text exposition.

use crate::metrics::{ExportedMetrics, MetricsSnapshot};

/// Namespace prefix for every exported series.
pub const NAMESPACE: &str = "aranet4";

/// Render the current metric state in Prometheus text format.
pub fn render(metrics: &ExportedMetrics) -> String {
    render_snapshot(&metrics.snapshot())
}

fn render_snapshot(snap: &MetricsSnapshot) -> String {
    let mut output = String::with_capacity(1024);

    push_gauge(&mut output, "co2", "CO2 concentration in ppm", snap.co2);
    push_gauge(
        &mut output,
        "temperature",
        "Temperature in Celsius",
        snap.temperature,
    );
    push_gauge(&mut output, "pressure", "Pressure in hPa", snap.pressure);
    push_gauge(
        &mut output,
        "humidity",
        "Relative humidity in percent",
        snap.humidity,
    );
    push_gauge(
        &mut output,
        "battery_level",
        "Battery level in percent",
        snap.battery_level,
    );
    push_gauge(
        &mut output,
        "update_interval",
        "Update interval in seconds",
        snap.update_interval,
    );
    push_gauge(
        &mut output,
        "since_last_update",
        "Seconds since last update",
        snap.since_last_update,
    );

    // Two-state enum: one sample per state, 1 marks the active one.
    output.push_str(&format!(
        "# HELP {NAMESPACE}_connected_to_sensor Connected to sensor\n"
    ));
    output.push_str(&format!(
        "# TYPE {NAMESPACE}_connected_to_sensor gauge\n"
    ));
    for state in ["true", "false"] {
        let active = (state == "true") == snap.connected;
        output.push_str(&format!(
            "{NAMESPACE}_connected_to_sensor{{connected_to_sensor=\"{}\"}} {}\n",
            state,
            if active { 1 } else { 0 }
        ));
    }

    output
}

fn push_gauge(output: &mut String, name: &str, help: &str, value: f64) {
    output.push_str(&format!("# HELP {NAMESPACE}_{name} {help}\n"));
    output.push_str(&format!("# TYPE {NAMESPACE}_{name} gauge\n"));
    output.push_str(&format!("{NAMESPACE}_{name} {value}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use aranet4_link::Reading;

    fn metrics_with_reading() -> ExportedMetrics {
        let metrics = ExportedMetrics::new();
        metrics.record_reading(&Reading {
            co2: 650,
            temperature: 21.5,
            pressure: 1013.0,
            humidity: 45,
            battery: 80,
            interval: 60,
            age: 3,
        });
        metrics
    }

    #[test]
    fn test_render_connected() {
        let output = render(&metrics_with_reading());

        assert!(output.contains("# TYPE aranet4_co2 gauge\n"));
        assert!(output.contains("aranet4_co2 650\n"));
        assert!(output.contains("aranet4_temperature 21.5\n"));
        assert!(output.contains("aranet4_pressure 1013\n"));
        assert!(output.contains("aranet4_humidity 45\n"));
        assert!(output.contains("aranet4_battery_level 80\n"));
        assert!(output.contains("aranet4_update_interval 60\n"));
        assert!(output.contains("aranet4_since_last_update 3\n"));
        assert!(output.contains("aranet4_connected_to_sensor{connected_to_sensor=\"true\"} 1\n"));
        assert!(output.contains("aranet4_connected_to_sensor{connected_to_sensor=\"false\"} 0\n"));
    }

    #[test]
    fn test_render_disconnected() {
        let metrics = metrics_with_reading();
        metrics.record_failure();
        let output = render(&metrics);

        assert!(output.contains("aranet4_co2 NaN\n"));
        assert!(output.contains("aranet4_since_last_update NaN\n"));
        assert!(output.contains("aranet4_connected_to_sensor{connected_to_sensor=\"true\"} 0\n"));
        assert!(output.contains("aranet4_connected_to_sensor{connected_to_sensor=\"false\"} 1\n"));
    }

    #[test]
    fn test_every_series_has_help_and_type() {
        let output = render(&ExportedMetrics::new());
        for name in [
            "co2",
            "temperature",
            "pressure",
            "humidity",
            "battery_level",
            "update_interval",
            "since_last_update",
            "connected_to_sensor",
        ] {
            assert!(output.contains(&format!("# HELP aranet4_{name} ")), "{name}");
            assert!(output.contains(&format!("# TYPE aranet4_{name} gauge")), "{name}");
        }
    }
}
