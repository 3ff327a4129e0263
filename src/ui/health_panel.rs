//! Health panel rendering.

use colored::Colorize;

use crate::health::HealthPanel;

/// Multi-line health panel, or `None` while it is closed.
pub fn render_health_panel(panel: &HealthPanel) -> Option<String> {
    if !panel.open {
        return None;
    }

    let mut lines = vec!["── System Health ──".bold().to_string()];
    if panel.checking {
        lines.push("Checking...".dimmed().to_string());
    } else if let Some(snapshot) = &panel.snapshot {
        lines.push(if snapshot.is_healthy() {
            "✓ All Systems Healthy".green().bold().to_string()
        } else {
            "⚠ System Degraded".yellow().bold().to_string()
        });
        for check in snapshot.checks() {
            let row = format!("{:<10} {}", check.label, check.value);
            lines.push(if check.ok {
                format!("  {} {row}", "✓".green())
            } else {
                format!("  {} {row}", "✗".red())
            });
        }
        lines.push("/refresh to check again, /close to hide".dimmed().to_string());
    }
    Some(lines.join("\n"))
}
