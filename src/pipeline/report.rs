//! Template-based conversion from PipelineReport → operator text report

use crate::config::defaults::REPORT_TRAJECTORY_ROWS;
use crate::projection::TrajectoryPoint;
use crate::types::{HealthMetric, RiskCategory};

use super::PipelineReport;

const RULE: &str = "============================================================";

/// Render a plain-text mission health report.
pub fn render_text(report: &PipelineReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    let run = &report.projection;
    let mission = &run.mission;

    lines.push(RULE.to_string());
    lines.push(format!(" MISSION HEALTH PROJECTION: {}", run.astronaut));
    lines.push(RULE.to_string());
    lines.push(format!(
        "Mission: {} ({} days, {}, {:.2} mSv/day)",
        if mission.name().is_empty() { "unnamed" } else { mission.name() },
        mission.duration_days(),
        mission.destination(),
        mission.radiation_msv_per_day(),
    ));
    lines.push(format!(
        "Countermeasures: {}, nutrition: {}",
        mission.countermeasures(),
        mission.nutrition(),
    ));

    // Health change summary
    let s = &report.summary;
    lines.push(String::new());
    lines.push("* Health Change Summary".to_string());
    lines.push(format!(
        "   Overall health: {:.1}% ({}) → {:.1}% ({})",
        s.baseline_score * 100.0,
        s.baseline_status,
        s.final_score * 100.0,
        s.final_status,
    ));
    for c in &s.changes {
        let pct = c
            .percent_change
            .map_or_else(|| "n/a".to_string(), |p| format!("{p:+.1}%"));
        lines.push(format!(
            "   {:<24} {:>8.3} → {:>8.3} {:<2} ({:+.3}, {})",
            c.metric.key(),
            c.baseline,
            c.final_value,
            c.metric.unit(),
            c.change,
            pct,
        ));
    }

    // Trajectory excerpt
    lines.push(String::new());
    lines.push("* Trajectory".to_string());
    lines.push(format!(
        "   {:>5}  {:>8}  {:>6}  {:>6}  {:>6}",
        "day", "muscle", "bone", "dna", "health"
    ));
    for point in trajectory_excerpt(report) {
        let snap = &point.snapshot;
        lines.push(format!(
            "   {:>5}  {:>8.2}  {:>6.2}  {:>6.3}  {:>5.1}%",
            snap.day,
            snap.value(HealthMetric::MuscleMass),
            snap.value(HealthMetric::BoneDensity),
            snap.value(HealthMetric::RadiationDnaDamage),
            snap.overall_health_score() * 100.0,
        ));
    }

    // Final risk
    lines.push(String::new());
    lines.push("* Risk Assessment (end of mission)".to_string());
    if report.final_risk.is_empty() {
        lines.push("   No significant risk factors identified".to_string());
    } else {
        for category in RiskCategory::ALL {
            if let Some(entry) = report.final_risk.get(category) {
                lines.push(format!(
                    "   [{}] {}: {:.1}%",
                    entry.tier,
                    category,
                    entry.probability * 100.0
                ));
            }
        }
    }

    // Recommendations
    lines.push(String::new());
    lines.push(format!(
        "* Recommended Interventions ({})",
        report.recommendation.mode
    ));
    if report.recommendation.is_empty() {
        lines.push("   Current health protocols are adequate".to_string());
    }
    for (i, rec) in report.recommendation.interventions.iter().enumerate() {
        let intervention = &rec.intervention;
        lines.push(format!(
            "   {}. {} [{}] score {:.3}",
            i + 1,
            intervention.name,
            intervention.category,
            rec.score
        ));
        if !intervention.description.is_empty() {
            lines.push(format!("      {}", intervention.description));
        }
        if !rec.addressed_risks.is_empty() {
            let risks: Vec<String> = rec.addressed_risks.iter().map(ToString::to_string).collect();
            lines.push(format!("      Addresses: {}", risks.join(", ")));
        }
    }

    // Mission-level countermeasures
    lines.push(String::new());
    lines.push("* Mission-Level Countermeasures".to_string());
    if report.countermeasures.is_empty() {
        lines.push("   No mission-level interventions required".to_string());
    }
    for (i, cm) in report.countermeasures.iter().enumerate() {
        lines.push(format!("   {}. [{}] {}", i + 1, cm.tier, cm.directive));
    }

    // Phased plan
    if let Some(ref plan) = report.plan {
        lines.push(String::new());
        lines.push("* Phased Mission Plan".to_string());
        for phase in &plan.phases {
            lines.push(format!(
                "   {} (days {}-{}):",
                phase.phase, phase.start_day, phase.end_day
            ));
            if phase.interventions.is_empty() {
                lines.push("      No specific interventions required".to_string());
            }
            for name in &phase.interventions {
                lines.push(format!("      - {name}"));
            }
        }
    }

    lines.join("\n")
}

/// Evenly spaced sample of trajectory points, always including first and last.
fn trajectory_excerpt(report: &PipelineReport) -> Vec<&TrajectoryPoint> {
    let points = &report.projection.points;
    if points.len() <= REPORT_TRAJECTORY_ROWS {
        return points.iter().collect();
    }
    let last = points.len() - 1;
    let rows = REPORT_TRAJECTORY_ROWS - 1;
    let mut picked: Vec<usize> = (0..=rows).map(|k| k * last / rows).collect();
    picked.dedup();
    picked.into_iter().map(|idx| &points[idx]).collect()
}
