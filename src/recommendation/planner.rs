//! Phased mission plan
//!
//! Splits the mission into early / mid / late thirds and schedules each
//! recommended intervention into the phase where its targets first reach
//! medium-or-higher risk.

use crate::projection::ProjectionRun;
use crate::types::{Intervention, MissionPhase, MissionPlan, PlanPhase, SeverityTier};

use super::engine::Recommendation;

/// Inclusive day ranges for each phase. Empty phases (start > end) are
/// dropped, so a zero-day mission has only an early phase.
pub fn phase_bounds(duration_days: u32) -> Vec<(MissionPhase, u32, u32)> {
    let early_end = duration_days / 3;
    let mid_end = duration_days * 2 / 3;
    [
        (MissionPhase::Early, 0, early_end),
        (MissionPhase::Mid, early_end + 1, mid_end),
        (MissionPhase::Late, mid_end + 1, duration_days),
    ]
    .into_iter()
    .filter(|(_, start, end)| start <= end)
    .collect()
}

/// Phase containing `day`.
pub fn phase_for_day(duration_days: u32, day: u32) -> MissionPhase {
    if day <= duration_days / 3 {
        MissionPhase::Early
    } else if day <= duration_days * 2 / 3 {
        MissionPhase::Mid
    } else {
        MissionPhase::Late
    }
}

/// Build a plan from a recommendation and the run it was derived from.
///
/// Within each phase, interventions keep their recommendation order.
pub fn plan_mission(recommendation: &Recommendation, run: &ProjectionRun) -> MissionPlan {
    let duration = run.mission.duration_days();
    let mut phases: Vec<PlanPhase> = phase_bounds(duration)
        .into_iter()
        .map(|(phase, start_day, end_day)| PlanPhase {
            phase,
            start_day,
            end_day,
            interventions: Vec::new(),
        })
        .collect();

    for scored in &recommendation.interventions {
        let wanted = schedule_phase(&scored.intervention, run);
        // Fall back to the latest non-empty phase not after the wanted one
        if let Some(slot) = phases.iter_mut().rev().find(|p| p.phase <= wanted) {
            slot.interventions.push(scored.intervention.name.clone());
        }
    }

    MissionPlan { phases }
}

fn schedule_phase(intervention: &Intervention, run: &ProjectionRun) -> MissionPhase {
    let duration = run.mission.duration_days();
    let categories = intervention.addressed_categories();

    let crossing = run.points.iter().find(|point| {
        categories
            .iter()
            .any(|c| matches!(point.risk.tier(*c), Some(t) if t >= SeverityTier::Medium))
    });

    let applicable = match intervention.phase {
        MissionPhase::Any => None,
        specific => Some(specific),
    };

    match (crossing, applicable) {
        (Some(point), Some(specific)) => phase_for_day(duration, point.snapshot.day).max(specific),
        (Some(point), None) => phase_for_day(duration, point.snapshot.day),
        (None, Some(specific)) => specific,
        (None, None) => MissionPhase::Early,
    }
}
