//! Per-subject progress at each phase boundary.

use serde::{Deserialize, Serialize};

use crate::models::{DayStatus, Schedule, TermConfig};

/// Planned vs. delivered LUs for one subject at one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCheckpoint {
    /// Phase identifier.
    pub phase_id: String,
    /// Phase label.
    pub phase_label: String,
    /// End LU of the subject's module at the same position as the phase
    /// (`None` = no such module, shown as "N/A").
    pub planned: Option<u32>,
    /// LUs delivered strictly before the phase's first assessment day
    /// (`None` = the phase has no assessment day in the schedule).
    pub actual: Option<usize>,
}

impl PhaseCheckpoint {
    /// Whether delivery reached the plan.
    pub fn on_track(&self) -> Option<bool> {
        match (self.planned, self.actual) {
            (Some(planned), Some(actual)) => Some(actual >= planned as usize),
            _ => None,
        }
    }
}

/// Phase checkpoints of one tracked subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPhasing {
    /// Subject identifier.
    pub subject_id: String,
    /// Subject display name.
    pub subject_name: String,
    /// One checkpoint per configured phase, in order.
    pub checkpoints: Vec<PhaseCheckpoint>,
}

impl SubjectPhasing {
    /// Computes phasing for every tracked subject, in roster order.
    pub fn calculate(config: &TermConfig, schedule: &Schedule) -> Vec<Self> {
        let boundaries: Vec<_> = config
            .phases
            .iter()
            .map(|p| schedule.first_date_with(DayStatus::Ca, p.tag()))
            .collect();

        config
            .subjects
            .iter()
            .filter(|s| s.is_tracked())
            .map(|subject| {
                let checkpoints = config
                    .phases
                    .iter()
                    .zip(&boundaries)
                    .enumerate()
                    .map(|(idx, (phase, boundary))| PhaseCheckpoint {
                        phase_id: phase.tag().to_string(),
                        phase_label: phase.label.clone(),
                        planned: subject.modules.get(idx).map(|m| m.end_lu),
                        actual: boundary.map(|first_ca| {
                            schedule
                                .occupancies_of(&subject.id)
                                .filter(|(day, _, occ)| day.date < first_ca && occ.is_learning())
                                .count()
                        }),
                    })
                    .collect();
                Self {
                    subject_id: subject.id.clone(),
                    subject_name: subject.name.clone(),
                    checkpoints,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, Phase, Slot, Subject};
    use crate::scheduler::ScheduleGenerator;

    #[test]
    fn test_phasing_checkpoints() {
        let config = TermConfig::new("2025-01-06", "2025-02-02")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_subject(
                Subject::new("A", "Alpha", "#f00")
                    .with_total_lus(20)
                    .with_module(Module::new("M1", 1, 4, "#f00")),
            )
            .with_subject(Subject::new("PE", "Sport", "#0f0"))
            .with_pattern("Monday", "P1", "A")
            .with_pattern("Tuesday", "P1", "A")
            .with_phase(Phase::new("CA1", "CA 1", 2).with_duration(1))
            .with_phase(Phase::new("CA2", "CA 2", 2));
        let schedule = ScheduleGenerator::new().generate(&config);
        let phasing = SubjectPhasing::calculate(&config, &schedule);

        assert_eq!(phasing.len(), 1);
        let cps = &phasing[0].checkpoints;
        assert_eq!(cps.len(), 2);

        // CA1 falls on Friday 17th; A ran Mon/Tue for two weeks
        assert_eq!(cps[0].planned, Some(4));
        assert_eq!(cps[0].actual, Some(4));
        assert_eq!(cps[0].on_track(), Some(true));

        // CA2 has no second module and no assessment day
        assert_eq!(cps[1].planned, None);
        assert_eq!(cps[1].actual, None);
        assert_eq!(cps[1].on_track(), None);
    }
}
