//! Linear multi-step form controller

/// Whether advancing requires the current step to be valid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepGating {
    /// Advance freely, validation is deferred to the final submit
    #[default]
    Lenient,
    /// Advance only when the current step's fields are valid
    Strict,
}

impl StepGating {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// A single step as displayed in the step indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub id: usize,
    pub name: String,
    pub active: bool,
}

/// Bounded cursor over steps `1..=total`
#[derive(Debug, Clone)]
pub struct Wizard {
    active_step: usize,
    total_steps: usize,
    gating: StepGating,
}

impl Wizard {
    /// Create a wizard starting at step 1.
    /// A zero step count is treated as a single step.
    pub fn new(total_steps: usize, gating: StepGating) -> Self {
        Self::starting_at(total_steps, 1, gating)
    }

    pub fn starting_at(total_steps: usize, initial_step: usize, gating: StepGating) -> Self {
        let total_steps = total_steps.max(1);
        Self {
            active_step: initial_step.clamp(1, total_steps),
            total_steps,
            gating,
        }
    }

    pub fn active_step(&self) -> usize {
        self.active_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn gating(&self) -> StepGating {
        self.gating
    }

    pub fn is_first(&self) -> bool {
        self.active_step == 1
    }

    pub fn is_last(&self) -> bool {
        self.active_step == self.total_steps
    }

    /// Derived step list, recomputed from the cursor on every call
    pub fn steps(&self) -> Vec<WizardStep> {
        (1..=self.total_steps)
            .map(|id| WizardStep {
                id,
                name: format!("Step {id}"),
                active: id == self.active_step,
            })
            .collect()
    }

    pub fn next(&mut self) {
        self.active_step = (self.active_step + 1).min(self.total_steps);
    }

    pub fn previous(&mut self) {
        self.active_step = self.active_step.saturating_sub(1).max(1);
    }

    /// Jump to `step`; out-of-range values are ignored
    pub fn go_to(&mut self, step: usize) {
        if (1..=self.total_steps).contains(&step) {
            self.active_step = step;
        }
    }

    /// Advance subject to the gating mode. Returns whether the cursor moved.
    pub fn try_next(&mut self, current_step_valid: bool) -> bool {
        if self.gating == StepGating::Strict && !current_step_valid {
            return false;
        }
        let before = self.active_step;
        self.next();
        before != self.active_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_stops_at_last_step() {
        let mut wizard = Wizard::new(3, StepGating::Lenient);
        wizard.next();
        wizard.next();
        wizard.next();
        assert_eq!(wizard.active_step(), 3);
        assert!(wizard.is_last());
    }

    #[test]
    fn test_previous_stops_at_first_step() {
        let mut wizard = Wizard::new(3, StepGating::Lenient);
        wizard.previous();
        assert_eq!(wizard.active_step(), 1);
        assert!(wizard.is_first());
    }

    #[test]
    fn test_go_to_out_of_range_is_noop() {
        let mut wizard = Wizard::new(3, StepGating::Lenient);
        wizard.go_to(2);
        wizard.go_to(0);
        assert_eq!(wizard.active_step(), 2);
        wizard.go_to(4);
        assert_eq!(wizard.active_step(), 2);
        wizard.go_to(3);
        assert_eq!(wizard.active_step(), 3);
    }

    #[test]
    fn test_steps_have_exactly_one_active() {
        let mut wizard = Wizard::new(4, StepGating::Lenient);
        wizard.go_to(3);
        let steps = wizard.steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps.iter().filter(|s| s.active).count(), 1);
        assert!(steps[2].active);
        assert_eq!(steps[0].name, "Step 1");
        assert_eq!(steps[3].id, 4);
    }

    #[test]
    fn test_lenient_advances_when_invalid() {
        let mut wizard = Wizard::new(3, StepGating::Lenient);
        assert!(wizard.try_next(false));
        assert_eq!(wizard.active_step(), 2);
    }

    #[test]
    fn test_strict_blocks_when_invalid() {
        let mut wizard = Wizard::new(3, StepGating::Strict);
        assert!(!wizard.try_next(false));
        assert_eq!(wizard.active_step(), 1);
        assert!(wizard.try_next(true));
        assert_eq!(wizard.active_step(), 2);
    }

    #[test]
    fn test_try_next_on_last_step_reports_no_move() {
        let mut wizard = Wizard::starting_at(2, 2, StepGating::Lenient);
        assert!(!wizard.try_next(true));
    }

    #[test]
    fn test_initial_step_is_clamped() {
        let wizard = Wizard::starting_at(3, 10, StepGating::Lenient);
        assert_eq!(wizard.active_step(), 3);
        let wizard = Wizard::new(0, StepGating::Lenient);
        assert_eq!(wizard.total_steps(), 1);
    }

    #[test]
    fn test_gating_from_flag() {
        assert_eq!(StepGating::from_strict(true), StepGating::Strict);
        assert_eq!(StepGating::from_strict(false), StepGating::Lenient);
    }
}
