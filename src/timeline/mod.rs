//! Timeline driver
//!
//! An ordered list of [`Step`]s, grouped into beats. A beat is a maximal run
//! of steps where every step after the first has `concurrent_with_previous`
//! set; its duration is the longest step in it.

pub mod player;
pub mod step;

use crate::errors::{Result, SceneError};
use crate::scene::layout::SceneLayout;
use std::ops::Range;
use std::time::Duration;
pub use step::{Mutation, Step};

#[derive(Debug, Clone)]
pub struct Timeline {
    steps: Vec<Step>,
    beats: Vec<Range<usize>>,
}

impl Timeline {
    /// Validate `steps` against `layout` and group them into beats
    pub fn new(steps: Vec<Step>, layout: &SceneLayout) -> Result<Self> {
        if steps.first().is_some_and(|s| s.concurrent_with_previous) {
            return Err(SceneError::FirstStepConcurrent);
        }

        for step in &steps {
            if let Some(missing) = step.targets().into_iter().find(|t| !layout.contains(*t)) {
                return Err(SceneError::UnknownElement(missing));
            }
        }

        let mut beats = Vec::new();
        let mut start = 0;
        for (index, step) in steps.iter().enumerate().skip(1) {
            if !step.concurrent_with_previous {
                beats.push(start..index);
                start = index;
            }
        }
        if !steps.is_empty() {
            beats.push(start..steps.len());
        }

        Ok(Timeline { steps, beats })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn beat_count(&self) -> usize {
        self.beats.len()
    }

    pub fn beat(&self, index: usize) -> Option<&[Step]> {
        self.beats.get(index).map(|range| &self.steps[range.clone()])
    }

    pub fn beat_duration(&self, index: usize) -> Duration {
        self.beat(index)
            .and_then(|steps| steps.iter().map(|s| s.duration).max())
            .unwrap_or_default()
    }

    pub fn total_duration(&self) -> Duration {
        (0..self.beat_count()).map(|i| self.beat_duration(i)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::SceneConfig;
    use crate::scene::layout::{build_layout, PanelId};
    use crate::scene::ElementId;

    fn layout() -> SceneLayout {
        build_layout(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_concurrent_steps_share_a_beat() {
        let steps = vec![
            Step::new(Mutation::FadeIn(ElementId::Panel(PanelId::Code)), 0.5),
            Step::new(Mutation::FadeIn(ElementId::Panel(PanelId::Heap)), 1.5).concurrent(),
            Step::wait(1.0),
        ];
        let timeline = Timeline::new(steps, &layout()).unwrap();
        assert_eq!(timeline.beat_count(), 2);
        assert_eq!(timeline.beat(0).unwrap().len(), 2);
        assert_eq!(timeline.beat_duration(0), Duration::from_secs_f32(1.5));
        assert_eq!(timeline.total_duration(), Duration::from_secs_f32(2.5));
    }

    #[test]
    fn test_first_step_cannot_be_concurrent() {
        let steps = vec![Step::wait(1.0).concurrent()];
        assert!(matches!(
            Timeline::new(steps, &layout()),
            Err(SceneError::FirstStepConcurrent)
        ));
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let steps = vec![Step::new(Mutation::Indicate(ElementId::HeapCell(12)), 0.5)];
        assert!(matches!(
            Timeline::new(steps, &layout()),
            Err(SceneError::UnknownElement(ElementId::HeapCell(12)))
        ));
    }

    #[test]
    fn test_empty_timeline_has_no_beats() {
        let timeline = Timeline::new(Vec::new(), &layout()).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.beat_count(), 0);
        assert_eq!(timeline.total_duration(), Duration::ZERO);
    }
}
