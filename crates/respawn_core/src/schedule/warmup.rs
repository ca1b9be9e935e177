use tracing::debug;

/// Pending warm-up for one template.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WarmupTask<T> {
    pub template: T,
    pub target: usize,
    pub per_tick: usize,
}

/// Work the scheduler wants done this tick: grow `template`'s pool to
/// `goal` instances.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WarmupStep<T> {
    pub template: T,
    pub goal: usize,
}

/// Budgeted warm-up tasks, at most one per template.
#[derive(Debug)]
pub struct WarmupScheduler<T> {
    tasks: Vec<WarmupTask<T>>,
}

impl<T: Copy + PartialEq + std::fmt::Debug> WarmupScheduler<T> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a task, or merge into the existing one for the same template.
    ///
    /// Merging keeps the larger target and the smaller per-tick budget.
    pub fn schedule(&mut self, template: T, target: usize, per_tick: usize) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.template == template) {
            task.target = task.target.max(target);
            task.per_tick = task.per_tick.min(per_tick);
            debug!(?template, target = task.target, per_tick = task.per_tick, "merged warm-up task");
            return;
        }
        self.tasks.push(WarmupTask {
            template,
            target,
            per_tick,
        });
    }

    /// Decide this tick's work.
    ///
    /// Tasks whose template is gone or whose pool already holds `target`
    /// instances are removed; every other task yields a step that grows its
    /// pool by at most `per_tick`.
    pub fn plan(
        &mut self,
        mut current_count: impl FnMut(T) -> usize,
        mut is_template_live: impl FnMut(T) -> bool,
    ) -> Vec<WarmupStep<T>> {
        let mut steps = Vec::new();
        self.tasks.retain(|task| {
            if !is_template_live(task.template) {
                debug!(template = ?task.template, "dropping warm-up for template that is not live");
                return false;
            }
            let current = current_count(task.template);
            let remaining = task.target.saturating_sub(current);
            if remaining == 0 {
                debug!(template = ?task.template, target = task.target, "warm-up complete");
                return false;
            }
            steps.push(WarmupStep {
                template: task.template,
                goal: current + task.per_tick.min(remaining),
            });
            true
        });
        steps
    }

    pub fn task(&self, template: T) -> Option<&WarmupTask<T>> {
        self.tasks.iter().find(|t| t.template == template)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl<T: Copy + PartialEq + std::fmt::Debug> Default for WarmupScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_max_target_min_budget() {
        let mut scheduler = WarmupScheduler::new();
        scheduler.schedule('a', 10, 3);
        scheduler.schedule('a', 6, 5);
        scheduler.schedule('a', 20, 4);

        assert_eq!(scheduler.len(), 1);
        let task = scheduler.task('a').unwrap();
        assert_eq!(task.target, 20);
        assert_eq!(task.per_tick, 3);
    }

    #[test]
    fn test_plan_is_bounded_by_budget_and_remaining() {
        let mut scheduler = WarmupScheduler::new();
        scheduler.schedule('a', 10, 3);

        let steps = scheduler.plan(|_| 8, |_| true);
        assert_eq!(steps, vec![WarmupStep { template: 'a', goal: 10 }]);

        let steps = scheduler.plan(|_| 0, |_| true);
        assert_eq!(steps, vec![WarmupStep { template: 'a', goal: 3 }]);
    }

    #[test]
    fn test_plan_removes_completed_tasks() {
        let mut scheduler = WarmupScheduler::new();
        scheduler.schedule('a', 4, 2);
        scheduler.schedule('b', 4, 2);

        let steps = scheduler.plan(|t| if t == 'a' { 4 } else { 1 }, |_| true);
        assert_eq!(steps, vec![WarmupStep { template: 'b', goal: 3 }]);
        assert!(scheduler.task('a').is_none());
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_plan_drops_dead_templates() {
        let mut scheduler = WarmupScheduler::new();
        scheduler.schedule('a', 4, 2);

        assert!(scheduler.plan(|_| 0, |_| false).is_empty());
        assert!(scheduler.is_empty());
    }
}
