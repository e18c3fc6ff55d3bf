use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct Step<A> {
    pub duration_ms: f64,
    pub action: A,
}

/// An ordered list of timed steps. Entering a step yields its action; the
/// step then holds for its duration before the next one is entered. Time
/// left over when a step ends carries into the following step, so a
/// sequence advanced in uneven slices enters every step at the same offset
/// as one advanced in a single call.
#[derive(Debug, Clone)]
pub struct Sequence<A> {
    pending: VecDeque<Step<A>>,
    current: Option<Step<A>>,
    elapsed_ms: f64,
    started: bool,
}

impl<A> Default for Sequence<A> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            elapsed_ms: 0.0,
            started: false,
        }
    }
}

impl<A: Clone> Sequence<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, duration_ms: f64, action: A) -> Self {
        self.push(duration_ms, action);
        self
    }

    pub fn push(&mut self, duration_ms: f64, action: A) {
        self.pending.push_back(Step {
            duration_ms: duration_ms.max(0.0),
            action,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_finished(&self) -> bool {
        self.started && self.current.is_none() && self.pending.is_empty()
    }

    pub fn current(&self) -> Option<&A> {
        self.current.as_ref().map(|s| &s.action)
    }

    pub fn elapsed_in_step(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn remaining_ms(&self) -> f64 {
        let current = self
            .current
            .as_ref()
            .map_or(0.0, |s| (s.duration_ms - self.elapsed_ms).max(0.0));
        current + self.pending.iter().map(|s| s.duration_ms).sum::<f64>()
    }

    /// Advances by `dt_ms` and returns the actions of every step entered,
    /// in order.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<A> {
        let mut entered = Vec::new();

        if !self.started {
            self.started = true;
            if !self.enter_next(0.0, &mut entered) {
                return entered;
            }
        }

        if self.current.is_none() {
            return entered;
        }

        self.elapsed_ms += dt_ms.max(0.0);
        while let Some(step) = &self.current {
            if self.elapsed_ms < step.duration_ms {
                break;
            }
            let leftover = self.elapsed_ms - step.duration_ms;
            if !self.enter_next(leftover, &mut entered) {
                break;
            }
        }

        entered
    }

    fn enter_next(&mut self, leftover: f64, entered: &mut Vec<A>) -> bool {
        match self.pending.pop_front() {
            Some(step) => {
                entered.push(step.action.clone());
                self.current = Some(step);
                self.elapsed_ms = leftover;
                true
            }
            None => {
                self.current = None;
                self.elapsed_ms = 0.0;
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
        self.elapsed_ms = 0.0;
    }
}
