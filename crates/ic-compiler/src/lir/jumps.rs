//! Control-flow labels.
//!
//! Every if, while and boolean-valued operator takes a fresh [`LabelSet`]
//! from the program-wide [`LabelCounter`]. Loops push their labels on the
//! [`LoopStack`] so `break` and `continue` bind to the innermost loop.

/// Numbered labels for one control-flow construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSet(pub u32);

impl LabelSet {
    pub fn true_label(&self) -> String {
        format!("_true_label{}", self.0)
    }

    pub fn false_label(&self) -> String {
        format!("_false_label{}", self.0)
    }

    pub fn end_label(&self) -> String {
        format!("_end_label{}", self.0)
    }

    pub fn while_label(&self) -> String {
        format!("_while_cond_label{}", self.0)
    }
}

/// Monotonic label numbering, one per compilation.
#[derive(Debug, Default)]
pub struct LabelCounter {
    next: u32,
}

impl LabelCounter {
    pub fn fresh(&mut self) -> LabelSet {
        let labels = LabelSet(self.next);
        self.next += 1;
        labels
    }

    pub fn issued(&self) -> u32 {
        self.next
    }
}

/// Stack of enclosing loops (innermost last).
#[derive(Debug, Default)]
pub struct LoopStack {
    loops: Vec<LabelSet>,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_loop(&mut self, labels: LabelSet) {
        self.loops.push(labels);
    }

    pub fn exit_loop(&mut self) -> Option<LabelSet> {
        self.loops.pop()
    }

    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }

    /// Where `break` jumps: the innermost loop's end label.
    pub fn break_target(&self) -> Option<String> {
        self.loops.last().map(LabelSet::end_label)
    }

    /// Where `continue` jumps: the innermost loop's condition label.
    pub fn continue_target(&self) -> Option<String> {
        self.loops.last().map(LabelSet::while_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stack_not_in_loop() {
        let stack = LoopStack::new();
        assert!(!stack.in_loop());
        assert_eq!(stack.loop_depth(), 0);
        assert_eq!(stack.break_target(), None);
        assert_eq!(stack.continue_target(), None);
    }

    #[test]
    fn nested_loops_bind_innermost() {
        let mut counter = LabelCounter::default();
        let mut stack = LoopStack::new();
        stack.enter_loop(counter.fresh());
        stack.enter_loop(counter.fresh());

        assert_eq!(stack.loop_depth(), 2);
        assert_eq!(stack.break_target().as_deref(), Some("_end_label1"));
        assert_eq!(stack.continue_target().as_deref(), Some("_while_cond_label1"));

        assert_eq!(stack.exit_loop(), Some(LabelSet(1)));
        assert_eq!(stack.break_target().as_deref(), Some("_end_label0"));
    }

    #[test]
    fn counter_is_monotonic() {
        let mut counter = LabelCounter::default();
        assert_eq!(counter.fresh().true_label(), "_true_label0");
        assert_eq!(counter.fresh().false_label(), "_false_label1");
        assert_eq!(counter.issued(), 2);
    }
}
