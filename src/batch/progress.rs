use super::types::ItemResult;

/// Hook invoked after every item, in processing order, with a 1-based index
pub trait ProgressReporter {
    fn on_item(&mut self, current: usize, total: usize, result: &ItemResult);
}

impl<F> ProgressReporter for F
where
    F: FnMut(usize, usize, &ItemResult),
{
    fn on_item(&mut self, current: usize, total: usize, result: &ItemResult) {
        self(current, total, result)
    }
}

/// Reporter that ignores every tick
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_item(&mut self, _current: usize, _total: usize, _result: &ItemResult) {}
}
