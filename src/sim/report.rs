use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::state::{LoadTracker, Ticks, WorkerId};

/// The `k` workers with the most assignments, busiest first.
///
/// Keeps a min-heap of at most `k` `(count, worker)` pairs and evicts the
/// smallest on overflow, so among equal counts the larger worker ids survive
/// and are listed first.
pub fn top_k<I>(counts: I, k: usize) -> Vec<(WorkerId, u64)>
where
    I: IntoIterator<Item = (WorkerId, u64)>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut heap = BinaryHeap::new();
    for (worker, count) in counts {
        heap.push(Reverse((count, worker)));
        if heap.len() > k {
            heap.pop();
        }
    }

    let mut ranking = Vec::with_capacity(heap.len());
    while let Some(Reverse((count, worker))) = heap.pop() {
        ranking.push((worker, count));
    }
    ranking.reverse();
    ranking
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Documents that received a worker.
    pub total_assigned: u64,
    pub dropped: u64,
    /// `(worker, assigned)`, busiest first.
    pub ranking: Vec<(WorkerId, u64)>,
    /// Assignment count per worker, indexed by worker id.
    pub loads: Vec<u64>,
    pub mean_load: f64,
    pub mean_busy_ticks: f64,
    /// Time of the last processed event; `None` when there were no events.
    pub makespan: Option<Ticks>,
}

impl Report {
    pub fn new(
        load: &LoadTracker,
        top_k_workers: usize,
        dropped: u64,
        makespan: Option<Ticks>,
    ) -> Self {
        let mean_load = avg(load.iter().map(|w| w.assigned as f64));
        let mean_busy_ticks = avg(load.iter().map(|w| w.busy_ticks as f64));

        Self {
            total_assigned: load.total_assigned(),
            dropped,
            ranking: top_k(load.counts(), top_k_workers),
            loads: load.iter().map(|w| w.assigned).collect(),
            mean_load,
            mean_busy_ticks,
            makespan,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total documents processed = {}", self.total_assigned)?;
        writeln!(f, "Most worked indexers are:")?;
        for (worker, count) in &self.ranking {
            writeln!(f, "{worker}: {count} Documents")?;
        }
        Ok(())
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_busiest_workers() {
        let counts = vec![(0, 3), (1, 9), (2, 1), (3, 5)];
        assert_eq!(top_k(counts, 2), vec![(1, 9), (3, 5)]);
    }

    #[test]
    fn ties_favor_larger_worker_id() {
        let counts = vec![(0, 2), (1, 1), (2, 1)];
        assert_eq!(top_k(counts.clone(), 2), vec![(0, 2), (2, 1)]);
        assert_eq!(top_k(counts, 3), vec![(0, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn all_equal_counts_rank_by_descending_id() {
        let counts = (0..5).map(|w| (w, 4));
        assert_eq!(top_k(counts, 3), vec![(4, 4), (3, 4), (2, 4)]);
    }

    #[test]
    fn k_zero_or_empty_input() {
        assert!(top_k(vec![(0, 1)], 0).is_empty());
        assert!(top_k(Vec::<(WorkerId, u64)>::new(), 3).is_empty());
    }

    #[test]
    fn k_larger_than_workers_returns_all() {
        assert_eq!(top_k(vec![(0, 0), (1, 0)], 10), vec![(1, 0), (0, 0)]);
    }

    #[test]
    fn report_summarises_load() {
        let mut load = LoadTracker::new(3);
        load.record(0, 5);
        load.record(1, 4);
        load.record(2, 3);
        load.record(0, 2);

        let report = Report::new(&load, 2, 1, Some(9));
        assert_eq!(report.total_assigned, 4);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.loads, vec![2, 1, 1]);
        assert_eq!(report.ranking, vec![(0, 2), (2, 1)]);
        assert!((report.mean_load - 4.0 / 3.0).abs() < 1e-9);
        assert!((report.mean_busy_ticks - 14.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn report_text_format() {
        let mut load = LoadTracker::new(2);
        load.record(1, 1);
        let report = Report::new(&load, 2, 0, Some(1));

        assert_eq!(
            report.to_string(),
            "Total documents processed = 1\nMost worked indexers are:\n1: 1 Documents\n0: 0 Documents\n"
        );
    }
}
