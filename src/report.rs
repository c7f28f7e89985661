/*!
 * Result Aggregation
 *
 * Averages repeated cell totals and renders CSV rows. No median, no
 * variance; the mean across repeats is the whole statistical story.
 */

/// CSV header emitted once per sweep.
pub const CSV_HEADER: &str =
    "task,lock,threads,duration,repeats,cpu_parallel_iters,cpu_locked_iters,avg_ops,ops_s";

/// Arithmetic mean of per-repeat totals.
pub fn mean_ops(totals: &[u64]) -> f64 {
    if totals.is_empty() {
        return 0.0;
    }
    totals.iter().map(|&t| t as f64).sum::<f64>() / totals.len() as f64
}

/// One (lock, threads) cell of the sweep, aggregated across repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    pub task: &'static str,
    pub lock: &'static str,
    pub threads: usize,
    pub duration_secs: f64,
    pub repeats: usize,
    /// Zero when the task is `do_nothing`.
    pub cpu_parallel_iters: u32,
    /// Zero when the task is `do_nothing`.
    pub cpu_locked_iters: u32,
    pub avg_ops: f64,
}

impl CellRecord {
    /// Completed rounds per second, derived from the mean total.
    pub fn ops_per_sec(&self) -> f64 {
        self.avg_ops / self.duration_secs
    }

    /// Render one CSV row matching [`CSV_HEADER`].
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{:.2},{:.2}",
            self.task,
            self.lock,
            self.threads,
            self.duration_secs,
            self.repeats,
            self.cpu_parallel_iters,
            self.cpu_locked_iters,
            self.avg_ops,
            self.ops_per_sec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mean_of_totals() {
        assert_eq!(mean_ops(&[]), 0.0);
        assert_eq!(mean_ops(&[10]), 10.0);
        assert_eq!(mean_ops(&[1, 2, 4]), 7.0 / 3.0);
    }

    #[test]
    fn csv_row_matches_header_arity() {
        let record = CellRecord {
            task: "cpu_burn",
            lock: "ticket",
            threads: 8,
            duration_secs: 1.0,
            repeats: 3,
            cpu_parallel_iters: 2048,
            cpu_locked_iters: 32,
            avg_ops: 123456.5,
        };
        let row = record.to_csv_row();
        assert_eq!(
            row.split(',').count(),
            CSV_HEADER.split(',').count()
        );
        assert_eq!(
            row,
            "cpu_burn,ticket,8,1,3,2048,32,123456.50,123456.50"
        );
    }

    #[test]
    fn do_nothing_reports_zero_burn_iters() {
        let record = CellRecord {
            task: "do_nothing",
            lock: "mutex",
            threads: 1,
            duration_secs: 0.5,
            repeats: 1,
            cpu_parallel_iters: 0,
            cpu_locked_iters: 0,
            avg_ops: 1000.0,
        };
        assert_eq!(record.to_csv_row(), "do_nothing,mutex,1,0.5,1,0,0,1000.00,2000.00");
    }

    #[test]
    fn ops_per_sec_scales_with_window() {
        let record = CellRecord {
            task: "do_nothing",
            lock: "tas",
            threads: 2,
            duration_secs: 2.0,
            repeats: 5,
            cpu_parallel_iters: 0,
            cpu_locked_iters: 0,
            avg_ops: 500.0,
        };
        assert_eq!(record.ops_per_sec(), 250.0);
    }
}
