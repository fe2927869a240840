use std::time::{Duration, Instant};

use tracing::debug;

/// Prints `processed/total` plus the time since the previous report every
/// `batch` records.
pub struct BatchProgress {
    label: &'static str,
    batch: usize,
    total: usize,
    count: usize,
    last_report: Instant,
}

impl BatchProgress {
    pub fn new(label: &'static str, batch: usize, total: usize) -> Self {
        Self {
            label,
            batch: batch.max(1),
            total,
            count: 0,
            last_report: Instant::now(),
        }
    }

    /// Count one processed record. Returns the report line when a batch
    /// boundary was crossed.
    pub fn tick(&mut self) -> Option<String> {
        self.count += 1;
        if self.count % self.batch != 0 {
            return None;
        }
        let elapsed = self.last_report.elapsed();
        self.last_report = Instant::now();
        let line = format!(
            "{} {}/{}: {:.3}s",
            self.label,
            self.count,
            self.total,
            elapsed.as_secs_f64()
        );
        debug!(label = self.label, count = self.count, total = self.total, "batch done");
        println!("{}", line);
        Some(line)
    }
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_on_batch_boundaries_only() {
        let mut p = BatchProgress::new("concepts", 3, 7);
        let reports: Vec<_> = (0..7).filter_map(|_| p.tick()).collect();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].starts_with("concepts 3/7: "));
        assert!(reports[1].starts_with("concepts 6/7: "));
        assert!(p.tick().is_none());
        assert!(p.tick().unwrap().starts_with("concepts 9/7: "));
    }

    #[test]
    fn zero_batch_is_treated_as_one() {
        let mut p = BatchProgress::new("x", 0, 2);
        assert!(p.tick().is_some());
        assert!(p.tick().is_some());
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(184)), "3m 4s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 2m 3s");
    }
}
