//! Progress reporting for image downloads (KiB done, rate, ETA).
//!
//! The download path sends snapshots through a channel; the CLI prints them.
//! Totals come from the `content-length` header and are 0 when the server
//! does not declare one.

/// Snapshot of download progress for one file (CLI-friendly).
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Filename being written (for display).
    pub file: String,
    /// Bytes written so far.
    pub bytes_done: u64,
    /// Total size in bytes from `content-length`; 0 when unknown.
    pub total_bytes: u64,
    /// Elapsed time since this fetch started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// KiB written so far.
    pub fn kib_done(&self) -> u64 {
        self.bytes_done / 1024
    }

    /// Total KiB, 0 when the size is unknown.
    pub fn kib_total(&self) -> u64 {
        self.total_bytes / 1024
    }

    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if the total or rate is unknown).
    pub fn eta_secs(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            return None;
        }
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0]; 1.0 when the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(done: u64, total: u64, elapsed: f64) -> ProgressStats {
        ProgressStats {
            file: "pics_abc123.png".to_string(),
            bytes_done: done,
            total_bytes: total,
            elapsed_secs: elapsed,
        }
    }

    #[test]
    fn kib_conversion() {
        let s = stats(10 * 1024, 100 * 1024, 1.0);
        assert_eq!(s.kib_done(), 10);
        assert_eq!(s.kib_total(), 100);
    }

    #[test]
    fn rate_and_eta() {
        let s = stats(50 * 1024, 100 * 1024, 2.0);
        assert!((s.bytes_per_sec() - 25.0 * 1024.0).abs() < 1e-6);
        let eta = s.eta_secs().unwrap();
        assert!((eta - 2.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_total() {
        let s = stats(4096, 0, 1.0);
        assert_eq!(s.kib_total(), 0);
        assert!(s.eta_secs().is_none());
        assert!((s.fraction() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_elapsed_has_zero_rate() {
        let s = stats(1024, 2048, 0.0);
        assert_eq!(s.bytes_per_sec(), 0.0);
        assert!(s.eta_secs().is_none());
    }
}
