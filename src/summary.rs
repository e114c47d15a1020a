//! Final run report.

/// Aggregated counts for one run.
///
/// `matched` and `deleted` differ whenever the delete phase reported
/// errors, the operator declined, or the run was a dry run (where
/// `deleted` is the projected count).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned: u64,
    pub matched: u64,
    pub deleted: u64,
    pub errors: u64,
    pub dry_run: bool,
}

impl RunSummary {
    /// Render the operator-facing report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Summary:\n");
        out.push_str(&format!("  Scanned: {}\n", self.scanned));
        out.push_str(&format!("  Matched: {}\n", self.matched));
        if self.dry_run {
            out.push_str(&format!(
                "  Deleted: {} (projected; dry run, nothing was removed)\n",
                self.deleted
            ));
        } else {
            out.push_str(&format!("  Deleted: {}\n", self.deleted));
        }
        out.push_str(&format!("  Errors:  {}\n", self.errors));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_actual_run() {
        let summary = RunSummary {
            scanned: 10_000,
            matched: 2500,
            deleted: 1500,
            errors: 1000,
            dry_run: false,
        };
        let report = summary.render();
        assert!(report.contains("Scanned: 10000"));
        assert!(report.contains("Matched: 2500"));
        assert!(report.contains("Deleted: 1500\n"));
        assert!(report.contains("Errors:  1000"));
        assert!(!report.contains("projected"));
    }

    #[test]
    fn test_render_dry_run_frames_deletions_as_projected() {
        let summary = RunSummary {
            scanned: 100,
            matched: 40,
            deleted: 40,
            errors: 0,
            dry_run: true,
        };
        let report = summary.render();
        assert!(report.contains("Deleted: 40 (projected"));
        assert!(report.contains("nothing was removed"));
    }
}
