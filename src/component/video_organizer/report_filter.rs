//! 報表列篩選
//!
//! 各條件之間為 AND；`tiers` 為空時不限解析度

use super::batch_pipeline::{BatchOutcome, ReportRow};
use crate::tools::ResolutionTier;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// 符合其中任一解析度即可
    pub tiers: Vec<ResolutionTier>,
    pub require_device: bool,
    pub require_gps: bool,
    pub duplicates_only: bool,
}

impl ReportFilter {
    #[must_use]
    pub fn duplicates() -> Self {
        Self {
            duplicates_only: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn matches(&self, row: &ReportRow) -> bool {
        if !self.tiers.is_empty() && !self.tiers.contains(&row.resolution) {
            return false;
        }
        if self.require_device && row.device_model.is_none() {
            return false;
        }
        if self.require_gps && !row.has_gps {
            return false;
        }
        !self.duplicates_only || row.is_duplicate
    }
}

impl BatchOutcome {
    /// 依篩選條件取出報表列，保持輸入順序
    #[must_use]
    pub fn filtered_rows(&self, filter: &ReportFilter) -> Vec<ReportRow> {
        self.report_rows()
            .into_iter()
            .filter(|row| filter.matches(row))
            .collect()
    }
}
