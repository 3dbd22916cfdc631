//! Machine-readable assembly report, emitted alongside the bundle.

use serde::Serialize;

/// Per-section assembly stats.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub name: String,
    pub raw_chars: usize,
    pub injected_chars: usize,
    pub placeholder: bool,
    pub truncated: bool,
    pub truncated_total_cap: bool,
}

/// Full report for one assembled bundle.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    pub sections: Vec<SectionReport>,
    pub situational_included: bool,
    pub total_chars: usize,
}

impl AssemblyReport {
    pub fn placeholder_count(&self) -> usize {
        self.sections.iter().filter(|s| s.placeholder).count()
    }

    pub fn truncated_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.truncated || s.truncated_total_cap)
            .count()
    }
}
