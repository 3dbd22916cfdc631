use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Context assembly caps
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Size bounds for the assembled conversation context. Lists are ordered
/// by priority (recency, proficiency) before truncation, so dropping the
/// tail loses the least relevant material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Achievements kept per work-history role.
    #[serde(default = "d_3u")]
    pub max_achievements_per_role: usize,
    /// Work-history roles kept, most recent first.
    #[serde(default = "d_5u")]
    pub max_roles: usize,
    /// Skills kept, strongest proficiency first.
    #[serde(default = "d_12u")]
    pub max_skills: usize,
    /// Prior-interview briefs kept, newest first.
    #[serde(default = "d_3u")]
    pub max_briefs: usize,
    /// Char cap applied to the job description alone.
    #[serde(default = "d_2000u")]
    pub max_job_description_chars: usize,
    /// Char cap on the whole assembled bundle.
    #[serde(default = "d_16000u")]
    pub max_total_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_achievements_per_role: 3,
            max_roles: 5,
            max_skills: 12,
            max_briefs: 3,
            max_job_description_chars: 2_000,
            max_total_chars: 16_000,
        }
    }
}

fn d_3u() -> usize {
    3
}

fn d_5u() -> usize {
    5
}

fn d_12u() -> usize {
    12
}

fn d_2000u() -> usize {
    2_000
}

fn d_16000u() -> usize {
    16_000
}
