//! Candidate profile material merged into the conversation context.
//!
//! Every field is optional — the assembler substitutes hedged placeholder
//! sentences for missing sections rather than failing or omitting them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Factual candidate material fetched from external data providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub professional_summary: Option<String>,
    #[serde(default)]
    pub total_experience_years: Option<u32>,
    #[serde(default)]
    pub work_history: Vec<WorkHistoryEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
    /// Summaries derived from prior completed interviews.
    #[serde(default)]
    pub interview_briefs: Vec<InterviewBrief>,
}

impl CandidateProfile {
    /// Display name with the original system's fallback wording.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("the candidate")
    }
}

/// One role in the work-history timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkHistoryEntry {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// A skill with proficiency signals used for ordering before truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    /// 1–5, higher is stronger.
    #[serde(default)]
    pub proficiency: Option<u8>,
    #[serde(default)]
    pub last_used: Option<String>,
}

/// A brief distilled from a prior interview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewBrief {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub brief: String,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Situational context for a session: who is interviewing, for what.
/// Appended to the bundle only when at least one field is non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SituationalContext {
    #[serde(default)]
    pub recruiter_name: Option<String>,
    #[serde(default)]
    pub recruiter_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

impl SituationalContext {
    /// Whether any field carries content. An all-empty context produces
    /// no section header at all.
    pub fn is_empty(&self) -> bool {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().map(str::trim).unwrap_or("").is_empty()
        }
        blank(&self.recruiter_name)
            && blank(&self.recruiter_title)
            && blank(&self.company)
            && blank(&self.job_title)
            && blank(&self.job_description)
    }

    // Defaults matching the original recruiter-metadata fallbacks.

    pub fn recruiter_name_or_default(&self) -> &str {
        self.recruiter_name.as_deref().unwrap_or("the recruiter")
    }

    pub fn recruiter_title_or_default(&self) -> &str {
        self.recruiter_title.as_deref().unwrap_or("Hiring Manager")
    }

    pub fn company_or_default(&self) -> &str {
        self.company.as_deref().unwrap_or("the company")
    }

    pub fn job_title_or_default(&self) -> &str {
        self.job_title.as_deref().unwrap_or("this position")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_detected() {
        let ctx = SituationalContext::default();
        assert!(ctx.is_empty());

        let ctx = SituationalContext {
            company: Some("   ".into()),
            ..Default::default()
        };
        assert!(ctx.is_empty());

        let ctx = SituationalContext {
            company: Some("Acme".into()),
            ..Default::default()
        };
        assert!(!ctx.is_empty());
    }
}
