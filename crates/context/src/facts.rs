//! Factual candidate sections: summary, work history, skills, prior
//! interview briefs.
//!
//! Each source is optional. A missing source renders a hedged placeholder
//! sentence instead of disappearing, so the assembled prompt always keeps
//! the same structure.

use vv_domain::config::ContextConfig;
use vv_domain::profile::{CandidateProfile, InterviewBrief, SkillEntry, WorkHistoryEntry};

/// A rendered fact section plus whether it fell back to a placeholder.
pub struct FactSection {
    pub name: &'static str,
    pub content: String,
    pub placeholder: bool,
}

/// Render all fact sections in bundle order.
pub fn render_sections(profile: &CandidateProfile, caps: &ContextConfig) -> Vec<FactSection> {
    vec![
        summary_section(profile),
        work_history_section(&profile.work_history, caps),
        skills_section(&profile.skills, caps),
        briefs_section(&profile.interview_briefs, caps),
    ]
}

fn summary_section(profile: &CandidateProfile) -> FactSection {
    match profile.professional_summary.as_deref().map(str::trim) {
        Some(summary) if !summary.is_empty() => FactSection {
            name: "summary",
            content: format!("<summary>\n{summary}\n</summary>"),
            placeholder: false,
        },
        _ => {
            // Fallback sentence assembled from whatever identity fields exist,
            // mirroring the original fact tool's wording.
            let name = profile.display_name();
            let title = profile.job_title.as_deref().unwrap_or("professional");
            let years = profile
                .total_experience_years
                .map(|y| y.to_string())
                .unwrap_or_else(|| "several".into());
            FactSection {
                name: "summary",
                content: format!(
                    "<summary>\n{name} is a {title} with {years} years of \
                     experience. A detailed professional summary is not on \
                     file.\n</summary>"
                ),
                placeholder: true,
            }
        }
    }
}

fn work_history_section(history: &[WorkHistoryEntry], caps: &ContextConfig) -> FactSection {
    if history.is_empty() {
        return FactSection {
            name: "work_history",
            content: "<work_history>\nNo verified work history is on file; \
                      speak only in general terms about professional \
                      experience.\n</work_history>"
                .into(),
            placeholder: true,
        };
    }

    // Most recent roles first; the profile source already orders the
    // timeline, so truncation keeps the head.
    let mut out = String::from("<work_history>\n");
    for role in history.iter().take(caps.max_roles) {
        let period = match (&role.start, &role.end) {
            (Some(s), Some(e)) => format!(" ({s} – {e})"),
            (Some(s), None) => format!(" ({s} – present)"),
            _ => String::new(),
        };
        out.push_str(&format!("- {} at {}{}\n", role.title, role.company, period));
        for achievement in role.achievements.iter().take(caps.max_achievements_per_role) {
            out.push_str(&format!("  * {achievement}\n"));
        }
    }
    out.push_str("</work_history>");
    FactSection {
        name: "work_history",
        content: out,
        placeholder: false,
    }
}

fn skills_section(skills: &[SkillEntry], caps: &ContextConfig) -> FactSection {
    if skills.is_empty() {
        return FactSection {
            name: "skills",
            content: "<skills>\nNo verified skill list is on file.\n</skills>".into(),
            placeholder: true,
        };
    }

    // Strongest first: proficiency desc, then years desc.
    let mut ordered: Vec<&SkillEntry> = skills.iter().collect();
    ordered.sort_by(|a, b| {
        b.proficiency
            .unwrap_or(0)
            .cmp(&a.proficiency.unwrap_or(0))
            .then(b.years_of_experience.unwrap_or(0).cmp(&a.years_of_experience.unwrap_or(0)))
    });

    let mut out = String::from("<skills>\n");
    for skill in ordered.iter().take(caps.max_skills) {
        out.push_str(&format!("- {}", skill.name));
        if let Some(years) = skill.years_of_experience {
            out.push_str(&format!(" — {years} years"));
        }
        if let Some(last) = &skill.last_used {
            out.push_str(&format!(", last used {last}"));
        }
        out.push('\n');
    }
    out.push_str("</skills>");
    FactSection {
        name: "skills",
        content: out,
        placeholder: false,
    }
}

fn briefs_section(briefs: &[InterviewBrief], caps: &ContextConfig) -> FactSection {
    if briefs.is_empty() {
        return FactSection {
            name: "interview_briefs",
            content: "<interview_briefs>\nNo insights from previous interviews \
                      are available yet.\n</interview_briefs>"
                .into(),
            placeholder: true,
        };
    }

    // Newest first before the cap.
    let mut ordered: Vec<&InterviewBrief> = briefs.iter().collect();
    ordered.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

    let mut out = String::from("<interview_briefs>\n");
    for brief in ordered.iter().take(caps.max_briefs) {
        match (&brief.job_title, &brief.company) {
            (Some(title), Some(company)) => {
                out.push_str(&format!("- [{title} at {company}] {}\n", brief.brief));
            }
            _ => out.push_str(&format!("- {}\n", brief.brief)),
        }
    }
    out.push_str("</interview_briefs>");
    FactSection {
        name: "interview_briefs",
        content: out,
        placeholder: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps() -> ContextConfig {
        ContextConfig::default()
    }

    #[test]
    fn empty_profile_renders_all_placeholders() {
        let sections = render_sections(&CandidateProfile::default(), &caps());
        assert_eq!(sections.len(), 4);
        assert!(sections.iter().all(|s| s.placeholder));
        // Structurally well-formed: every section still has its tags.
        assert!(sections[0].content.starts_with("<summary>"));
        assert!(sections[1].content.starts_with("<work_history>"));
    }

    #[test]
    fn achievements_capped_per_role() {
        let profile = CandidateProfile {
            work_history: vec![WorkHistoryEntry {
                company: "Acme".into(),
                title: "Engineer".into(),
                start: Some("2019".into()),
                end: None,
                achievements: (0..10).map(|i| format!("achievement {i}")).collect(),
            }],
            ..Default::default()
        };
        let sections = render_sections(&profile, &caps());
        let wh = &sections[1].content;
        assert!(wh.contains("achievement 0"));
        assert!(wh.contains("achievement 2"));
        assert!(!wh.contains("achievement 3"));
    }

    #[test]
    fn skills_ordered_by_proficiency_before_cap() {
        let mut skills: Vec<SkillEntry> = (0..20)
            .map(|i| SkillEntry {
                name: format!("skill{i}"),
                years_of_experience: Some(i),
                proficiency: Some((i % 5) as u8 + 1),
                last_used: None,
            })
            .collect();
        // The strongest skill sits at the end of the input.
        skills.push(SkillEntry {
            name: "strongest".into(),
            years_of_experience: Some(15),
            proficiency: Some(5),
            last_used: Some("2026".into()),
        });
        let profile = CandidateProfile {
            skills,
            ..Default::default()
        };
        let sections = render_sections(&profile, &caps());
        let rendered = &sections[2].content;
        assert!(rendered.contains("strongest"));
        // Cap of 12 drops the weakest entries.
        assert!(rendered.lines().filter(|l| l.starts_with("- ")).count() <= 12);
    }

    #[test]
    fn summary_fallback_uses_identity_fields() {
        let profile = CandidateProfile {
            full_name: Some("Dana Reyes".into()),
            job_title: Some("Data Engineer".into()),
            total_experience_years: Some(7),
            ..Default::default()
        };
        let sections = render_sections(&profile, &caps());
        assert!(sections[0].placeholder);
        assert!(sections[0]
            .content
            .contains("Dana Reyes is a Data Engineer with 7 years"));
    }
}
