//! The context assembler: persona + facts + situational context,
//! size-bounded, never failing.

use vv_domain::config::ContextConfig;
use vv_domain::interview::InterviewKind;
use vv_domain::profile::{CandidateProfile, SituationalContext};
use vv_domain::trace::TraceEvent;

use crate::facts;
use crate::persona::PersonaTemplate;
use crate::report::{AssemblyReport, SectionReport};
use crate::truncation::{self, Section};

/// The assembled configuration handed to the provider. Immutable after
/// assembly; discarded once the session is provisioned.
#[derive(Debug, Clone)]
pub struct ContextBundle {
    pub kind: InterviewKind,
    /// The full instruction text (persona + facts + situational).
    pub instructions: String,
    pub report: AssemblyReport,
}

/// Deterministic assembler. Accepts pre-fetched profile data and config
/// caps; produces the bundle and a machine-readable report.
pub struct ContextAssembler {
    caps: ContextConfig,
}

impl ContextAssembler {
    pub fn new(caps: ContextConfig) -> Self {
        Self { caps }
    }

    /// Assemble the bundle for one session.
    ///
    /// Missing profile sources become hedged placeholder sections; the
    /// situational section is appended only when at least one field is
    /// non-empty. This function has no failure path.
    pub fn assemble(
        &self,
        session_id: &str,
        profile: &CandidateProfile,
        kind: InterviewKind,
        situational: &SituationalContext,
    ) -> ContextBundle {
        let template = PersonaTemplate::for_kind(kind);

        let mut sections: Vec<Section> = Vec::new();

        // Persona first — it must survive the total cap.
        let persona = template.render(profile, situational);
        sections.push(Section {
            name: "persona".into(),
            raw_chars: persona.len(),
            content: persona,
            truncated: false,
            truncated_total_cap: false,
            placeholder: false,
        });

        // Fact sections, each individually capped by construction.
        for fact in facts::render_sections(profile, &self.caps) {
            sections.push(Section {
                name: fact.name.into(),
                raw_chars: fact.content.len(),
                content: fact.content,
                truncated: false,
                truncated_total_cap: false,
                placeholder: fact.placeholder,
            });
        }

        // Situational context only when something is present — never an
        // empty section header.
        let situational_included = !situational.is_empty();
        if situational_included {
            let raw = render_situational(situational, &self.caps);
            sections.push(Section {
                name: "situational".into(),
                raw_chars: raw.0,
                content: raw.1,
                truncated: raw.2,
                truncated_total_cap: false,
                placeholder: false,
            });
        }

        truncation::apply_total_cap(&mut sections, self.caps.max_total_chars);

        let mut instructions = String::from("<system>\n");
        let mut section_reports = Vec::with_capacity(sections.len());
        for section in &sections {
            section_reports.push(SectionReport {
                name: section.name.clone(),
                raw_chars: section.raw_chars,
                injected_chars: section.content.len(),
                placeholder: section.placeholder,
                truncated: section.truncated,
                truncated_total_cap: section.truncated_total_cap,
            });
            if !section.content.is_empty() {
                instructions.push_str(&section.content);
                instructions.push('\n');
            }
        }
        instructions.push_str("</system>");

        let report = AssemblyReport {
            sections: section_reports,
            situational_included,
            total_chars: instructions.len(),
        };

        TraceEvent::ContextAssembled {
            session_id: session_id.to_owned(),
            kind: kind.as_str().to_owned(),
            total_chars: report.total_chars,
            sections: report.sections.len(),
            sections_placeholder: report.placeholder_count(),
            sections_truncated: report.truncated_count(),
            situational_included,
        }
        .emit();

        ContextBundle {
            kind,
            instructions,
            report,
        }
    }
}

/// Render the situational section: (raw_chars, content, jd_truncated).
fn render_situational(
    situational: &SituationalContext,
    caps: &ContextConfig,
) -> (usize, String, bool) {
    let mut out = String::from("<interview_context>\n");
    let mut raw = 0usize;
    let mut truncated = false;

    if let Some(name) = situational.recruiter_name.as_deref().filter(|s| !s.trim().is_empty()) {
        raw += name.len();
        out.push_str(&format!(
            "Interviewer: {name}, {}\n",
            situational.recruiter_title_or_default()
        ));
    }
    if let Some(company) = situational.company.as_deref().filter(|s| !s.trim().is_empty()) {
        raw += company.len();
        out.push_str(&format!("Company: {company}\n"));
    }
    if let Some(job) = situational.job_title.as_deref().filter(|s| !s.trim().is_empty()) {
        raw += job.len();
        out.push_str(&format!("Target role: {job}\n"));
    }
    if let Some(jd) = situational.job_description.as_deref().filter(|s| !s.trim().is_empty()) {
        raw += jd.len();
        let (capped, was_truncated) =
            truncation::truncate_section(jd, caps.max_job_description_chars);
        truncated = was_truncated;
        out.push_str("Job description:\n");
        out.push_str(&capped);
        out.push('\n');
    }
    out.push_str("</interview_context>");
    (raw, out, truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> ContextAssembler {
        ContextAssembler::new(ContextConfig::default())
    }

    #[test]
    fn assembly_never_fails_on_empty_inputs() {
        let bundle = assembler().assemble(
            "s1",
            &CandidateProfile::default(),
            InterviewKind::General,
            &SituationalContext::default(),
        );
        assert!(bundle.instructions.starts_with("<system>"));
        assert!(bundle.instructions.ends_with("</system>"));
        // All fact sections present as placeholders, no situational.
        assert_eq!(bundle.report.placeholder_count(), 4);
        assert!(!bundle.report.situational_included);
        assert!(!bundle.instructions.contains("<interview_context>"));
    }

    #[test]
    fn situational_appended_when_any_field_present() {
        let situational = SituationalContext {
            company: Some("Acme".into()),
            ..Default::default()
        };
        let bundle = assembler().assemble(
            "s1",
            &CandidateProfile::default(),
            InterviewKind::RoleExperience,
            &situational,
        );
        assert!(bundle.report.situational_included);
        assert!(bundle.instructions.contains("Company: Acme"));
    }

    #[test]
    fn long_job_description_is_capped() {
        let situational = SituationalContext {
            job_description: Some("x".repeat(50_000)),
            ..Default::default()
        };
        let bundle = assembler().assemble(
            "s1",
            &CandidateProfile::default(),
            InterviewKind::RecruiterScreening,
            &situational,
        );
        assert!(bundle.instructions.len() <= ContextConfig::default().max_total_chars + 64);
    }

    #[test]
    fn total_cap_bounds_the_bundle() {
        let caps = ContextConfig {
            max_total_chars: 500,
            ..Default::default()
        };
        let profile = CandidateProfile {
            professional_summary: Some("s".repeat(2_000)),
            ..Default::default()
        };
        let bundle = ContextAssembler::new(caps).assemble(
            "s1",
            &profile,
            InterviewKind::General,
            &SituationalContext::default(),
        );
        // 500 cap + tag overhead + truncation markers.
        assert!(bundle.instructions.len() < 700);
    }
}
