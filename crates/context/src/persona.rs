//! Persona templates keyed by interview kind.
//!
//! Each template fixes who the AI plays: for role-experience, work-style
//! and general interviews the AI speaks in first person *as* the
//! candidate's digital twin; for recruiter screening it plays an
//! interviewer asking the subject questions.

use vv_domain::interview::InterviewKind;
use vv_domain::profile::{CandidateProfile, SituationalContext};

/// The fixed instruction framing for one interview kind.
#[derive(Debug, Clone)]
pub struct PersonaTemplate {
    pub kind: InterviewKind,
    /// True when the AI role-plays the subject; false when it interviews
    /// the subject.
    pub ai_is_subject: bool,
}

impl PersonaTemplate {
    /// Select the template for an interview kind. Closed set of four.
    pub fn for_kind(kind: InterviewKind) -> Self {
        Self {
            kind,
            ai_is_subject: kind.ai_plays_subject(),
        }
    }

    /// Render the persona section of the context bundle.
    pub fn render(&self, profile: &CandidateProfile, situational: &SituationalContext) -> String {
        if self.ai_is_subject {
            self.render_subject_persona(profile, situational)
        } else {
            self.render_interviewer_persona(profile)
        }
    }

    fn render_subject_persona(
        &self,
        profile: &CandidateProfile,
        situational: &SituationalContext,
    ) -> String {
        let name = profile.display_name();
        let focus = match self.kind {
            InterviewKind::RoleExperience => {
                "This conversation focuses on your roles, responsibilities and \
                 concrete achievements. Provide specific examples from your work \
                 history when asked."
            }
            InterviewKind::WorkStyle => {
                "This conversation focuses on your work style, collaboration \
                 preferences and how you operate in a team. Keep answers \
                 reflective and grounded in real situations."
            }
            _ => {
                "This is a general professional conversation about your \
                 background and career."
            }
        };

        format!(
            "<role>\n\
             You are {name}, a professional being interviewed by {recruiter}, \
             {title} at {company} for the {job} role.\n\
             You embody this candidate's actual background, experience, and \
             personality. You speak naturally in first person as the candidate \
             themselves.\n\
             {focus}\n\
             CRITICAL: Only state facts present in your verified background \
             below. NEVER invent or assume information. If the background does \
             not cover something, say you don't have that information in your \
             profile.\n\
             Do NOT discuss salary expectations or numbers, or anything not in \
             your verified background.\n\
             If asked about experience you don't have, be honest but bridge to \
             transferable skills. Ask clarifying questions when appropriate. Be \
             conversational but professional.\n\
             When the other party is speaking, use natural acknowledgments \
             (\"I see\", \"right\", \"mm-hmm\") to show you're listening.\n\
             Remember: You ARE the candidate, not an AI assistant. No robotic \
             responses or third-person references.\n\
             </role>",
            name = name,
            recruiter = situational.recruiter_name_or_default(),
            title = situational.recruiter_title_or_default(),
            company = situational.company_or_default(),
            job = situational.job_title_or_default(),
            focus = focus,
        )
    }

    fn render_interviewer_persona(&self, profile: &CandidateProfile) -> String {
        let name = profile.display_name();
        format!(
            "<role>\n\
             You are conducting a screening interview with {name}. You have \
             access to their complete profile below, including experience, \
             skills and education.\n\
             Ask focused screening questions, one at a time, and follow up on \
             answers with specifics from the profile. Keep a professional, \
             friendly tone.\n\
             Only reference facts present in the profile. If the profile does \
             not cover a topic, note that it is not on file rather than \
             guessing.\n\
             </role>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screening_interviews_the_subject() {
        let t = PersonaTemplate::for_kind(InterviewKind::RecruiterScreening);
        assert!(!t.ai_is_subject);
    }

    #[test]
    fn twin_kinds_speak_as_the_subject() {
        for kind in [
            InterviewKind::RoleExperience,
            InterviewKind::WorkStyle,
            InterviewKind::General,
        ] {
            assert!(PersonaTemplate::for_kind(kind).ai_is_subject, "{kind}");
        }
    }

    #[test]
    fn subject_persona_uses_situational_defaults() {
        let t = PersonaTemplate::for_kind(InterviewKind::RoleExperience);
        let rendered = t.render(&CandidateProfile::default(), &SituationalContext::default());
        assert!(rendered.contains("the candidate"));
        assert!(rendered.contains("the recruiter"));
        assert!(rendered.contains("Hiring Manager"));
        assert!(rendered.contains("this position"));
    }

    #[test]
    fn subject_persona_names_the_candidate() {
        let t = PersonaTemplate::for_kind(InterviewKind::General);
        let profile = CandidateProfile {
            full_name: Some("Dana Reyes".into()),
            ..Default::default()
        };
        let rendered = t.render(&profile, &SituationalContext::default());
        assert!(rendered.contains("You are Dana Reyes"));
    }
}
