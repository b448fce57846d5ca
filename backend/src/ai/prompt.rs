//! Prompt construction for parenting-plan generation.

use shared::GeneratePlanRequest;

use crate::domain::models::{format_age, Child};

/// System and user messages for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanPrompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT: &str = "You are a world-class child development expert and parenting coach \
with 20+ years of experience. You provide evidence-based, practical, and personalized parenting \
advice that helps families thrive. Answer with a single JSON object matching the schema the user \
describes, with no surrounding prose.";

/// Build the plan prompt from a child profile and the caller's goals. The
/// model is told to reply with JSON matching [`super::AiPlanResponse`].
pub fn parenting_plan(child: &Child, age_months: i64, request: &GeneratePlanRequest) -> PlanPrompt {
    let mut user = format!(
        "As an expert child development specialist and parenting coach, create a comprehensive, \
         personalized parenting plan for a child with the following profile:\n\n\
         Child Profile:\n\
         - Name: {name}\n\
         - Age: {age} ({age_months} months total)\n\
         - Interests: {interests}\n\
         - Current challenges: {challenges}\n\
         - Parenting goals: {goals}\n",
        name = child.name,
        age = format_age(age_months),
        interests = child.interests.join(", "),
        challenges = request.challenges.join(", "),
        goals = request.parenting_goals.join(", "),
    );
    if let Some(context) = request.family_context.as_deref().filter(|c| !c.trim().is_empty()) {
        user.push_str(&format!("- Family context: {context}\n"));
    }
    user.push_str(&format!(
        "\nThe plan should span {timeline}. Focus on:\n\
         - Age-appropriate developmental milestones\n\
         - Building on the child's existing interests\n\
         - Addressing specific challenges mentioned\n\
         - Practical, actionable strategies\n\
         - Positive parenting approaches\n\
         - Building emotional connection\n\n\
         Reply with one JSON object, no markdown, shaped exactly like:\n\
         {{\n\
           \"title\": string,\n\
           \"description\": string,\n\
           \"goals\": {{\"primary\": string, \"secondary\": [string], \"timeline\": string}},\n\
           \"strategies\": {{\"daily\": [string], \"weekly\": [string], \"monthly\": [string]}},\n\
           \"timeline\": {{\"week1\": string, ...}},\n\
           \"activities\": [string],\n\
           \"tips\": [string]\n\
         }}\n",
        timeline = request.timeline.label(),
    ));

    PlanPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::PlanTimeline;

    #[test]
    fn prompt_mentions_profile_and_schema() {
        let mut child = Child::new("p1", "Leo", NaiveDate::from_ymd_opt(2022, 8, 1).unwrap());
        child.interests = vec!["music".into(), "animals".into()];
        let request = GeneratePlanRequest {
            child_id: child.id.clone(),
            parenting_goals: vec!["better sleep".into()],
            challenges: vec!["bedtime resistance".into()],
            family_context: Some("two working parents".into()),
            timeline: PlanTimeline::ThreeMonths,
        };

        let prompt = parenting_plan(&child, 24, &request);
        assert!(prompt.user.contains("Name: Leo"));
        assert!(prompt.user.contains("2 years 0 months"));
        assert!(prompt.user.contains("music, animals"));
        assert!(prompt.user.contains("bedtime resistance"));
        assert!(prompt.user.contains("two working parents"));
        assert!(prompt.user.contains("3 months"));
        assert!(prompt.user.contains("\"strategies\""));
        assert!(prompt.system.contains("JSON"));
    }

    #[test]
    fn empty_context_is_omitted() {
        let child = Child::new("p1", "Leo", NaiveDate::from_ymd_opt(2022, 8, 1).unwrap());
        let request = GeneratePlanRequest {
            child_id: child.id.clone(),
            parenting_goals: vec!["sharing".into()],
            challenges: vec![],
            family_context: Some("  ".into()),
            timeline: PlanTimeline::default(),
        };
        let prompt = parenting_plan(&child, 24, &request);
        assert!(!prompt.user.contains("Family context"));
    }
}
