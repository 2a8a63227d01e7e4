use crate::models::{AgentProfile, StageKind, StageSpec};

/// Separator placed between upstream stage outputs in the context block
pub const CONTEXT_DIVIDER: &str = "\n\n----------\n\n";

/// Fixed persona for each stage
pub fn agent_profile(kind: StageKind) -> AgentProfile {
    let (role, goal, backstory) = match kind {
        StageKind::Location => (
            "Travel Trip Expert",
            "Gathers helpful information about the city during travel.",
            "A seasoned traveler who has explored various destinations and knows the ins and outs of travel logistics.",
        ),
        StageKind::Guide => (
            "City Local Guide Expert",
            "Provides information on things to do in the city based on the user's interests.",
            "A local expert with a passion for sharing the best experiences and hidden gems of their city.",
        ),
        StageKind::Planner => (
            "Travel Planning Expert",
            "Compiles all gathered information to provide a comprehensive travel plan.",
            "An organizational wizard who can turn a list of possibilities into a seamless itinerary.",
        ),
    };

    AgentProfile {
        role: role.to_string(),
        goal: goal.to_string(),
        backstory: backstory.to_string(),
    }
}

/// System prompt carrying the stage persona
pub fn build_system_prompt(agent: &AgentProfile) -> String {
    format!(
        "You are {}. {}\nYour personal goal is: {}",
        agent.role, agent.backstory, agent.goal
    )
}

/// User prompt: task, expected answer, then upstream results if any
pub fn build_user_prompt(spec: &StageSpec) -> String {
    let mut prompt = String::new();

    prompt.push_str("Current Task: ");
    prompt.push_str(spec.description.trim());
    prompt.push_str("\n\n");

    prompt.push_str("This is the expected criteria for your final answer: ");
    prompt.push_str(&spec.expected_output);
    prompt.push('\n');
    prompt.push_str(
        "You MUST return the actual complete content as the final answer, not a summary.\n",
    );

    if !spec.context.is_empty() {
        let context: Vec<&str> = spec.context.iter().map(|r| r.text.as_str()).collect();
        prompt.push_str("\nThis is the context you're working with:\n");
        prompt.push_str(&context.join(CONTEXT_DIVIDER));
        prompt.push('\n');
    }

    prompt.push_str("\nBegin!");
    prompt
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::models::StageResult;

    fn spec(context: Vec<StageResult>) -> StageSpec {
        StageSpec {
            kind: StageKind::Planner,
            agent: agent_profile(StageKind::Planner),
            description: "\n  Plan a trip to Rome.\n  ".to_string(),
            expected_output: "Full travel itinerary in Markdown format.".to_string(),
            context,
            output_path: PathBuf::from("travel_plan.md"),
        }
    }

    #[test]
    fn test_system_prompt_uses_profile() {
        let prompt = build_system_prompt(&agent_profile(StageKind::Guide));
        assert!(prompt.starts_with("You are City Local Guide Expert."));
        assert!(prompt.contains("hidden gems"));
        assert!(prompt.contains("Your personal goal is: Provides information"));
    }

    #[test]
    fn test_user_prompt_without_context() {
        let prompt = build_user_prompt(&spec(vec![]));
        assert!(prompt.starts_with("Current Task: Plan a trip to Rome.\n\n"));
        assert!(prompt.contains("Full travel itinerary in Markdown format."));
        assert!(!prompt.contains("context you're working with"));
        assert!(prompt.ends_with("Begin!"));
    }

    #[test]
    fn test_user_prompt_keeps_context_order() {
        let prompt = build_user_prompt(&spec(vec![
            StageResult::new(StageKind::Location, "CITY REPORT"),
            StageResult::new(StageKind::Guide, "GUIDE REPORT"),
        ]));

        let city = prompt.find("CITY REPORT").unwrap();
        let guide = prompt.find("GUIDE REPORT").unwrap();
        assert!(city < guide);
        assert!(prompt.contains("CITY REPORT\n\n----------\n\nGUIDE REPORT"));
    }
}
