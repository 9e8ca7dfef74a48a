use std::sync::Arc;
use std::time::Duration;

use rostrum_core::{Agent, AgentRole, DebateSide, ModelConfig, Speaker};
use rostrum_debate::{
    DebateConfig, DebateTask, FeedbackTask, ScriptedInput, TaskConfig, TerminationReason,
    TurnTask, ARGUMENT_PROMPT,
};
use rostrum_llm::MockProvider;

fn debater(role: AgentRole, system: &str, provider: Arc<MockProvider>, config: TaskConfig) -> TurnTask {
    TurnTask::new(Agent::new(role, system, ModelConfig::new("mock")), provider, config)
}

fn interactive_debate(
    side: DebateSide,
    input: ScriptedInput,
    turns: Option<u32>,
) -> (DebateTask, Arc<MockProvider>, Arc<MockProvider>) {
    let config = DebateConfig {
        turns,
        llm_delegate: false,
        ..DebateConfig::default()
    };
    let primary_provider = Arc::new(MockProvider::smart().with_latency(0));
    let nested_provider = Arc::new(MockProvider::smart().with_latency(0));

    let primary = debater(
        side.role(),
        "You argue in favor of the motion.",
        primary_provider.clone(),
        TaskConfig::default(),
    );
    let nested = debater(
        side.opposite().role(),
        "You argue against the motion.",
        nested_provider.clone(),
        TaskConfig::single_round(),
    );

    let debate = DebateTask::new(side, primary, nested, Arc::new(input), config);
    (debate, primary_provider, nested_provider)
}

#[tokio::test]
async fn test_autonomous_debate_transcripts() {
    let config = DebateConfig {
        turns: Some(4),
        ..DebateConfig::default()
    };
    let pro = debater(
        AgentRole::Pro,
        "You argue in favor of the motion.",
        Arc::new(MockProvider::smart().with_latency(0)),
        TaskConfig::default(),
    );
    let con = debater(
        AgentRole::Con,
        "You argue against the motion.",
        Arc::new(MockProvider::smart().with_latency(0)),
        TaskConfig::single_round(),
    );
    let mut debate =
        DebateTask::new(DebateSide::Pro, pro, con, Arc::new(ScriptedInput::new()), config);

    let outcome = debate.run().await;
    assert_eq!(outcome.cycles_completed, 4);
    assert_eq!(outcome.last_speaker, DebateSide::Con);

    let con_history = debate.agent(DebateSide::Con).history();
    assert_eq!(con_history.len(), 8);
    for pair in con_history.records().chunks(2) {
        assert_eq!(pair[0].speaker, Speaker::Agent(AgentRole::Pro));
        assert_eq!(pair[1].speaker, Speaker::Agent(AgentRole::Con));
    }

    let pro_history = debate.agent(DebateSide::Pro).history();
    assert_eq!(pro_history.records()[0].speaker, Speaker::Moderator);
    assert_eq!(pro_history.records()[0].content, "get started");
    assert_eq!(pro_history.len(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_interactive_runs_one_round() {
    let input = ScriptedInput::new()
        .reply_after(Duration::from_secs(5), "Remote work reduces commute emissions.");
    let (mut debate, primary_provider, nested_provider) =
        interactive_debate(DebateSide::Pro, input, Some(2));

    let outcome = debate.run().await;

    assert_eq!(outcome.cycles_completed, 1);
    assert_eq!(outcome.termination, TerminationReason::TurnBudgetExhausted);
    assert_eq!(outcome.last_speaker, DebateSide::Pro);
    assert_eq!(primary_provider.calls(), 0);
    assert_eq!(nested_provider.calls(), 1);

    let pro = debate.agent(DebateSide::Pro);
    assert!(pro.source().is_human());
    assert_eq!(pro.history().len(), 2);
    assert_eq!(pro.history().records()[0].speaker, Speaker::Human(AgentRole::Pro));
    assert_eq!(
        pro.history().records()[0].content,
        "Remote work reduces commute emissions."
    );
    assert_eq!(pro.history().records()[1].speaker, Speaker::Agent(AgentRole::Con));
}

#[tokio::test(start_paused = true)]
async fn test_no_response_then_feedback_still_runs() {
    let (mut debate, primary_provider, nested_provider) =
        interactive_debate(DebateSide::Con, ScriptedInput::new().silence(), Some(3));

    let outcome = debate.run().await;
    assert_eq!(outcome.termination, TerminationReason::NoResponse);
    assert_eq!(outcome.cycles_completed, 0);
    assert_eq!(outcome.last_speaker, DebateSide::Pro);
    assert_eq!(primary_provider.calls() + nested_provider.calls(), 0);

    let judge_provider = Arc::new(MockProvider::smart().with_latency(0));
    let mut feedback = FeedbackTask::new(
        Agent::new(AgentRole::Feedback, "You are the judge.", ModelConfig::new("mock").for_feedback()),
        judge_provider.clone(),
    );
    let report = feedback
        .run(debate.agent(outcome.last_speaker).history().records())
        .await
        .unwrap();

    assert!(report.degraded);
    assert!(!report.judgment.is_empty());
    assert_eq!(judge_provider.calls(), 1);
}

#[tokio::test]
async fn test_exit_reply_ends_before_first_turn() {
    for reply in ["done", " F "] {
        let input = ScriptedInput::new().reply(reply);
        let (mut debate, _, nested_provider) = interactive_debate(DebateSide::Pro, input, Some(2));

        let outcome = debate.run().await;
        assert_eq!(outcome.termination, TerminationReason::ExplicitDone);
        assert_eq!(outcome.cycles_completed, 0);
        assert_eq!(nested_provider.calls(), 0);
    }
}

#[tokio::test]
async fn test_interactive_prompt_text() {
    let input = Arc::new(ScriptedInput::new());
    let config = DebateConfig {
        llm_delegate: false,
        ..DebateConfig::default()
    };
    let pro = debater(
        AgentRole::Pro,
        "in favor",
        Arc::new(MockProvider::smart()),
        TaskConfig::default(),
    );
    let con = debater(
        AgentRole::Con,
        "against",
        Arc::new(MockProvider::smart()),
        TaskConfig::single_round(),
    );
    let mut debate = DebateTask::new(DebateSide::Pro, pro, con, input.clone(), config);

    let outcome = debate.run().await;
    assert_eq!(outcome.termination, TerminationReason::NoResponse);
    assert_eq!(input.prompts().await, vec![ARGUMENT_PROMPT.to_string()]);
}

#[tokio::test]
async fn test_delegate_flag_decides_mode_not_primary_task_config() {
    let input = Arc::new(ScriptedInput::new().reply("Offices waste commuting hours."));
    let pro_provider = Arc::new(MockProvider::smart().with_latency(0));
    let con_provider = Arc::new(MockProvider::smart().with_latency(0));
    let config = DebateConfig {
        turns: Some(2),
        llm_delegate: false,
        ..DebateConfig::default()
    };
    let pro = debater(
        AgentRole::Pro,
        "You argue in favor of the motion.",
        pro_provider.clone(),
        TaskConfig::default().with_turns(Some(5)),
    );
    let con = debater(
        AgentRole::Con,
        "You argue against the motion.",
        con_provider.clone(),
        TaskConfig::single_round(),
    );
    let mut debate = DebateTask::new(DebateSide::Pro, pro, con, input.clone(), config);

    let outcome = debate.run().await;

    assert_eq!(input.prompts().await, vec![ARGUMENT_PROMPT.to_string()]);
    assert_eq!(outcome.cycles_completed, 1);
    assert_eq!(pro_provider.calls(), 0);
    assert_eq!(con_provider.calls(), 1);
    assert!(debate.agent(DebateSide::Pro).source().is_human());
}

#[tokio::test]
async fn test_autonomous_ignores_interactive_primary_task_config() {
    let input = Arc::new(ScriptedInput::new().reply("never read"));
    let pro_provider = Arc::new(MockProvider::smart().with_latency(0));
    let config = DebateConfig {
        turns: Some(2),
        llm_delegate: true,
        ..DebateConfig::default()
    };
    let pro = debater(
        AgentRole::Pro,
        "You argue in favor of the motion.",
        pro_provider.clone(),
        TaskConfig::default().interactive().with_turns(Some(1)),
    );
    let con = debater(
        AgentRole::Con,
        "You argue against the motion.",
        Arc::new(MockProvider::smart().with_latency(0)),
        TaskConfig::single_round(),
    );
    let mut debate = DebateTask::new(DebateSide::Pro, pro, con, input.clone(), config);

    let outcome = debate.run().await;

    assert!(input.prompts().await.is_empty());
    assert_eq!(outcome.cycles_completed, 2);
    assert_eq!(outcome.termination, TerminationReason::TurnBudgetExhausted);
    assert_eq!(pro_provider.calls(), 2);
    assert!(!debate.agent(DebateSide::Pro).source().is_human());
}
