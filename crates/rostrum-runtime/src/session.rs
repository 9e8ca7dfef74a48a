//! Session: builds every agent and runs
//! debate → feedback → (gate) research → (predicate) document Q&A

use rostrum_core::{Agent, AgentRole, DebateSide, ModelSelection, TurnRecord};
use rostrum_debate::{
    DebateConfig, DebateOutcome, DebateTask, FeedbackReport, FeedbackTask, HumanInput, TaskConfig,
    TaskError, TurnTask, DEFAULT_INPUT_TIMEOUT,
};
use rostrum_llm::{ConfigError, LlmProvider, ProviderResolver, Settings};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::doc_qa::{
    DocQaReport, DocQaTask, DocumentStore, EligibilityPredicate, HttpDocumentStore,
};
use crate::gate::CapabilityGate;
use crate::prompts::{
    debater_system_message, research_system_message, DOC_QA_SYSTEM_MESSAGE,
    FEEDBACK_SYSTEM_MESSAGE,
};
use crate::research::{ResearchReport, ResearchTask, DEFAULT_RESEARCH_MAX_STEPS};
use crate::topics::Topic;

/// Setup failures; nothing has run when one of these is returned
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No provider for {role}: {source}")]
    Provider {
        role: AgentRole,
        #[source]
        source: ConfigError,
    },
}

/// Everything a session needs to know up front
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub topic: Topic,
    /// Side the user (or the user's delegate model) argues
    pub side: DebateSide,
    pub llm_delegate: bool,
    pub turns: Option<u32>,
    pub models: ModelSelection,
    pub settings: Settings,
    pub input_timeout: Duration,
    pub max_debate_duration: Option<Duration>,
    pub research_max_steps: u32,
}

impl SessionConfig {
    pub fn new(topic: Topic, side: DebateSide) -> Self {
        Self {
            topic,
            side,
            llm_delegate: true,
            turns: Some(4),
            models: ModelSelection::Shared(Default::default()),
            settings: Settings::default(),
            input_timeout: DEFAULT_INPUT_TIMEOUT,
            max_debate_duration: None,
            research_max_steps: DEFAULT_RESEARCH_MAX_STEPS,
        }
    }

    fn debate_config(&self) -> DebateConfig {
        DebateConfig {
            turns: self.turns,
            llm_delegate: self.llm_delegate,
            input_timeout: self.input_timeout,
            max_duration: self.max_debate_duration,
        }
    }
}

/// External services a session talks to
pub struct Collaborators {
    pub providers: Arc<dyn ProviderResolver>,
    pub input: Arc<dyn HumanInput>,
    pub search: CapabilityGate,
    pub eligibility: Arc<dyn EligibilityPredicate>,
    pub documents: Arc<dyn DocumentStore>,
}

impl Collaborators {
    /// Doc-QA disabled, HTTP document store
    pub fn new(
        providers: Arc<dyn ProviderResolver>,
        input: Arc<dyn HumanInput>,
        search: CapabilityGate,
    ) -> Self {
        Self {
            providers,
            input,
            search,
            eligibility: Arc::new(|_: &str| false),
            documents: Arc::new(HttpDocumentStore::new()),
        }
    }

    pub fn with_eligibility(mut self, eligibility: Arc<dyn EligibilityPredicate>) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn with_documents(mut self, documents: Arc<dyn DocumentStore>) -> Self {
        self.documents = documents;
        self
    }
}

/// What each stage of a session produced
#[derive(Debug)]
pub struct SessionReport {
    pub topic: String,
    pub side: DebateSide,
    pub debate: DebateOutcome,
    /// History of the last speaker, as given to the judge
    pub judged: Vec<TurnRecord>,
    pub feedback: Result<FeedbackReport, TaskError>,
    /// `None` when the search gate was closed
    pub research: Option<ResearchReport>,
    /// `None` unless research found references and the topic was eligible
    pub doc_qa: Option<DocQaReport>,
}

struct Providers {
    pro: Arc<dyn LlmProvider>,
    con: Arc<dyn LlmProvider>,
    feedback: Arc<dyn LlmProvider>,
    research: Option<(Arc<dyn LlmProvider>, Arc<dyn LlmProvider>)>,
}

pub struct Session {
    config: SessionConfig,
    collaborators: Collaborators,
}

impl Session {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn resolve(&self, role: AgentRole) -> Result<Arc<dyn LlmProvider>, SessionError> {
        let model = self.config.models.for_role(role);
        self.collaborators
            .providers
            .resolve(role, &model)
            .map_err(|source| SessionError::Provider { role, source })
    }

    fn resolve_all(&self) -> Result<Providers, SessionError> {
        let research = if self.collaborators.search.is_available() {
            Some((
                self.resolve(AgentRole::MetaphorSearch)?,
                self.resolve(AgentRole::DocQa)?,
            ))
        } else {
            None
        };

        Ok(Providers {
            pro: self.resolve(AgentRole::Pro)?,
            con: self.resolve(AgentRole::Con)?,
            feedback: self.resolve(AgentRole::Feedback)?,
            research,
        })
    }

    fn debater(&self, side: DebateSide, provider: Arc<dyn LlmProvider>, config: TaskConfig) -> TurnTask {
        let role = side.role();
        let agent = Agent::new(
            role,
            &debater_system_message(self.config.topic.message_for(side)),
            self.config.models.for_role(role),
        );
        TurnTask::new(agent, provider, config).with_debug(self.config.settings.debug)
    }

    /// Run every stage. Only provider resolution can fail; sub-task
    /// failures are recorded in the report.
    pub async fn run(&self) -> Result<SessionReport, SessionError> {
        let providers = self.resolve_all()?;
        let topic = &self.config.topic;
        let side = self.config.side;
        info!(
            topic = %topic.name,
            side = %side,
            llm_delegate = self.config.llm_delegate,
            turns = ?self.config.turns,
            "Starting session"
        );

        let provider_for = |s: DebateSide| match s {
            DebateSide::Pro => providers.pro.clone(),
            DebateSide::Con => providers.con.clone(),
        };
        let debate_config = self.config.debate_config();
        let primary = self.debater(side, provider_for(side), TaskConfig::default());
        let nested = self.debater(
            side.opposite(),
            provider_for(side.opposite()),
            TaskConfig::single_round(),
        );

        let mut debate = DebateTask::new(
            side,
            primary,
            nested,
            self.collaborators.input.clone(),
            debate_config,
        );
        let outcome = debate.run().await;

        let mut feedback = FeedbackTask::new(
            Agent::new(
                AgentRole::Feedback,
                FEEDBACK_SYSTEM_MESSAGE,
                self.config.models.feedback(),
            ),
            providers.feedback.clone(),
        );
        let judged = debate.agent(outcome.last_speaker).history().records().to_vec();
        let feedback = feedback.run(&judged).await;
        if let Err(e) = &feedback {
            warn!(error = %e, "Feedback failed");
        }

        let (research, doc_qa) = match (self.collaborators.search.backend(), providers.research) {
            (Some(backend), Some((research_provider, doc_qa_provider))) => {
                let mut research = ResearchTask::new(
                    Agent::research(
                        &research_system_message(topic),
                        self.config.models.for_role(AgentRole::MetaphorSearch),
                    ),
                    research_provider,
                    backend,
                    self.config.research_max_steps,
                );
                let report = research.run().await;
                let doc_qa = self.run_doc_qa(&report, doc_qa_provider).await;
                (Some(report), doc_qa)
            }
            _ => {
                info!("Search capability unavailable; skipping research");
                (None, None)
            }
        };

        Ok(SessionReport {
            topic: topic.name.clone(),
            side,
            debate: outcome,
            judged,
            feedback,
            research,
            doc_qa,
        })
    }

    async fn run_doc_qa(
        &self,
        research: &ResearchReport,
        provider: Arc<dyn LlmProvider>,
    ) -> Option<DocQaReport> {
        if !self
            .collaborators
            .eligibility
            .is_eligible(&self.config.topic.name)
        {
            info!("Topic not selected for document Q&A");
            return None;
        }
        if research.references.is_empty() {
            info!("Research found no references; skipping document Q&A");
            return None;
        }

        let mut task = DocQaTask::new(
            Agent::new(
                AgentRole::DocQa,
                DOC_QA_SYSTEM_MESSAGE,
                self.config.models.for_role(AgentRole::DocQa),
            ),
            provider,
            self.collaborators.documents.clone(),
            self.collaborators.input.clone(),
            self.config.input_timeout,
        );
        Some(task.run(&research.references).await)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("search", &self.collaborators.search)
            .finish()
    }
}
