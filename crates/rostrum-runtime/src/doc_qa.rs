//! Document Q&A over the pages the research agent found

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use rostrum_core::{Agent, Speaker};
use rostrum_debate::{solicit, HumanInput, TaskConfig, TurnTask};
use rostrum_llm::LlmProvider;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const QUESTION_PROMPT: &str = "Ask a question about the documents (type 'x' to exit):";

const EXIT_SENTINEL: &str = "x";
const DEFAULT_TOP_K: usize = 3;
const PASSAGE_CHARS: usize = 1200;

/// Decides from the topic whether the Doc-QA task should run
pub trait EligibilityPredicate: Send + Sync {
    fn is_eligible(&self, topic: &str) -> bool;
}

impl<F> EligibilityPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_eligible(&self, topic: &str) -> bool {
        self(topic)
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("None of the {0} documents could be ingested")]
    NothingIngested(usize),
}

/// A retrievable chunk of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub source: String,
    pub text: String,
    pub score: usize,
}

/// Stores documents and returns passages relevant to a query
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ingest the given URLs; returns how many documents were stored
    async fn ingest(&self, urls: &[String]) -> Result<usize, DocumentError>;

    /// Up to `k` passages ranked by relevance to `query`
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>, DocumentError>;
}

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("valid markup pattern")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space pattern"));

/// Reduce an HTML page to its visible text
pub fn strip_markup(html: &str) -> String {
    let text = SCRIPT_OR_STYLE.replace_all(html, " ");
    let text = TAG.replace_all(&text, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// Passages of ingested text, ranked by term overlap with a query
#[derive(Debug, Default)]
pub struct PassageIndex {
    passages: Vec<(String, String)>,
}

impl PassageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `text` on word boundaries into passages of about `PASSAGE_CHARS`
    pub fn add_document(&mut self, source: &str, text: &str) {
        let mut current = String::new();
        for word in text.split_whitespace() {
            if !current.is_empty() && current.len() + word.len() + 1 > PASSAGE_CHARS {
                self.passages.push((source.to_string(), std::mem::take(&mut current)));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            self.passages.push((source.to_string(), current));
        }
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Best `k` passages sharing at least one term with the query
    pub fn rank(&self, query: &str, k: usize) -> Vec<Passage> {
        let wanted = terms(query);
        let mut scored: Vec<Passage> = self
            .passages
            .iter()
            .map(|(source, text)| Passage {
                source: source.clone(),
                text: text.clone(),
                score: terms(text).intersection(&wanted).count(),
            })
            .filter(|p| p.score > 0)
            .collect();
        // Stable sort keeps document order among ties
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

/// Fetches each URL over HTTP and indexes its visible text
#[derive(Debug)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    index: RwLock<PassageIndex>,
}

impl HttpDocumentStore {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
            index: RwLock::new(PassageIndex::new()),
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, DocumentError> {
        let fetch_error = |reason: String| DocumentError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!("Status: {}", response.status())));
        }
        let body = response.text().await.map_err(|e| fetch_error(e.to_string()))?;
        Ok(strip_markup(&body))
    }
}

impl Default for HttpDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn ingest(&self, urls: &[String]) -> Result<usize, DocumentError> {
        let fetched = futures::future::join_all(urls.iter().map(|url| self.fetch(url))).await;

        let mut index = self.index.write().await;
        let mut stored = 0;
        for (url, result) in urls.iter().zip(fetched) {
            match result {
                Ok(text) if !text.is_empty() => {
                    index.add_document(url, &text);
                    stored += 1;
                }
                Ok(_) => debug!(url = %url, "Skipping empty document"),
                Err(e) => warn!(error = %e, "Skipping document"),
            }
        }

        if stored == 0 && !urls.is_empty() {
            return Err(DocumentError::NothingIngested(urls.len()));
        }
        info!(documents = stored, passages = index.len(), "Documents ingested");
        Ok(stored)
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>, DocumentError> {
        Ok(self.index.read().await.rank(query, k))
    }
}

/// Serves fixed text per URL, for tests and offline demos
#[derive(Debug, Default)]
pub struct StaticDocumentStore {
    pages: HashMap<String, String>,
    index: RwLock<PassageIndex>,
}

impl StaticDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl DocumentStore for StaticDocumentStore {
    async fn ingest(&self, urls: &[String]) -> Result<usize, DocumentError> {
        let mut index = self.index.write().await;
        let mut stored = 0;
        for url in urls {
            if let Some(text) = self.pages.get(url) {
                index.add_document(url, text);
                stored += 1;
            }
        }
        Ok(stored)
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>, DocumentError> {
        Ok(self.index.read().await.rank(query, k))
    }
}

/// How a Doc-QA session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocQaEnd {
    Exit,
    NoResponse,
    Fault,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocQaReport {
    pub documents: usize,
    pub questions_answered: u32,
    pub ended_by: DocQaEnd,
    pub fault: Option<String>,
}

/// Answers human questions from the ingested documents until `x`
pub struct DocQaTask {
    task: TurnTask,
    store: Arc<dyn DocumentStore>,
    input: Arc<dyn HumanInput>,
    input_timeout: Duration,
    top_k: usize,
}

impl DocQaTask {
    pub fn new(
        agent: Agent,
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn DocumentStore>,
        input: Arc<dyn HumanInput>,
        input_timeout: Duration,
    ) -> Self {
        Self {
            task: TurnTask::new(agent, provider, TaskConfig::default().interactive()),
            store,
            input,
            input_timeout,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn agent(&self) -> &Agent {
        self.task.agent()
    }

    pub async fn run(&mut self, references: &[String]) -> DocQaReport {
        let documents = match self.store.ingest(references).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Document ingestion failed");
                return DocQaReport {
                    documents: 0,
                    questions_answered: 0,
                    ended_by: DocQaEnd::Fault,
                    fault: Some(e.to_string()),
                };
            }
        };

        self.task.begin();
        let mut answered = 0;
        let (ended_by, fault) = loop {
            let question =
                match solicit(self.input.as_ref(), QUESTION_PROMPT, self.input_timeout).await {
                    Ok(question) => question,
                    Err(e) => {
                        info!(reason = %e, "Doc-QA ended without a question");
                        break (DocQaEnd::NoResponse, None);
                    }
                };
            if question.eq_ignore_ascii_case(EXIT_SENTINEL) {
                break (DocQaEnd::Exit, None);
            }

            let passages = match self.store.retrieve(&question, self.top_k).await {
                Ok(passages) => passages,
                Err(e) => break (DocQaEnd::Fault, Some(e.to_string())),
            };
            debug!(passages = passages.len(), "Retrieved passages");

            match self
                .task
                .step(Speaker::Moderator, &question_with_context(&question, &passages))
                .await
            {
                Ok(_) => answered += 1,
                Err(e) => {
                    warn!(error = %e, "Doc-QA step failed");
                    break (DocQaEnd::Fault, Some(e.to_string()));
                }
            }
        };

        DocQaReport {
            documents,
            questions_answered: answered,
            ended_by,
            fault,
        }
    }
}

fn question_with_context(question: &str, passages: &[Passage]) -> String {
    if passages.is_empty() {
        return format!("No passages matched.\n\nQuestion: {}", question);
    }
    let context = passages
        .iter()
        .map(|p| format!("[{}]\n{}", p.source, p.text))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Passages:\n\n{}\n\nQuestion: {}", context, question)
}

impl std::fmt::Debug for DocQaTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocQaTask")
            .field("task", &self.task)
            .field("input_timeout", &self.input_timeout)
            .field("top_k", &self.top_k)
            .finish()
    }
}
