//! # Rostrum Runtime
//!
//! Session orchestration: builds the agents for a topic and runs
//! debate → feedback → research → document Q&A in order.
//!
//! - [`Session`] / [`SessionConfig`] / [`Collaborators`] - one debate session
//! - [`CapabilityGate`] - whether web search (and so research) is available
//! - [`ResearchTask`] - the tool-using search loop
//! - [`DocQaTask`] - questions over the pages research found
//! - [`TopicCatalog`] - built-in and JSON-loaded topics

pub mod doc_qa;
pub mod gate;
pub mod prompts;
pub mod research;
pub mod session;
pub mod topics;

pub use doc_qa::{
    strip_markup, DocQaEnd, DocQaReport, DocQaTask, DocumentError, DocumentStore,
    EligibilityPredicate, HttpDocumentStore, Passage, PassageIndex, StaticDocumentStore,
    QUESTION_PROMPT,
};
pub use gate::CapabilityGate;
pub use research::{
    extract_references, ResearchEnd, ResearchReport, ResearchTask, DEFAULT_RESEARCH_MAX_STEPS,
    RESEARCH_SEED,
};
pub use session::{Collaborators, Session, SessionConfig, SessionError, SessionReport};
pub use topics::{Topic, TopicCatalog, TopicError};
