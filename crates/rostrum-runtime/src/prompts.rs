//! System messages for every agent in a session

use rostrum_llm::research_tool_usage;

use crate::topics::Topic;

/// Appended to both debaters' system messages
pub const DEBATE_ADDENDUM: &str = "\n\nKeep each reply under 150 words. Address your \
opponent's most recent point directly before making a new one. Do not repeat arguments \
you have already made, and never concede your side.";

pub const FEEDBACK_SYSTEM_MESSAGE: &str = "You are an impartial debate judge. You will \
receive the transcript of a debate. Weigh the arguments on each side for evidence, logic \
and rebuttal quality. Declare a winner and explain why, or if neither side clearly won, \
summarise the strengths and weaknesses of each.";

pub const DOC_QA_SYSTEM_MESSAGE: &str = "You answer questions using only the document \
passages provided with each question. Cite the source URL of every passage you rely on. \
If the passages do not contain the answer, say so.";

/// Debater system message for one side
pub fn debater_system_message(side_message: &str) -> String {
    format!("{}{}", side_message, DEBATE_ADDENDUM)
}

/// Research agent system message built from both positions
pub fn research_system_message(topic: &Topic) -> String {
    format!(
        "You are a research assistant for a debate on \"{name}\".\n\n\
         The Pro position: {pro}\n\
         The Con position: {con}\n\n\
         Find web pages with evidence for both positions, searching at least once \
         for each side.\n\n{tools}",
        name = topic.name,
        pro = topic.pro_message,
        con = topic.con_message,
        tools = research_tool_usage(),
    )
}
