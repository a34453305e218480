//! Prompt assembly.
//!
//! The system prompt is rebuilt from the caller's data pack on every request.
//! It embeds fixed coaching instructions followed by the data pack verbatim.
//! Nothing here checks facts; the instructions tell the model to use only
//! what the data pack says.

use crate::domain::{ChatTurn, Role};
use crate::upstream::UpstreamMessage;

const PERSONA: &str = "\
You are a calm, warm recovery companion inside a habit-recovery app. \
You talk with one person who is working on a streak. You are supportive \
and direct, never preachy, never clinical, and you never shame a slip.";

const TONE_BY_DAY: &str = "\
Match your tone to the streak day in the user data:
Days 1 to 3: steady and reassuring. Urges are strongest now, so focus on getting through the next hour.
Days 4 to 14: encouraging and practical. Point to routines and triggers they can plan around.
Days 15 to 30: confident. Acknowledge real progress and help them guard against complacency.
Day 31 and beyond: peer-like. Help them build a life that does not need the old habit.
If the data shows a reset or relapse, be kind and treat today as day one without dwelling on it.";

const CONSTRAINTS: &str = "\
Rules for every reply:
Keep it short, at most four sentences.
End with exactly one concrete action the user can take in the next few minutes.
Only refer to facts about the user that appear in the user data below. Never invent streak numbers, check-ins, journal entries or history.
If the user mentions self-harm, suicide or being in danger, include one sentence encouraging them to contact a crisis line such as 988 in the US or local emergency services.
Write plain conversational text. Do not use markdown, bullet points, numbered lists or headings.";

const DATA_PACK_OPEN: &str = "=== USER DATA ===";
const DATA_PACK_CLOSE: &str = "=== END USER DATA ===";

/// Build the system prompt for one request.
///
/// The data pack is appended verbatim between delimiter lines.
pub fn build_system_prompt(data_pack: &str) -> String {
    format!(
        "{PERSONA}\n\n{TONE_BY_DAY}\n\n{CONSTRAINTS}\n\n{DATA_PACK_OPEN}\n{data_pack}\n{DATA_PACK_CLOSE}"
    )
}

/// Build the upstream message list.
///
/// History keeps its order and carries only role and content; the latest
/// user message is appended as the final user turn.
pub fn build_messages(history: Vec<ChatTurn>, user_message: String) -> Vec<UpstreamMessage> {
    let mut messages: Vec<UpstreamMessage> = Vec::with_capacity(history.len() + 1);
    messages.extend(history.into_iter().map(UpstreamMessage::from));
    messages.push(UpstreamMessage {
        role: Role::User,
        content: user_message,
    });
    messages
}
