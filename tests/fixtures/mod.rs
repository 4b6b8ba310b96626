//! Shared fixtures: headline/summary inputs and real-shaped wire JSON.

pub const HEADLINE: &str = "City Council Approves Budget";

/// A summary long enough to clear the enhancement input cutoff (100 chars).
pub fn long_summary() -> String {
    "The city council voted 5-2 on Tuesday to approve a 48 million dollar \
     budget for the coming fiscal year, raising spending on road repair and \
     cutting the parks department by four percent after months of public \
     hearings."
        .to_string()
}

/// Generated output long enough to pass the acceptance heuristic
/// (>= 500 chars and >= 1.5x the summary above).
pub fn acceptable_article() -> String {
    "The city council approved a 48 million dollar budget on Tuesday night, \
     closing out months of contentious public hearings with a 5-2 vote. "
        .repeat(7)
        .trim()
        .to_string()
}

/// Output short enough to trip the short-output rejection.
pub const SHORT_REPLY: &str = "Budget approved by council.";

/// Output matching the refusal phrase list.
pub const REFUSAL_REPLY: &str =
    "I apologize, but as an AI I cannot rewrite this article for you.";

/// Status payload in the server's actual shape, including fields the client
/// ignores.
pub const RAW_DONE_TEXT_JSON: &str = r#"{
    "finished": 1,
    "processing": 0,
    "restarted": 0,
    "waiting": 0,
    "done": true,
    "faulted": false,
    "wait_time": 0,
    "queue_position": 0,
    "kudos": 12.0,
    "is_possible": true,
    "generations": [
        {
            "worker_id": "a1b2",
            "worker_name": "reader",
            "model": "some/text-model",
            "text": "The council met in a packed chamber."
        }
    ]
}"#;

pub const RAW_PENDING_JSON: &str = r#"{
    "finished": 0,
    "processing": 1,
    "waiting": 2,
    "done": false,
    "faulted": false,
    "wait_time": 45,
    "queue_position": 3,
    "is_possible": true,
    "generations": []
}"#;
