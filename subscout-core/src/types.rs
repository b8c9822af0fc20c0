use serde_json::{Map, Value};

/// Relevance classification attached to a subreddit record.
///
/// Starts as `Unannotated` and transitions exactly once when the
/// consensus decision for the record comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelevanceLabel {
    #[default]
    Unannotated,
    Relevant,
    NotRelevant,
}

impl RelevanceLabel {
    pub fn from_verdict(relevant: bool) -> Self {
        if relevant {
            RelevanceLabel::Relevant
        } else {
            RelevanceLabel::NotRelevant
        }
    }

    /// `None` while the record has not been annotated yet.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RelevanceLabel::Unannotated => None,
            RelevanceLabel::Relevant => Some(true),
            RelevanceLabel::NotRelevant => Some(false),
        }
    }

    pub fn is_annotated(&self) -> bool {
        !matches!(self, RelevanceLabel::Unannotated)
    }
}

impl std::fmt::Display for RelevanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelevanceLabel::Unannotated => write!(f, "unannotated"),
            RelevanceLabel::Relevant => write!(f, "relevant"),
            RelevanceLabel::NotRelevant => write!(f, "not relevant"),
        }
    }
}

/// One post belonging to a subreddit record, with the full raw payload
/// kept for the report.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub score: i64,
    pub selftext: String,
    pub raw: Map<String, Value>,
}

impl PostRecord {
    /// Extract the typed fields from a raw post object. Missing fields
    /// default to empty/zero; non-object payloads are rejected.
    pub fn from_raw(raw: Value) -> Option<Self> {
        let map = match raw {
            Value::Object(map) => map,
            _ => return None,
        };

        Some(Self {
            id: str_field(&map, "id"),
            title: str_field(&map, "title"),
            score: map.get("score").and_then(Value::as_i64).unwrap_or(0),
            selftext: str_field(&map, "selftext"),
            raw: map,
        })
    }
}

/// A subreddit as collected for one run: identity, descriptive text,
/// the raw search payload, its top posts and the relevance label.
///
/// Names are unique keys within a run; the collector deduplicates on
/// `name` with first-occurrence-wins.
#[derive(Debug, Clone)]
pub struct SubredditRecord {
    pub name: String,
    pub display_name: String,
    pub title: String,
    pub description: String,
    pub public_description: String,
    pub subscribers: u64,
    pub raw: Map<String, Value>,
    pub top_posts: Vec<PostRecord>,
    pub relevance: RelevanceLabel,
}

impl SubredditRecord {
    /// Build a record from one raw subreddit object returned by the
    /// search API. The unique name resolves from `display_name`,
    /// falling back to `subreddit`; payloads carrying neither are
    /// rejected.
    pub fn from_raw(raw: Value) -> Option<Self> {
        let map = match raw {
            Value::Object(map) => map,
            _ => return None,
        };

        let name = non_empty_field(&map, "display_name")
            .or_else(|| non_empty_field(&map, "subreddit"))?;

        Some(Self {
            display_name: str_field(&map, "display_name"),
            title: str_field(&map, "title"),
            description: str_field(&map, "description"),
            public_description: str_field(&map, "public_description"),
            subscribers: map.get("subscribers").and_then(Value::as_u64).unwrap_or(0),
            name,
            raw: map,
            top_posts: Vec::new(),
            relevance: RelevanceLabel::default(),
        })
    }

    /// Title line used in the judgment prompt: the display name, or the
    /// unique name when the payload carried no display name.
    pub fn prompt_title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// Description with the fallback chain: public description, then the
    /// long-form description, then a fixed placeholder.
    pub fn resolved_description(&self) -> &str {
        if !self.public_description.is_empty() {
            &self.public_description
        } else if !self.description.is_empty() {
            &self.description
        } else {
            "No description provided"
        }
    }
}

fn str_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn non_empty_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
