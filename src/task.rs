use serde::{Deserialize, Deserializer, Serialize};

/// Dependency link semantics between a predecessor and its successor.
///
/// Scheduling currently treats every link as finish-to-start; the other
/// variants are accepted and carried through so callers can round-trip
/// them, and are the extension point for richer link handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkType {
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl LinkType {
    pub fn as_code(&self) -> &'static str {
        match self {
            LinkType::FinishToStart => "FS",
            LinkType::StartToStart => "SS",
            LinkType::FinishToFinish => "FF",
            LinkType::StartToFinish => "SF",
        }
    }

    /// Lenient parse of a link code. Unknown codes fall back to
    /// finish-to-start rather than failing the whole payload.
    pub fn from_code(code: &str) -> Self {
        match code
            .trim()
            .to_ascii_uppercase()
            .replace(['-', ' '], "_")
            .as_str()
        {
            "SS" | "START_TO_START" | "STARTTOSTART" => LinkType::StartToStart,
            "FF" | "FINISH_TO_FINISH" | "FINISHTOFINISH" => LinkType::FinishToFinish,
            "SF" | "START_TO_FINISH" | "STARTTOFINISH" => LinkType::StartToFinish,
            _ => LinkType::FinishToStart,
        }
    }
}

/// Task ids arrive as strings or bare numbers depending on the caller;
/// both normalize to a string handle at this boundary.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl RawId {
    fn into_id(self) -> String {
        match self {
            RawId::Text(text) => text.trim().to_string(),
            RawId::Int(value) => value.to_string(),
            RawId::Float(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
                (value as i64).to_string()
            }
            RawId::Float(value) => value.to_string(),
        }
    }
}

fn id_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawId::deserialize(deserializer)?.into_id())
}

/// A reference to a predecessor task, normalized from either a bare id or
/// a `{ taskId, type }` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredecessorRef {
    pub task_id: String,
    pub link: LinkType,
}

impl PredecessorRef {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            link: LinkType::FinishToStart,
        }
    }

    pub fn with_link(task_id: impl Into<String>, link: LinkType) -> Self {
        Self {
            task_id: task_id.into(),
            link,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPredecessor {
    Link {
        #[serde(alias = "taskId")]
        task_id: RawId,
        #[serde(default, alias = "type", alias = "linkType")]
        link_type: Option<String>,
    },
    Bare(RawId),
}

impl<'de> Deserialize<'de> for PredecessorRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawPredecessor::deserialize(deserializer)? {
            RawPredecessor::Link { task_id, link_type } => Ok(Self {
                task_id: task_id.into_id(),
                link: link_type
                    .as_deref()
                    .map(LinkType::from_code)
                    .unwrap_or_default(),
            }),
            RawPredecessor::Bare(id) => Ok(Self::new(id.into_id())),
        }
    }
}

/// One schedulable unit of work as supplied by the caller.
///
/// Key casing is normalized here, once: camelCase payloads (`wbsCode`,
/// `durationDays`, `daysRequired`, `isCritical`) and snake_case payloads
/// produce the same record, so engine code never branches on spellings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    #[serde(deserialize_with = "id_from_value")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "wbsCode")]
    pub wbs_code: Option<String>,
    #[serde(
        default,
        alias = "durationDays",
        alias = "daysRequired",
        alias = "days_required"
    )]
    pub duration_days: Option<f64>,
    #[serde(default)]
    pub predecessors: Vec<PredecessorRef>,
    #[serde(default, alias = "isCritical")]
    pub is_critical: Option<bool>,
    #[serde(default, alias = "percentComplete")]
    pub percent_complete: Option<f64>,
}

impl TaskInput {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_days: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            wbs_code: None,
            duration_days: Some(duration_days),
            predecessors: Vec::new(),
            is_critical: None,
            percent_complete: None,
        }
    }
}
