//! Derived visualizations: mindmap, timeline, concept graph, summary and
//! review.
//!
//! Structured kinds ask the model for JSON. A reply that cannot be parsed
//! is replaced by a deterministic fallback built from the paper itself, so
//! a successful completion always yields a usable [`Generated`] value.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{complete_with_retry, strip_code_fence, TextCompletion};
use crate::error::{Error, Result};
use crate::model::ParsedDocument;

/// Maximum mindmap depth, root included.
const MAX_MINDMAP_DEPTH: usize = 4;

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationKind {
    Mindmap,
    Timeline,
    Graph,
    Summary,
    Review,
}

impl GenerationKind {
    pub const ALL: [GenerationKind; 5] = [
        GenerationKind::Mindmap,
        GenerationKind::Timeline,
        GenerationKind::Graph,
        GenerationKind::Summary,
        GenerationKind::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Mindmap => "mindmap",
            GenerationKind::Timeline => "timeline",
            GenerationKind::Graph => "graph",
            GenerationKind::Summary => "summary",
            GenerationKind::Review => "review",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GenerationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Other(format!("Unknown generation kind: {}", s)))
    }
}

/// One node of a mindmap tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindmapNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MindmapNode>,
}

impl MindmapNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Depth of the tree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(MindmapNode::depth).max().unwrap_or(0)
    }

    fn prune(&mut self, depth_left: usize) {
        if depth_left <= 1 {
            self.children.clear();
        }
        for child in &mut self.children {
            child.prune(depth_left - 1);
        }
    }
}

/// One point of a research timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: u32,
    #[serde(rename = "symbolSize", default, skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphCategory {
    pub name: String,
}

/// Concept nodes and the relations between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptGraph {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
    #[serde(default)]
    pub categories: Vec<GraphCategory>,
}

impl ConceptGraph {
    /// Drop links whose ends are not nodes of this graph.
    fn drop_dangling_links(&mut self) {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let links = std::mem::take(&mut self.links);
        self.links = links
            .into_iter()
            .filter(|l| ids.contains(l.source.as_str()) && ids.contains(l.target.as_str()))
            .collect();
    }
}

/// Generated content, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Generated {
    Mindmap(MindmapNode),
    Timeline(Vec<TimelineEvent>),
    Graph(ConceptGraph),
    Summary(String),
    Review(String),
}

impl Generated {
    pub fn kind(&self) -> GenerationKind {
        match self {
            Generated::Mindmap(_) => GenerationKind::Mindmap,
            Generated::Timeline(_) => GenerationKind::Timeline,
            Generated::Graph(_) => GenerationKind::Graph,
            Generated::Summary(_) => GenerationKind::Summary,
            Generated::Review(_) => GenerationKind::Review,
        }
    }
}

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    #[serde(flatten)]
    pub content: Generated,

    /// The reply could not be used and deterministic content was substituted
    pub fallback: bool,
}

/// The paper fields prompts are built from.
#[derive(Debug, Clone, Copy)]
pub struct PaperInfo<'a> {
    pub title: &'a str,
    pub authors: &'a [String],
    pub abstract_text: &'a str,
    pub keywords: &'a [String],
}

impl<'a> From<&'a ParsedDocument> for PaperInfo<'a> {
    fn from(doc: &'a ParsedDocument) -> Self {
        Self {
            title: &doc.title,
            authors: &doc.authors,
            abstract_text: &doc.abstract_text,
            keywords: &doc.keywords,
        }
    }
}

impl PaperInfo<'_> {
    fn describe(&self, with_authors: bool, with_keywords: bool) -> String {
        let mut out = format!("Title: {}\n", self.title);
        if with_authors {
            out.push_str(&format!("Authors: {}\n", self.authors.join(", ")));
        }
        out.push_str(&format!("Abstract: {}\n", self.abstract_text));
        if with_keywords {
            out.push_str(&format!("Keywords: {}\n", self.keywords.join(", ")));
        }
        out
    }

    /// Prompt for `kind`.
    pub fn prompt(&self, kind: GenerationKind) -> String {
        match kind {
            GenerationKind::Mindmap => format!(
                "Build a mindmap of the paper below as JSON.\n\n{}\n\
                 Requirements:\n\
                 1. Return standard JSON.\n\
                 2. Shape: {{\"name\": \"root\", \"children\": [{{\"name\": \"child\", \"children\": [...]}}]}}\n\
                 3. Cover the main sections and core concepts of the paper.\n\
                 4. At most {} levels deep.\n\
                 5. Return only the JSON, no explanation.",
                self.describe(true, true),
                MAX_MINDMAP_DEPTH
            ),
            GenerationKind::Timeline => format!(
                "Build a timeline of how the research field of the paper below developed, as JSON.\n\n{}\n\
                 Requirements:\n\
                 1. Return a standard JSON array.\n\
                 2. Each item has: time, title, description, keywords (array of strings).\n\
                 3. Order items from earliest to latest.\n\
                 4. Return only the JSON, no explanation.",
                self.describe(false, false)
            ),
            GenerationKind::Graph => format!(
                "Build a concept graph of the paper below as JSON.\n\n{}\n\
                 Requirements:\n\
                 1. Return standard JSON with \"nodes\" and \"links\" arrays.\n\
                 2. Each node has: id, name, category (number).\n\
                 3. Each link has: source (node id), target (node id).\n\
                 4. Show the core concepts of the paper and how they relate.\n\
                 5. Return only the JSON, no explanation.",
                self.describe(false, true)
            ),
            GenerationKind::Summary => format!(
                "Summarize the core ideas of the paper below.\n\n{}\n\
                 Requirements:\n\
                 1. State the main contributions and what is new.\n\
                 2. Distill the core arguments.\n\
                 3. Use clear numbered points.\n\
                 4. Stay under 500 words.",
                self.describe(true, false)
            ),
            GenerationKind::Review => format!(
                "Write a short peer review of the paper below.\n\n{}\n\
                 Requirements:\n\
                 1. Summarize the claims in two sentences.\n\
                 2. List strengths, then weaknesses, as numbered points.\n\
                 3. End with concrete suggestions for the authors.\n\
                 4. Stay under 500 words.",
                self.describe(true, true)
            ),
        }
    }

    /// Deterministic content used when a reply cannot be parsed.
    pub fn fallback(&self, kind: GenerationKind) -> Generated {
        match kind {
            GenerationKind::Mindmap => {
                let root = if self.title.is_empty() { "Paper" } else { self.title };
                Generated::Mindmap(MindmapNode {
                    name: root.to_string(),
                    children: ["Introduction", "Related Work", "Method", "Experiments", "Conclusion"]
                        .into_iter()
                        .map(MindmapNode::leaf)
                        .collect(),
                })
            }
            GenerationKind::Timeline => Generated::Timeline(Vec::new()),
            GenerationKind::Graph => Generated::Graph(self.fallback_graph()),
            GenerationKind::Summary | GenerationKind::Review => {
                let text = if self.abstract_text.is_empty() {
                    self.title.to_string()
                } else {
                    self.abstract_text.to_string()
                };
                if kind == GenerationKind::Summary {
                    Generated::Summary(text)
                } else {
                    Generated::Review(text)
                }
            }
        }
    }

    /// Core concept linked to up to five keywords, or to two placeholders.
    fn fallback_graph(&self) -> ConceptGraph {
        let core = if self.title.is_empty() { "Core concept" } else { self.title };
        let related: Vec<String> = if self.keywords.is_empty() {
            vec!["Related concept 1".to_string(), "Related concept 2".to_string()]
        } else {
            self.keywords.iter().take(5).cloned().collect()
        };

        let mut nodes = vec![GraphNode {
            id: "0".to_string(),
            name: core.to_string(),
            category: 0,
            symbol_size: None,
        }];
        let mut links = Vec::new();
        for (i, name) in related.into_iter().enumerate() {
            let id = (i + 1).to_string();
            links.push(GraphLink {
                source: "0".to_string(),
                target: id.clone(),
            });
            nodes.push(GraphNode {
                id,
                name,
                category: 1,
                symbol_size: None,
            });
        }

        ConceptGraph {
            nodes,
            links,
            categories: vec![
                GraphCategory {
                    name: "Core".to_string(),
                },
                GraphCategory {
                    name: "Related".to_string(),
                },
            ],
        }
    }

    /// Turn a reply into content, or `None` when it is unusable.
    pub fn parse_reply(&self, kind: GenerationKind, reply: &str) -> Option<Generated> {
        match kind {
            GenerationKind::Mindmap => {
                let mut root: MindmapNode = serde_json::from_str(strip_code_fence(reply)).ok()?;
                if root.name.trim().is_empty() {
                    return None;
                }
                root.prune(MAX_MINDMAP_DEPTH);
                Some(Generated::Mindmap(root))
            }
            GenerationKind::Timeline => {
                let events: Vec<TimelineEvent> =
                    serde_json::from_str(strip_code_fence(reply)).ok()?;
                Some(Generated::Timeline(events))
            }
            GenerationKind::Graph => {
                let mut graph: ConceptGraph = serde_json::from_str(strip_code_fence(reply)).ok()?;
                if graph.nodes.is_empty() {
                    return None;
                }
                graph.drop_dangling_links();
                Some(Generated::Graph(graph))
            }
            GenerationKind::Summary => Some(Generated::Summary(reply.trim().to_string())),
            GenerationKind::Review => Some(Generated::Review(reply.trim().to_string())),
        }
    }
}

/// Generate `kind` for `paper` with `client`.
///
/// Completion failures (after retries) are returned as errors; a reply
/// that cannot be parsed yields the fallback with `fallback: true`.
pub fn generate(
    client: &dyn TextCompletion,
    paper: PaperInfo<'_>,
    kind: GenerationKind,
) -> Result<Generation> {
    let reply = complete_with_retry(client, &paper.prompt(kind))?;

    Ok(match paper.parse_reply(kind, &reply) {
        Some(content) => Generation {
            content,
            fallback: false,
        },
        None => {
            log::warn!("Unusable {} reply; using fallback content", kind);
            Generation {
                content: paper.fallback(kind),
                fallback: true,
            }
        }
    })
}
