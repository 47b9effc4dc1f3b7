//! Similarity network over paper abstracts.

pub mod layout;
pub mod tfidf;

use log::debug;
use serde::Serialize;

use crate::common::Paper;
use crate::config::GraphConfig;
use layout::{spring_layout, LayoutParams};
use tfidf::similarity_matrix;

/// Whether an edge reflects real similarity or only keeps the graph connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Similarity,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: usize,
    pub label: String,
    pub title: String,
    pub year: Option<i32>,
    pub color: String,
    pub intensity: f64,
    pub size: usize,
    pub position: [f64; 2],
}

/// Undirected edge, `source < target`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub similarity: Vec<Vec<f64>>,
}

impl SimilarityGraph {
    pub fn similarity_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Similarity).count()
    }

    pub fn placeholder_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Placeholder).count()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.edges
            .iter()
            .filter(|e| e.source == node || e.target == node)
            .count()
    }
}

/// Colour intensity from recency: older papers lighter
fn year_intensity(year: Option<i32>, span: Option<(i32, i32)>) -> f64 {
    match (year, span) {
        (Some(year), Some((lo, hi))) if hi > lo => 0.25 + 0.7 * f64::from(year - lo) / f64::from(hi - lo),
        _ => 0.6,
    }
}

fn edges_from_matrix(similarity: &[Vec<f64>], threshold: f64, placeholder_weight: f64) -> Vec<Edge> {
    let n = similarity.len();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if similarity[i][j] >= threshold {
                edges.push(Edge {
                    source: i,
                    target: j,
                    weight: similarity[i][j],
                    kind: EdgeKind::Similarity,
                });
            }
        }
    }

    // Keep a connected chain when nothing is similar enough
    if edges.is_empty() && n >= 2 {
        edges = (0..n - 1)
            .map(|i| Edge {
                source: i,
                target: i + 1,
                weight: placeholder_weight,
                kind: EdgeKind::Placeholder,
            })
            .collect();
    }
    edges
}

/// Build the abstract similarity graph with positions and display hints
pub fn build_similarity_graph(papers: &[Paper], config: &GraphConfig) -> SimilarityGraph {
    if papers.is_empty() {
        return SimilarityGraph::default();
    }

    let abstracts: Vec<&str> = papers.iter().map(|p| p.abstract_text.as_str()).collect();
    let similarity = similarity_matrix(&abstracts, &config.stop_words, config.max_features);
    let edges = edges_from_matrix(&similarity, config.similarity_threshold, config.placeholder_weight);

    let n = papers.len();
    let mut adjacency = vec![vec![0.0; n]; n];
    for edge in &edges {
        adjacency[edge.source][edge.target] = edge.weight;
        adjacency[edge.target][edge.source] = edge.weight;
    }
    let positions = spring_layout(
        &adjacency,
        &LayoutParams {
            seed: config.layout_seed,
            iterations: config.layout_iterations,
            spacing: config.layout_spacing,
        },
    );

    let span = papers
        .iter()
        .filter_map(|p| p.year)
        .fold(None, |span: Option<(i32, i32)>, y| match span {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        });

    let mut graph = SimilarityGraph {
        nodes: Vec::with_capacity(n),
        edges,
        similarity,
    };
    for (id, (paper, position)) in papers.iter().zip(positions).enumerate() {
        let intensity = year_intensity(paper.year, span);
        let size = 18 + 3 * graph.degree(id);
        graph.nodes.push(Node {
            id,
            label: format!("P{}", id + 1),
            title: paper.title.clone(),
            year: paper.year,
            color: format!("rgba(16, 58, 133, {:.3})", intensity),
            intensity,
            size,
            position,
        });
    }

    debug!(
        "Similarity graph: {} nodes, {} similarity edges, {} placeholder edges",
        graph.nodes.len(),
        graph.similarity_edge_count(),
        graph.placeholder_edge_count()
    );
    graph
}
