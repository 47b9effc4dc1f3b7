use serde::Serialize;
use std::fmt::Write;

use super::terms::top_terms;
use crate::common::{truncate_chars, PaperAnalysis, PaperSource};
use crate::config::SynthesisConfig;

/// Number of papers per source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: PaperSource,
    pub count: usize,
}

/// Counts per source in first-seen order
pub fn source_distribution(analyses: &[PaperAnalysis]) -> Vec<SourceCount> {
    let mut counts: Vec<SourceCount> = Vec::new();
    for analysis in analyses {
        let source = analysis.paper.source;
        match counts.iter_mut().find(|c| c.source == source) {
            Some(entry) => entry.count += 1,
            None => counts.push(SourceCount { source, count: 1 }),
        }
    }
    counts
}

/// Min and max over known years
pub fn year_span(analyses: &[PaperAnalysis]) -> Option<(i32, i32)> {
    let years = analyses.iter().filter_map(|a| a.paper.year);
    years.fold(None, |span, year| match span {
        None => Some((year, year)),
        Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
    })
}

const NEXT_STEPS: [&str; 3] = [
    "Build a common benchmark protocol for fair comparison.",
    "Add error taxonomy and failure-case reporting.",
    "Test transferability across domains and unseen datasets.",
];

/// Markdown synthesis with a fixed five-heading skeleton.
///
/// Output depends only on the arguments, so identical inputs render
/// byte-identical documents.
pub fn render_narrative(query: &str, analyses: &[PaperAnalysis], config: &SynthesisConfig) -> String {
    let mut md = String::new();
    let topic = query.trim();
    let topic = if topic.is_empty() { "(unspecified)" } else { topic };

    md.push_str("# Structured Analysis\n\n");

    md.push_str("## Query Focus\n");
    let _ = writeln!(md, "- **Topic:** {}", topic);
    let _ = writeln!(md, "- **Papers analyzed:** {}", analyses.len());
    if let Some((lo, hi)) = year_span(analyses) {
        let _ = writeln!(md, "- **Time coverage:** {} to {}", lo, hi);
    }
    let sources = source_distribution(analyses);
    if sources.is_empty() {
        md.push_str("- **Sources:** none\n");
    } else {
        let summary: Vec<String> = sources
            .iter()
            .map(|s| format!("{}: {}", s.source, s.count))
            .collect();
        let _ = writeln!(md, "- **Sources:** {}", summary.join(", "));
    }

    md.push_str("\n## Thematic Signals\n");
    let texts = analyses.iter().flat_map(|a| {
        [
            a.sections.method_used.as_str(),
            a.sections.contributions.as_str(),
            a.sections.limitations.as_str(),
            a.sections.literature_review.as_str(),
        ]
    });
    let terms = top_terms(texts, &config.stop_words, config.top_terms);
    if terms.is_empty() {
        md.push_str("- **Frequent terms:** No dominant terms\n");
    } else {
        let listed: Vec<String> = terms.iter().map(|(t, c)| format!("{} ({})", t, c)).collect();
        let _ = writeln!(md, "- **Frequent terms:** {}", listed.join(", "));
    }

    md.push_str("\n## Cross-Paper Findings\n");
    write_excerpts(&mut md, analyses, config.finding_papers, config.excerpt_chars, |a| {
        a.sections.method_used.as_str()
    });

    md.push_str("\n## Research Gap Synthesis\n");
    write_excerpts(&mut md, analyses, config.gap_papers, config.excerpt_chars, |a| {
        a.sections.research_gap.as_str()
    });

    md.push_str("\n## Actionable Next Steps\n");
    for step in NEXT_STEPS {
        let _ = writeln!(md, "- {}", step);
    }

    md
}

fn write_excerpts<F>(md: &mut String, analyses: &[PaperAnalysis], limit: usize, max_chars: usize, field: F)
where
    F: Fn(&PaperAnalysis) -> &str,
{
    if analyses.is_empty() || limit == 0 {
        md.push_str("- No papers available for this section.\n");
        return;
    }
    for (idx, analysis) in analyses.iter().take(limit).enumerate() {
        let _ = writeln!(
            md,
            "- **P{} {}:** {}",
            idx + 1,
            analysis.paper.title.trim(),
            truncate_chars(field(analysis).trim(), max_chars)
        );
    }
}
