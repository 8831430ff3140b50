//! Rendering of per-record analysis reports, as plain text or JSON.

use std::io::{self, Write};

use serde::Serialize;

use crate::types::StrandDecision;

/// One analyzed record, ready for serialization.
#[derive(Serialize)]
pub struct RecordReport<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub decision: &'a StrandDecision,
}

pub fn write_text(out: &mut dyn Write, id: &str, decision: &StrandDecision) -> io::Result<()> {
    writeln!(out, "\nAnalyzing sequence: {}", id)?;
    writeln!(out, "Best match found on {} strand", decision.strand)?;
    writeln!(out, "Classification: {}", decision.results.classification)?;
    writeln!(
        out,
        "Overall confidence: {:.2}%",
        decision.overall_confidence * 100.0
    )?;

    writeln!(out, "\nDetails:")?;
    for detail in &decision.results.details {
        writeln!(out, "- {}", detail)?;
    }

    writeln!(out, "\nRegion detection details:")?;
    for (region, result) in &decision.results.regions {
        writeln!(out, "\n{}:", region)?;
        if result.present {
            writeln!(out, "  Present: true")?;
            for (idx, m) in result.matches.iter().enumerate() {
                writeln!(out, "  Match {}:", idx + 1)?;
                writeln!(out, "    Similarity: {:.2}%", m.similarity * 100.0)?;
                writeln!(out, "    Position: {}-{}", m.start, m.end)?;
            }
        } else {
            writeln!(out, "  Present: false")?;
        }
        writeln!(out, "  Expected length: {} bp", result.expected_length)?;
    }

    writeln!(out, "{}", "-".repeat(50))?;
    Ok(())
}

pub fn write_json(out: &mut dyn Write, id: &str, decision: &StrandDecision) -> io::Result<()> {
    let report = RecordReport { id, decision };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
