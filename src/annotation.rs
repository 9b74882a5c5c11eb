use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::io::open_maybe_gz;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptInfo {
    pub gene_id: String,
    pub strand: String,
}

/// Transcript accession -> (gene, strand), built from a gene annotation.
#[derive(Debug, Clone, Default)]
pub struct TranscriptLookup {
    by_transcript: HashMap<String, TranscriptInfo>,
}

impl TranscriptLookup {
    pub fn from_gtf(path: &Path) -> Result<Self> {
        let reader = open_maybe_gz(path)
            .with_context(|| format!("failed to open GTF {}", path.display()))?;
        let lookup = Self::from_gtf_reader(BufReader::new(reader))
            .with_context(|| format!("failed to read GTF {}", path.display()))?;
        info!(
            gtf = %path.display(),
            transcripts = lookup.len(),
            "transcript_lookup_ready"
        );
        Ok(lookup)
    }

    pub fn from_gtf_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut by_transcript = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            if line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.trim_end().split('\t').collect();
            if fields.len() < 9 {
                continue;
            }
            let strand = fields[6];
            let mut gene_id = None;
            let mut transcript_id = None;
            for item in fields[8].split(';') {
                let item = item.trim();
                if let Some(rest) = item.strip_prefix("gene_id") {
                    gene_id = Some(attribute_value(rest));
                } else if let Some(rest) = item.strip_prefix("transcript_id") {
                    transcript_id = Some(attribute_value(rest));
                }
            }
            if let (Some(gene_id), Some(transcript_id)) = (gene_id, transcript_id) {
                if gene_id.is_empty() || transcript_id.is_empty() {
                    continue;
                }
                // first record per transcript wins
                by_transcript
                    .entry(strip_version(&transcript_id).to_string())
                    .or_insert(TranscriptInfo {
                        gene_id,
                        strand: strand.to_string(),
                    });
            }
        }
        Ok(Self { by_transcript })
    }

    pub fn insert(&mut self, transcript: &str, gene_id: &str, strand: &str) {
        self.by_transcript.insert(
            strip_version(transcript).to_string(),
            TranscriptInfo {
                gene_id: gene_id.to_string(),
                strand: strand.to_string(),
            },
        );
    }

    pub fn get(&self, accession: &str) -> Option<&TranscriptInfo> {
        self.by_transcript.get(strip_version(accession))
    }

    pub fn len(&self) -> usize {
        self.by_transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_transcript.is_empty()
    }
}

fn attribute_value(rest: &str) -> String {
    rest.trim()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches('"')
        .to_string()
}

/// Drops a trailing `.N` ordinal/version suffix.
pub fn strip_version(accession: &str) -> &str {
    let accession = accession.trim();
    match accession.rsplit_once('.') {
        Some((head, tail))
            if !head.is_empty() && !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => accession,
    }
}

/// Splits a PSI-Sigma reference transcript into (is_novel, accession). A
/// leading `Ex.` marks an exon absent from the reference annotation.
pub fn split_reference_transcript(raw: &str) -> (bool, String) {
    let raw = raw.trim();
    let (novel, rest) = match raw.split_once('.') {
        Some(("Ex", rest)) => (true, rest),
        _ => (false, raw),
    };
    (novel, strip_version(rest).to_string())
}
