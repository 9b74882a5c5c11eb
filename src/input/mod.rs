use std::fs;
use std::path::{Path, PathBuf};

use crate::canon::rmats;
use crate::error::{SpliceError, SpliceResult};
use crate::event::{EventType, Tool};
use crate::table::Table;

pub const PSISIGMA_RESULT_FILE: &str = "PSIsigma_r10_ir3.sorted.txt";
const SUPPA2_DPSI_TOKEN: &str = "dpsi";
const SUPPA2_PSIVEC_TOKEN: &str = "psivec";

/// Files feeding one (tool, event type) unit.
#[derive(Debug, Clone, Default)]
pub struct UnitInputs {
    pub primary: Vec<PathBuf>,
    pub novelty: Vec<PathBuf>,
    pub inclusion: Option<PathBuf>,
}

pub fn tool_sample_dir(root: &Path, tool: Tool, sample: &str) -> PathBuf {
    root.join(tool.label()).join(sample)
}

pub fn majiq_files(event: EventType) -> &'static [&'static str] {
    match event {
        EventType::Se => &["cassette.tsv"],
        EventType::A3ss => &["alt3prime.tsv", "p_alt3prime.tsv"],
        EventType::A5ss => &["alt5prime.tsv", "p_alt5prime.tsv"],
        EventType::Af => &["alternate_first_exon.tsv", "p_alternate_first_exon.tsv"],
        EventType::Al => &["alternate_last_exon.tsv", "p_alternate_last_exon.tsv"],
        EventType::Ri => &["alternative_intron.tsv"],
        EventType::Mx => &["mutually_exclusive.tsv"],
    }
}

pub fn rmats_result_file(event: EventType) -> String {
    format!("{}.MATS.JCEC.txt", rmats::file_event_name(event))
}

pub fn rmats_novelty_files(event: EventType) -> [String; 2] {
    let name = rmats::file_event_name(event);
    [
        format!("fromGTF.novelSpliceSite.{}.txt", name),
        format!("fromGTF.novelJunction.{}.txt", name),
    ]
}

/// Locates the input files of one unit. Missing primary files are
/// `InputNotFound`; missing auxiliary files are simply absent.
pub fn resolve_unit(root: &Path, sample: &str, tool: Tool, event: EventType) -> SpliceResult<UnitInputs> {
    tool.ensure_supports(event)?;
    let dir = tool_sample_dir(root, tool, sample);
    let mut inputs = UnitInputs::default();
    match tool {
        Tool::Suppa2 => {
            let dpsi = first_file_containing(&dir, SUPPA2_DPSI_TOKEN)
                .ok_or_else(|| SpliceError::InputNotFound(dir.join(format!("*{}*", SUPPA2_DPSI_TOKEN))))?;
            inputs.primary.push(dpsi);
            inputs.inclusion = first_file_containing(&dir, SUPPA2_PSIVEC_TOKEN);
        }
        Tool::Rmats => {
            inputs.primary.push(require_file(dir.join(rmats_result_file(event)))?);
            inputs.novelty = rmats_novelty_files(event)
                .iter()
                .map(|name| dir.join(name))
                .filter(|p| p.is_file())
                .collect();
        }
        Tool::PsiSigma => {
            inputs.primary.push(require_file(dir.join(PSISIGMA_RESULT_FILE))?);
        }
        Tool::Majiq => {
            for name in majiq_files(event) {
                inputs.primary.push(require_file(dir.join(name))?);
            }
        }
    }
    Ok(inputs)
}

fn require_file(path: PathBuf) -> SpliceResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(SpliceError::InputNotFound(path))
    }
}

fn first_file_containing(dir: &Path, token: &str) -> Option<PathBuf> {
    let mut names: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(token))
        })
        .collect();
    names.sort();
    names.into_iter().next()
}

pub fn load_primary(inputs: &UnitInputs) -> SpliceResult<Table> {
    Table::read_concat(&inputs.primary)
}

pub fn load_novelty(inputs: &UnitInputs) -> SpliceResult<Vec<Table>> {
    inputs.novelty.iter().map(|p| Table::read_tsv(p)).collect()
}

pub fn load_inclusion(inputs: &UnitInputs) -> SpliceResult<Option<Table>> {
    inputs.inclusion.as_deref().map(Table::read_tsv).transpose()
}
