use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SpliceError;

/// Upstream splicing quantification tools whose calls are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tool {
    Suppa2,
    Rmats,
    PsiSigma,
    Majiq,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Suppa2, Tool::Rmats, Tool::PsiSigma, Tool::Majiq];

    /// Display name, also used as the per-tool directory name.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Suppa2 => "SUPPA2",
            Tool::Rmats => "rMATS",
            Tool::PsiSigma => "PSI-Sigma",
            Tool::Majiq => "MAJIQ",
        }
    }

    pub fn supported_events(&self) -> &'static [EventType] {
        match self {
            Tool::Suppa2 | Tool::Majiq => &EventType::ALL,
            Tool::Rmats | Tool::PsiSigma => &[
                EventType::Se,
                EventType::A3ss,
                EventType::A5ss,
                EventType::Ri,
                EventType::Mx,
            ],
        }
    }

    pub fn supports(&self, event: EventType) -> bool {
        self.supported_events().contains(&event)
    }

    pub fn ensure_supports(&self, event: EventType) -> Result<(), SpliceError> {
        if self.supports(event) {
            Ok(())
        } else {
            Err(SpliceError::UnsupportedConfiguration { tool: *self, event })
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tool {
    type Err = SpliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suppa2" => Ok(Tool::Suppa2),
            "rmats" => Ok(Tool::Rmats),
            "psi-sigma" | "psisigma" | "psi_sigma" => Ok(Tool::PsiSigma),
            "majiq" => Ok(Tool::Majiq),
            _ => Err(SpliceError::UnsupportedSoftware(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EventType {
    #[serde(rename = "SE")]
    Se,
    #[serde(rename = "A3SS")]
    A3ss,
    #[serde(rename = "A5SS")]
    A5ss,
    #[serde(rename = "AF")]
    Af,
    #[serde(rename = "AL")]
    Al,
    #[serde(rename = "RI")]
    Ri,
    #[serde(rename = "MX")]
    Mx,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::Se,
        EventType::A3ss,
        EventType::A5ss,
        EventType::Af,
        EventType::Al,
        EventType::Ri,
        EventType::Mx,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventType::Se => "SE",
            EventType::A3ss => "A3SS",
            EventType::A5ss => "A5SS",
            EventType::Af => "AF",
            EventType::Al => "AL",
            EventType::Ri => "RI",
            EventType::Mx => "MX",
        }
    }

    /// Event code embedded in a uniform_ID.
    pub fn code(&self) -> &'static str {
        match self {
            EventType::Se => "SE",
            EventType::A3ss => "A3",
            EventType::A5ss => "A5",
            EventType::Af => "AF",
            EventType::Al => "AL",
            EventType::Ri => "RI",
            EventType::Mx => "MX",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = SpliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|ev| ev.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SpliceError::UnsupportedEventType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DseClass {
    #[serde(rename = "up-regulate")]
    Up,
    #[serde(rename = "down-regulate")]
    Down,
    #[serde(rename = "non-DSE")]
    NonDse,
}

impl DseClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DseClass::Up => "up-regulate",
            DseClass::Down => "down-regulate",
            DseClass::NonDse => "non-DSE",
        }
    }

    pub fn is_dse(&self) -> bool {
        matches!(self, DseClass::Up | DseClass::Down)
    }
}

impl fmt::Display for DseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DseClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up-regulate" => Ok(DseClass::Up),
            "down-regulate" => Ok(DseClass::Down),
            "non-DSE" => Ok(DseClass::NonDse),
            other => Err(format!("unknown class '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRecord {
    pub uniform_id: String,
    pub class: DseClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DpsiRecord {
    pub uniform_id: String,
    pub value: Option<f64>,
}
