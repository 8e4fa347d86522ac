use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered funnel stages. The derive order is the funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Lead,
    Contacto,
    Cita,
    VentaBruta,
    Escrituracion,
}

impl FunnelStage {
    pub const COUNT: usize = 5;

    pub const ALL: [FunnelStage; Self::COUNT] = [
        FunnelStage::Lead,
        FunnelStage::Contacto,
        FunnelStage::Cita,
        FunnelStage::VentaBruta,
        FunnelStage::Escrituracion,
    ];

    /// Stages a cohort can convert into.
    pub const CONVERSIONS: [FunnelStage; 4] = [
        FunnelStage::Contacto,
        FunnelStage::Cita,
        FunnelStage::VentaBruta,
        FunnelStage::Escrituracion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FunnelStage::Lead => "lead",
            FunnelStage::Contacto => "contacto",
            FunnelStage::Cita => "cita",
            FunnelStage::VentaBruta => "venta_bruta",
            FunnelStage::Escrituracion => "escrituracion",
        }
    }

    /// Display label the dashboard renders verbatim.
    pub fn label(self) -> &'static str {
        match self {
            FunnelStage::Lead => "Lead",
            FunnelStage::Contacto => "Contacto",
            FunnelStage::Cita => "Cita",
            FunnelStage::VentaBruta => "Venta Bruta",
            FunnelStage::Escrituracion => "Escrituración",
        }
    }

    pub fn is_conversion(self) -> bool {
        Self::CONVERSIONS.contains(&self)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn previous(self) -> Option<FunnelStage> {
        match self.index() {
            0 => None,
            i => Some(Self::ALL[i - 1]),
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStage(pub String);

impl fmt::Display for UnknownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown funnel stage `{}`", self.0)
    }
}

impl std::error::Error for UnknownStage {}

impl FromStr for FunnelStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim())
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}
