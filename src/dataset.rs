use std::fmt;
use std::str::FromStr;

use crate::errors::{MedSegError, Result};

/// The closed set of benchmark datasets the loaders understand.
///
/// Variant order is the enumeration order used by `Registry::load_all` and `describe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    ChaseDb1,
    Stare,
    CvcClinicDb,
    EtisLarib,
    Ph2,
    Tn3k,
    Tg3k,
    Ddti,
    Hc18,
    Dsb18,
    Consep,
}

impl Dataset {
    pub const ALL: [Dataset; 11] = [
        Dataset::ChaseDb1,
        Dataset::Stare,
        Dataset::CvcClinicDb,
        Dataset::EtisLarib,
        Dataset::Ph2,
        Dataset::Tn3k,
        Dataset::Tg3k,
        Dataset::Ddti,
        Dataset::Hc18,
        Dataset::Dsb18,
        Dataset::Consep,
    ];

    /// Registered name. Also the directory name under the data root.
    pub const fn name(self) -> &'static str {
        match self {
            Dataset::ChaseDb1 => "CHASE_DB1",
            Dataset::Stare => "STARE",
            Dataset::CvcClinicDb => "CVC-ClinicDB",
            Dataset::EtisLarib => "ETIS-Larib",
            Dataset::Ph2 => "PH2",
            Dataset::Tn3k => "TN3K",
            Dataset::Tg3k => "TG3K",
            Dataset::Ddti => "DDTI",
            Dataset::Hc18 => "HC18",
            Dataset::Dsb18 => "DSB18",
            Dataset::Consep => "CoNSeP",
        }
    }

    /// Fixed text prompt fed to the segmentation model for every sample of the dataset.
    pub const fn prompt(self) -> &'static str {
        match self {
            Dataset::ChaseDb1 | Dataset::Stare => "Retinal Blood Vessel",
            Dataset::CvcClinicDb | Dataset::EtisLarib => "Polyp",
            Dataset::Ph2 => "Skin Lesion",
            Dataset::Tn3k | Dataset::Tg3k | Dataset::Ddti => "thyroid nodule",
            Dataset::Hc18 => "fetal head",
            Dataset::Dsb18 | Dataset::Consep => "cell nucleus",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.name()).collect()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = MedSegError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| MedSegError::UnknownDataset {
                name: s.to_string(),
                available: Self::names(),
            })
    }
}
