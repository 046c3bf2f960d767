use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::results::layout::ResultLayout;

const SHARED_ROOT: &str = "temp/microbemasst";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasstVariant {
    Microbe,
    Plant,
    Metadata,
    PersonalCare,
    Food,
}

impl MasstVariant {
    pub const ALL: [MasstVariant; 5] = [
        MasstVariant::Microbe,
        MasstVariant::Plant,
        MasstVariant::Metadata,
        MasstVariant::PersonalCare,
        MasstVariant::Food,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MasstVariant::Microbe => "microbe",
            MasstVariant::Plant => "plant",
            MasstVariant::Metadata => "metadata",
            MasstVariant::PersonalCare => "personalcare",
            MasstVariant::Food => "food",
        }
    }

    pub fn default_layout(&self) -> ResultLayout {
        match self {
            MasstVariant::Microbe => ResultLayout::new(SHARED_ROOT, "fastMASST_microbe.html")
                .with_analog("fastMASST_analog_microbe.html"),
            MasstVariant::Plant => ResultLayout::new(SHARED_ROOT, "fastMASST_plant.html")
                .with_analog("fastMASST_analog_plant.html"),
            MasstVariant::Metadata => ResultLayout::new(SHARED_ROOT, "fastMASST_combined.html")
                .with_no_matches_placeholder("html_results/succes_no_matches_to_metadata.html"),
            // personalcareMASST writes into its own tree but reuses the microbe report
            MasstVariant::PersonalCare => {
                ResultLayout::new("temp/personalcareMASST", "fastMASST_microbe.html")
            }
            MasstVariant::Food => ResultLayout::new(SHARED_ROOT, "fastMASST_food.html")
                .with_analog("fastMASST_analog_food.html"),
        }
    }
}

impl fmt::Display for MasstVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MasstVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.strip_suffix("masst").unwrap_or(&key);
        MasstVariant::ALL
            .into_iter()
            .find(|v| v.name() == key)
            .ok_or_else(|| {
                format!("unknown MASST variant {s:?} (expected microbe, plant, metadata, personalcare or food)")
            })
    }
}
