use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::Dosha;

/// Patient-facing guidance shown next to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoshaProfile {
    pub description: String,
    pub lifestyle: Vec<String>,
    pub diet: Vec<String>,
}

/// Guidance content keyed by dominant dosha.
///
/// Injected into the service; scoring never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfileCatalog {
    profiles: BTreeMap<Dosha, DoshaProfile>,
}

impl ProfileCatalog {
    /// Build a catalog, requiring an entry for every dosha.
    pub fn new(profiles: BTreeMap<Dosha, DoshaProfile>) -> Result<Self, ProfileCatalogError> {
        if let Some(missing) = Dosha::ALL
            .into_iter()
            .find(|dosha| !profiles.contains_key(dosha))
        {
            return Err(ProfileCatalogError::Missing(missing));
        }
        Ok(Self { profiles })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileCatalogError> {
        let profiles: BTreeMap<Dosha, DoshaProfile> = serde_json::from_reader(reader)?;
        Self::new(profiles)
    }

    pub fn from_path(path: &Path) -> Result<Self, ProfileCatalogError> {
        let file = File::open(path).map_err(|source| ProfileCatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn get(&self, dosha: Dosha) -> Option<&DoshaProfile> {
        self.profiles.get(&dosha)
    }

    /// Default clinic copy.
    pub fn standard() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            Dosha::Vata,
            profile(
                "Vata types are creative, quick-thinking and energetic, with a light frame. \
                 When out of balance they tend towards anxiety, dryness and irregular digestion.",
                &[
                    "Keep a regular daily routine for meals and sleep",
                    "Favour warm, calm environments and gentle exercise such as yoga or walking",
                    "Daily warm oil self-massage (abhyanga)",
                    "Go to bed before 10 pm",
                ],
                &[
                    "Warm, moist, grounding foods such as soups, stews and cooked grains",
                    "Favour sweet, sour and salty tastes",
                    "Reduce raw vegetables, cold drinks and dry snacks",
                    "Use warming spices such as ginger, cumin and cinnamon",
                ],
            ),
        );
        profiles.insert(
            Dosha::Pitta,
            profile(
                "Pitta types are focused, driven and sharp, with a medium build and strong \
                 digestion. When out of balance they tend towards irritability, inflammation \
                 and acidity.",
                &[
                    "Avoid excessive heat and midday sun",
                    "Make time for cooling activities such as swimming or evening walks",
                    "Balance work with rest and avoid skipping meals",
                    "Practise calming breathwork such as sheetali",
                ],
                &[
                    "Cooling foods such as cucumber, leafy greens, melons and coconut",
                    "Favour sweet, bitter and astringent tastes",
                    "Reduce chillies, fried foods, alcohol and excess caffeine",
                    "Use coriander, fennel and mint",
                ],
            ),
        );
        profiles.insert(
            Dosha::Kapha,
            profile(
                "Kapha types are calm, steady and compassionate, with a solid build and good \
                 stamina. When out of balance they tend towards lethargy, congestion and weight \
                 gain.",
                &[
                    "Exercise vigorously every day",
                    "Rise early and avoid daytime naps",
                    "Seek variety and new stimulation",
                    "Keep warm and dry in damp weather",
                ],
                &[
                    "Light, warm, dry foods such as legumes, barley and steamed vegetables",
                    "Favour pungent, bitter and astringent tastes",
                    "Reduce dairy, sweets, fried and heavy foods",
                    "Use stimulating spices such as black pepper, turmeric and ginger",
                ],
            ),
        );
        Self { profiles }
    }
}

impl<'de> Deserialize<'de> for ProfileCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let profiles = BTreeMap::<Dosha, DoshaProfile>::deserialize(deserializer)?;
        Self::new(profiles).map_err(serde::de::Error::custom)
    }
}

fn profile(description: &str, lifestyle: &[&str], diet: &[&str]) -> DoshaProfile {
    DoshaProfile {
        description: description.to_string(),
        lifestyle: lifestyle.iter().map(|line| line.to_string()).collect(),
        diet: diet.iter().map(|line| line.to_string()).collect(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileCatalogError {
    #[error("no guidance configured for {0}")]
    Missing(Dosha),
    #[error("profile catalog could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("profile catalog {path:?} could not be read: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
