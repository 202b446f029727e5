use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse package category used during initial detection.
///
/// Families are distinct from templates: a `Scorm` package may end up rendered as
/// any template depending on its descriptor. Serialized as its plain key
/// (`"scorm"`, `"lectora"`), so custom families read naturally in settings files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageFamily {
    /// Structured-manifest packages (`imsmanifest.xml`).
    Scorm,
    Cmi5,
    /// Tin Can / xAPI packages (`tincan.xml`).
    Xapi,
    Aicc,
    H5p,
    /// Articulate Storyline output.
    Storyline,
    /// Adobe Captivate output.
    Captivate,
    Ispring,
    /// Slide decks (pptx, keynote, odp).
    Presentation,
    /// Plain HTML bundles.
    Web,
    /// Family added at runtime through a rule merge.
    Custom(String),
}

impl PackageFamily {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scorm => "scorm",
            Self::Cmi5 => "cmi5",
            Self::Xapi => "xapi",
            Self::Aicc => "aicc",
            Self::H5p => "h5p",
            Self::Storyline => "storyline",
            Self::Captivate => "captivate",
            Self::Ispring => "ispring",
            Self::Presentation => "presentation",
            Self::Web => "web",
            Self::Custom(name) => name,
        }
    }

    /// Parse a family key. Unknown keys become [`PackageFamily::Custom`].
    pub fn from_key(s: &str) -> Self {
        match s {
            "scorm" => Self::Scorm,
            "cmi5" => Self::Cmi5,
            "xapi" => Self::Xapi,
            "aicc" => Self::Aicc,
            "h5p" => Self::H5p,
            "storyline" => Self::Storyline,
            "captivate" => Self::Captivate,
            "ispring" => Self::Ispring,
            "presentation" => Self::Presentation,
            "web" => Self::Web,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Whether packages of this family ship a manifest the descriptor parser understands.
    pub fn uses_manifest_descriptor(&self) -> bool {
        matches!(self, Self::Scorm)
    }

    /// Name of the descriptor file to look for inside a package of this family.
    pub fn descriptor_file(&self) -> Option<&'static str> {
        match self {
            Self::Scorm => Some("imsmanifest.xml"),
            _ => None,
        }
    }

    /// Guess the family from a single file path when no listing is available.
    pub fn from_path(path: &str) -> Option<Self> {
        let name = path
            .rsplit(&['/', '\\'][..])
            .next()
            .unwrap_or(path)
            .to_ascii_lowercase();
        match name.as_str() {
            "imsmanifest.xml" => return Some(Self::Scorm),
            "cmi5.xml" => return Some(Self::Cmi5),
            "tincan.xml" => return Some(Self::Xapi),
            _ => {}
        }

        let (_, ext) = name.rsplit_once('.')?;
        match ext {
            "xml" => Some(Self::Scorm),
            "h5p" => Some(Self::H5p),
            "story" => Some(Self::Storyline),
            "cptx" => Some(Self::Captivate),
            "pptx" | "ppt" | "key" | "odp" => Some(Self::Presentation),
            "html" | "htm" => Some(Self::Web),
            "au" | "crs" => Some(Self::Aicc),
            _ => None,
        }
    }
}

impl From<String> for PackageFamily {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<PackageFamily> for String {
    fn from(family: PackageFamily) -> Self {
        family.as_str().to_string()
    }
}

impl fmt::Display for PackageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_as_str() {
        for family in [PackageFamily::Scorm, PackageFamily::Ispring, PackageFamily::Web] {
            assert_eq!(PackageFamily::from_key(family.as_str()), family);
        }
        assert_eq!(
            PackageFamily::from_key("lectora"),
            PackageFamily::Custom("lectora".to_string())
        );
    }

    #[test]
    fn serializes_as_plain_key() {
        let json = serde_json::to_string(&PackageFamily::Custom("lectora".into())).unwrap();
        assert_eq!(json, "\"lectora\"");
        let family: PackageFamily = serde_json::from_str("\"h5p\"").unwrap();
        assert_eq!(family, PackageFamily::H5p);
    }

    #[test]
    fn from_path_uses_file_name_then_extension() {
        assert_eq!(PackageFamily::from_path("uploads/imsmanifest.xml"), Some(PackageFamily::Scorm));
        assert_eq!(PackageFamily::from_path("C:\\drop\\tincan.xml"), Some(PackageFamily::Xapi));
        assert_eq!(PackageFamily::from_path("deck.PPTX"), Some(PackageFamily::Presentation));
        assert_eq!(PackageFamily::from_path("course.zip"), None);
        assert_eq!(PackageFamily::from_path("README"), None);
    }
}
