//! Data structures describing the heroes placed into the report.
//!
//! [`HeroRecord`] is the immutable value handed from the fetcher to the grouping and layout
//! stages.  The `Api*` types mirror the JSON documents served by the upstream superhero API and
//! are only used while mapping a response into a record.

use serde::Deserialize;

/// Placeholder tag used when an occupation or birthplace is missing upstream.
pub const PLACEHOLDER_UNKNOWN: &str = "unknown";

/// Placeholder used when a hero has no alter egos.
pub const NO_ALTER_EGOS: &str = "No alter egos found.";

/// Marker the upstream API uses for absent values.
const UPSTREAM_MISSING: &str = "-";

/// A single hero as it appears in the rendered document.
///
/// The occupation, aliases and alter egos sequences are never empty once a record has been built
/// through [`HeroRecord::new`] or [`HeroRecord::from_api`]; missing values are replaced with the
/// placeholders defined in this module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeroRecord {
    id: u32,
    full_name: String,
    occupation: Vec<String>,
    aliases: Vec<String>,
    alter_egos: Vec<String>,
    place_of_birth: String,
    image_ref: String,
}

impl HeroRecord {
    /// Creates a record with the given identifier and full name.
    ///
    /// All remaining fields start out as placeholders and can be replaced with the `with_*`
    /// helpers.
    pub fn new(id: u32, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            occupation: vec![PLACEHOLDER_UNKNOWN.to_string()],
            aliases: vec![UPSTREAM_MISSING.to_string()],
            alter_egos: vec![NO_ALTER_EGOS.to_string()],
            place_of_birth: PLACEHOLDER_UNKNOWN.to_string(),
            image_ref: String::new(),
        }
    }

    /// Builds a record from the full upstream hero document.
    pub fn from_api(hero: ApiHero) -> Self {
        let ApiHero {
            id,
            name,
            biography,
            work,
            images,
        } = hero;

        let full_name = if biography.full_name.trim().is_empty() {
            name
        } else {
            biography.full_name
        };

        Self {
            id,
            full_name,
            occupation: non_empty_or(split_tags(&work.occupation, &[',', ';']), PLACEHOLDER_UNKNOWN),
            aliases: non_empty_or(
                biography
                    .aliases
                    .into_iter()
                    .map(|alias| alias.trim().to_string())
                    .filter(|alias| !alias.is_empty())
                    .collect(),
                UPSTREAM_MISSING,
            ),
            alter_egos: non_empty_or(split_tags(&biography.alter_egos, &[',']), NO_ALTER_EGOS),
            place_of_birth: placeholder_if_missing(&biography.place_of_birth),
            image_ref: images.preferred().to_string(),
        }
    }

    /// Returns the upstream identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the hero's full name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the ordered occupation tags.
    pub fn occupation(&self) -> &[String] {
        &self.occupation
    }

    /// Returns the first occupation tag, used as the grouping key.
    pub fn primary_occupation(&self) -> &str {
        self.occupation
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_UNKNOWN)
    }

    /// Returns the ordered aliases.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the ordered alter egos.
    pub fn alter_egos(&self) -> &[String] {
        &self.alter_egos
    }

    /// Returns the place of birth.
    pub fn place_of_birth(&self) -> &str {
        &self.place_of_birth
    }

    /// Returns the image reference, either a URL or a file path.
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    /// Replaces the occupation tags and returns the updated record.
    pub fn with_occupation<I, S>(mut self, occupation: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.occupation = non_empty_or(
            occupation.into_iter().map(Into::into).collect(),
            PLACEHOLDER_UNKNOWN,
        );
        self
    }

    /// Replaces the aliases and returns the updated record.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = non_empty_or(aliases.into_iter().map(Into::into).collect(), UPSTREAM_MISSING);
        self
    }

    /// Replaces the alter egos and returns the updated record.
    pub fn with_alter_egos<I, S>(mut self, alter_egos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alter_egos = non_empty_or(
            alter_egos.into_iter().map(Into::into).collect(),
            NO_ALTER_EGOS,
        );
        self
    }

    /// Sets the place of birth and returns the updated record.
    pub fn with_place_of_birth(mut self, place_of_birth: impl Into<String>) -> Self {
        self.place_of_birth = placeholder_if_missing(&place_of_birth.into());
        self
    }

    /// Sets the image reference and returns the updated record.
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }
}

fn split_tags(value: &str, separators: &[char]) -> Vec<String> {
    value
        .split(|ch| separators.contains(&ch))
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != UPSTREAM_MISSING)
        .map(str::to_string)
        .collect()
}

fn non_empty_or(values: Vec<String>, placeholder: &str) -> Vec<String> {
    if values.is_empty() {
        vec![placeholder.to_string()]
    } else {
        values
    }
}

fn placeholder_if_missing(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == UPSTREAM_MISSING {
        PLACEHOLDER_UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Biography document served by `/biography/{id}.json`.
///
/// The fetcher only needs the publisher from this document, but the remaining fields are
/// deserialized as well because the full hero document embeds the same shape.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiBiography {
    pub full_name: String,
    pub alter_egos: String,
    pub aliases: Vec<String>,
    pub place_of_birth: String,
    pub publisher: Option<String>,
}

/// Work section of the full hero document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiWork {
    pub occupation: String,
}

/// Image URLs of the full hero document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiImages {
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
}

impl ApiImages {
    /// Returns the medium image, falling back to the other sizes when it is missing.
    pub fn preferred(&self) -> &str {
        [&self.md, &self.lg, &self.sm, &self.xs]
            .into_iter()
            .find(|url| !url.trim().is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Full hero document served by `/id/{id}.json`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiHero {
    pub id: u32,
    pub name: String,
    pub biography: ApiBiography,
    pub work: ApiWork,
    pub images: ApiImages,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATMAN: &str = r#"{
        "id": 70,
        "name": "Batman",
        "slug": "70-batman",
        "biography": {
            "fullName": "Bruce Wayne",
            "alterEgos": "No alter egos found.",
            "aliases": ["Insider", "Matches Malone"],
            "placeOfBirth": "Crest Hill, Bristol Township; Gotham County",
            "firstAppearance": "Detective Comics #27",
            "publisher": "DC Comics",
            "alignment": "good"
        },
        "work": { "occupation": "Businessman", "base": "Batcave" },
        "images": {
            "xs": "https://example.test/xs/70-batman.jpg",
            "sm": "https://example.test/sm/70-batman.jpg",
            "md": "https://example.test/md/70-batman.jpg",
            "lg": "https://example.test/lg/70-batman.jpg"
        }
    }"#;

    #[test]
    fn maps_full_document() {
        let hero: ApiHero = serde_json::from_str(BATMAN).expect("valid document");
        let record = HeroRecord::from_api(hero);

        assert_eq!(record.id(), 70);
        assert_eq!(record.full_name(), "Bruce Wayne");
        assert_eq!(record.occupation(), ["Businessman"]);
        assert_eq!(record.aliases(), ["Insider", "Matches Malone"]);
        assert_eq!(record.alter_egos(), [NO_ALTER_EGOS]);
        assert_eq!(
            record.place_of_birth(),
            "Crest Hill, Bristol Township; Gotham County"
        );
        assert_eq!(record.image_ref(), "https://example.test/md/70-batman.jpg");
    }

    #[test]
    fn missing_values_become_placeholders() {
        let hero: ApiHero = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Abin Sur",
                "biography": {
                    "fullName": "",
                    "alterEgos": "-",
                    "aliases": ["-"],
                    "placeOfBirth": "-",
                    "publisher": "DC Comics"
                },
                "work": { "occupation": "-" },
                "images": { "sm": "https://example.test/sm/3.jpg" }
            }"#,
        )
        .expect("valid document");

        let record = HeroRecord::from_api(hero);
        assert_eq!(record.full_name(), "Abin Sur");
        assert_eq!(record.primary_occupation(), PLACEHOLDER_UNKNOWN);
        assert_eq!(record.alter_egos(), [NO_ALTER_EGOS]);
        assert_eq!(record.aliases(), ["-"]);
        assert_eq!(record.place_of_birth(), PLACEHOLDER_UNKNOWN);
        assert_eq!(record.image_ref(), "https://example.test/sm/3.jpg");
    }

    #[test]
    fn occupation_is_split_into_tags() {
        let hero = ApiHero {
            work: ApiWork {
                occupation: "Reporter; Adventurer, Farmer".to_string(),
            },
            ..ApiHero::default()
        };
        let record = HeroRecord::from_api(hero);
        assert_eq!(record.occupation(), ["Reporter", "Adventurer", "Farmer"]);
        assert_eq!(record.primary_occupation(), "Reporter");
    }

    #[test]
    fn biography_without_publisher_parses() {
        let biography: ApiBiography =
            serde_json::from_str(r#"{ "fullName": "Nobody" }"#).expect("valid document");
        assert_eq!(biography.publisher, None);
    }

    #[test]
    fn builder_keeps_sequences_non_empty() {
        let record = HeroRecord::new(1, "Test")
            .with_occupation(Vec::<String>::new())
            .with_alter_egos(Vec::<String>::new());
        assert_eq!(record.occupation(), [PLACEHOLDER_UNKNOWN]);
        assert_eq!(record.alter_egos(), [NO_ALTER_EGOS]);
    }
}
