//! Gear sets: groups of four armor pieces in a color variant.
//!
//! A set definition names the base item of each slot, e.g. `ADP Core`.
//! Variants are discovered from the catalog: every `Torso` item whose name
//! starts with the core base name contributes the remainder of its name as a
//! variant (`ADP Core Black` -> `Black`). A variant's pieces are then looked
//! up as `"{base} {variant}"` for each slot.
//!
//! ## Definition File (sets.toml)
//!
//! ```toml
//! [[set]]
//! set_name = "ADP"
//! helmet = "ADP Helmet"
//! core = "ADP Core"
//! arms = "ADP Arms"
//! legs = "ADP Legs"
//! ```

use crate::error::{GearCrateError, Result};
use crate::types::CatalogItem;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Category of the items that define a set's color variants
pub const VARIANT_CATEGORY: &str = "Torso";

/// Variant name used when the core item carries no suffix
pub const BASE_VARIANT: &str = "Base";

/// Number of slots in a complete set
pub const SLOT_COUNT: usize = 4;

/// Equipment slot of a set piece, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Helmet,
    Core,
    Arms,
    Legs,
}

impl Slot {
    /// All slots in display order
    pub const ALL: [Slot; SLOT_COUNT] = [Slot::Helmet, Slot::Core, Slot::Arms, Slot::Legs];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Helmet => write!(f, "helmet"),
            Slot::Core => write!(f, "core"),
            Slot::Arms => write!(f, "arms"),
            Slot::Legs => write!(f, "legs"),
        }
    }
}

/// The base item names that make up one set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearSetDefinition {
    pub set_name: String,
    pub helmet: String,
    pub core: String,
    pub arms: String,
    pub legs: String,

    /// Remarks such as mismatching helmet names
    #[serde(default)]
    pub notes: String,
}

impl GearSetDefinition {
    /// Base item name for a slot
    pub fn base_name(&self, slot: Slot) -> &str {
        match slot {
            Slot::Helmet => &self.helmet,
            Slot::Core => &self.core,
            Slot::Arms => &self.arms,
            Slot::Legs => &self.legs,
        }
    }

    /// Full item name of a slot in the given variant
    pub fn piece_name(&self, slot: Slot, variant: &str) -> String {
        let base = self.base_name(slot);
        if variant.is_empty() {
            base.to_string()
        } else {
            format!("{} {}", base, variant)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DefinitionFile {
    #[serde(default, rename = "set")]
    sets: Vec<GearSetDefinition>,
}

/// The known set definitions, keyed and ordered by set name.
#[derive(Debug, Clone, Default)]
pub struct GearSetCatalog {
    definitions: BTreeMap<String, GearSetDefinition>,
}

impl GearSetCatalog {
    /// Build from a list of definitions
    pub fn new(definitions: impl IntoIterator<Item = GearSetDefinition>) -> Self {
        GearSetCatalog {
            definitions: definitions
                .into_iter()
                .map(|d| (d.set_name.clone(), d))
                .collect(),
        }
    }

    /// Load definitions from a TOML file; a missing file yields no sets.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Set definitions not found, no gear sets available");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let file: DefinitionFile =
            toml::from_str(&contents).map_err(|e| GearCrateError::DataFileInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!(path = %path.display(), sets = file.sets.len(), "Loaded set definitions");
        Ok(Self::new(file.sets))
    }

    /// Look up a definition
    pub fn get(&self, set_name: &str) -> Option<&GearSetDefinition> {
        self.definitions.get(set_name)
    }

    /// Set names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True if no sets are defined
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Variants of one set found in `items`
    pub fn variants(&self, set_name: &str, items: &[CatalogItem]) -> Result<Vec<String>> {
        let def = self.get(set_name).ok_or_else(|| GearCrateError::SetNotFound {
            set_name: set_name.to_string(),
        })?;
        Ok(variants(def, items))
    }

    /// Summary of every set and its variants
    pub fn summaries(&self, items: &[CatalogItem]) -> Vec<GearSetSummary> {
        self.definitions
            .values()
            .map(|def| {
                let variants = variants(def, items);
                GearSetSummary {
                    set_name: def.set_name.clone(),
                    variant_count: variants.len(),
                    variants,
                }
            })
            .collect()
    }

    /// Resolve the four pieces of one variant
    pub fn resolve(&self, set_name: &str, variant: &str, items: &[CatalogItem]) -> Result<SetVariant> {
        let def = self.get(set_name).ok_or_else(|| GearCrateError::SetNotFound {
            set_name: set_name.to_string(),
        })?;
        Ok(resolve(def, variant, items))
    }
}

/// Extract the variant from an item name given the slot's base name.
///
/// `ADP Core Black` with base `ADP Core` yields `Black`; an exact match
/// yields [`BASE_VARIANT`]; a name not starting with the base yields `None`.
pub fn extract_variant(item_name: &str, base: &str) -> Option<String> {
    let rest = item_name.strip_prefix(base)?.trim();
    if rest.is_empty() {
        Some(BASE_VARIANT.to_string())
    } else {
        Some(rest.to_string())
    }
}

/// Variants of a set, ordered by the name of their core item.
pub fn variants(def: &GearSetDefinition, items: &[CatalogItem]) -> Vec<String> {
    let mut cores: Vec<&CatalogItem> = items
        .iter()
        .filter(|i| i.category.as_deref() == Some(VARIANT_CATEGORY))
        .filter(|i| i.name.starts_with(def.core.as_str()))
        .collect();
    cores.sort_by(|a, b| a.name.cmp(&b.name));

    cores
        .into_iter()
        .filter_map(|i| extract_variant(&i.name, &def.core))
        .collect()
}

/// Look up the four pieces of `variant` in `items`.
///
/// For the [`BASE_VARIANT`] the suffixed name is tried first and the bare
/// base name second, since base cores may or may not carry the suffix.
pub fn resolve(def: &GearSetDefinition, variant: &str, items: &[CatalogItem]) -> SetVariant {
    let by_name: HashMap<&str, &CatalogItem> =
        items.iter().map(|i| (i.name.as_str(), i)).collect();

    let pieces = Slot::ALL
        .iter()
        .map(|&slot| {
            let mut found = by_name.get(def.piece_name(slot, variant).as_str()).copied();
            if found.is_none() && variant == BASE_VARIANT {
                found = by_name.get(def.base_name(slot)).copied();
            }
            let piece = match found {
                Some(item) => SetPiece::present(slot, item),
                None => SetPiece::missing(slot),
            };
            (slot, piece)
        })
        .collect();

    SetVariant::new(
        def.set_name.clone(),
        if variant.is_empty() { BASE_VARIANT } else { variant },
        pieces,
    )
}

/// Overview of one set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearSetSummary {
    pub set_name: String,
    pub variant_count: usize,
    pub variants: Vec<String>,
}

/// One slot of a set variant and its inventory status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPiece {
    /// Whether the piece exists in the catalog at all
    pub exists: bool,
    pub name: Option<String>,
    pub count: u32,
    pub owned: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, rename = "item_type")]
    pub category: Option<String>,
}

impl SetPiece {
    fn present(slot: Slot, item: &CatalogItem) -> Self {
        SetPiece {
            exists: true,
            name: Some(item.name.clone()),
            count: item.count,
            owned: item.is_owned(),
            image_url: item.image_url.clone(),
            category: item.category.clone().or_else(|| Some(slot.to_string())),
        }
    }

    fn missing(slot: Slot) -> Self {
        SetPiece {
            exists: false,
            name: None,
            count: 0,
            owned: false,
            image_url: None,
            category: Some(slot.to_string()),
        }
    }
}

/// A set in one color variant with its completion status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetVariant {
    pub set_name: String,
    pub variant: String,
    pub pieces: BTreeMap<Slot, SetPiece>,
    pub owned_count: usize,
    #[serde(default = "default_total")]
    pub total_count: usize,
}

fn default_total() -> usize {
    SLOT_COUNT
}

impl SetVariant {
    /// Assemble a variant and count its owned pieces
    pub fn new(
        set_name: impl Into<String>,
        variant: impl Into<String>,
        pieces: BTreeMap<Slot, SetPiece>,
    ) -> Self {
        let owned_count = pieces.values().filter(|p| p.owned).count();
        SetVariant {
            set_name: set_name.into(),
            variant: variant.into(),
            pieces,
            owned_count,
            total_count: SLOT_COUNT,
        }
    }

    /// Completion label such as `2/4`
    pub fn completion(&self) -> String {
        format!("{}/{}", self.owned_count, self.total_count)
    }

    /// True if every piece is owned
    pub fn is_complete(&self) -> bool {
        self.owned_count == self.total_count
    }

    /// Key under which this variant is stored in the favorites list
    pub fn favorite_key(&self) -> String {
        favorite_key(&self.set_name, &self.variant)
    }
}

/// Favorites key of a set variant
pub fn favorite_key(set_name: &str, variant: &str) -> String {
    format!("{}|||{}", set_name, variant)
}

/// Completion filter applied to a list of set variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionFilter {
    #[default]
    All,
    Favorites,
    None,
    One,
    Two,
    Three,
    Complete,
}

impl CompletionFilter {
    /// All filters in display order
    pub const ALL: [CompletionFilter; 7] = [
        CompletionFilter::All,
        CompletionFilter::Favorites,
        CompletionFilter::None,
        CompletionFilter::One,
        CompletionFilter::Two,
        CompletionFilter::Three,
        CompletionFilter::Complete,
    ];

    /// Whether a variant passes this filter
    pub fn matches(&self, variant: &SetVariant, favorites: &[String]) -> bool {
        match self {
            CompletionFilter::All => true,
            CompletionFilter::Favorites => favorites.contains(&variant.favorite_key()),
            CompletionFilter::None => variant.owned_count == 0,
            CompletionFilter::One => variant.owned_count == 1,
            CompletionFilter::Two => variant.owned_count == 2,
            CompletionFilter::Three => variant.owned_count == 3,
            CompletionFilter::Complete => variant.owned_count == SLOT_COUNT,
        }
    }

    /// Keep only the variants passing this filter
    pub fn apply<'a>(&self, variants: &'a [SetVariant], favorites: &[String]) -> Vec<&'a SetVariant> {
        variants
            .iter()
            .filter(|v| self.matches(v, favorites))
            .collect()
    }
}

impl fmt::Display for CompletionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CompletionFilter::All => "all",
            CompletionFilter::Favorites => "favorites",
            CompletionFilter::None => "none",
            CompletionFilter::One => "1",
            CompletionFilter::Two => "2",
            CompletionFilter::Three => "3",
            CompletionFilter::Complete => "all-parts",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for CompletionFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(CompletionFilter::All),
            "favorites" | "fav" => Ok(CompletionFilter::Favorites),
            "none" | "0" => Ok(CompletionFilter::None),
            "one" | "1" => Ok(CompletionFilter::One),
            "two" | "2" => Ok(CompletionFilter::Two),
            "three" | "3" => Ok(CompletionFilter::Three),
            "complete" | "all-parts" | "4" => Ok(CompletionFilter::Complete),
            _ => Err(format!("Unknown completion filter: {}", s)),
        }
    }
}

/// Number of variants per completion filter, shown next to filter buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub favorites: usize,
    pub none: usize,
    pub one: usize,
    pub two: usize,
    pub three: usize,
    pub complete: usize,
}

impl FilterCounts {
    /// Tally a list of variants
    pub fn tally(variants: &[SetVariant], favorites: &[String]) -> Self {
        let mut counts = FilterCounts {
            all: variants.len(),
            ..Default::default()
        };
        for v in variants {
            match v.owned_count {
                0 => counts.none += 1,
                1 => counts.one += 1,
                2 => counts.two += 1,
                3 => counts.three += 1,
                _ => counts.complete += 1,
            }
            if favorites.contains(&v.favorite_key()) {
                counts.favorites += 1;
            }
        }
        counts
    }

    /// Count for one filter
    pub fn get(&self, filter: CompletionFilter) -> usize {
        match filter {
            CompletionFilter::All => self.all,
            CompletionFilter::Favorites => self.favorites,
            CompletionFilter::None => self.none,
            CompletionFilter::One => self.one,
            CompletionFilter::Two => self.two,
            CompletionFilter::Three => self.three,
            CompletionFilter::Complete => self.complete,
        }
    }
}
