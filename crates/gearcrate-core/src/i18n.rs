//! User-facing strings in German, English, French and Spanish.
//!
//! Strings are looked up by key and may contain `{placeholder}` markers that
//! [`Translator::t`] fills in. A key missing from the current language falls
//! back to English, and finally to the key itself.

use crate::error::{GearCrateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    #[default]
    En,
    Fr,
    Es,
}

impl Language {
    /// All languages in picker order
    pub const ALL: [Language; 4] = [Language::De, Language::En, Language::Fr, Language::Es];

    /// Two-letter code
    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }

    /// Name of the language in that language
    pub fn native_name(&self) -> &'static str {
        lookup(*self, "languageName").unwrap_or("English")
    }

    /// Pick a language from a saved preference and a locale string.
    ///
    /// The saved value wins if supported; otherwise the primary subtag of the
    /// locale (`de_DE.UTF-8`, `es-MX`) is tried; English is the fallback.
    pub fn detect(saved: Option<&str>, locale: Option<&str>) -> Language {
        if let Some(lang) = saved.and_then(|s| s.parse().ok()) {
            return lang;
        }

        locale
            .and_then(|l| l.split(['-', '_', '.']).next())
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = GearCrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "de" => Ok(Language::De),
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "es" => Ok(Language::Es),
            _ => Err(GearCrateError::UnsupportedLanguage { code: s.to_string() }),
        }
    }
}

/// Translates keys for one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    /// Create a translator for `language`
    pub fn new(language: Language) -> Self {
        Translator { language }
    }

    /// Current language
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Translate a key without parameters.
    pub fn tr(&self, key: &str) -> String {
        self.t(key, &[])
    }

    /// Translate a key and fill in `{name}` style placeholders.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = match lookup(self.language, key) {
            Some(text) => text,
            None => {
                warn!(key, language = %self.language, "Translation key not found");
                match lookup(Language::En, key) {
                    Some(text) => text,
                    None => return key.to_string(),
                }
            }
        };

        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value)
            })
    }
}

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::De => DE,
        Language::En => EN,
        Language::Fr => FR,
        Language::Es => ES,
    }
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    table(language)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

static EN: &[(&str, &str)] = &[
    ("appTitle", "GearCrate"),
    ("search", "Search"),
    ("inventory", "Inventory"),
    ("gearSets", "Gear Sets"),
    ("stats", "Statistics"),
    ("searchLimit", "Show results:"),
    ("searchLimitReset", "Search result limit reset to 25"),
    ("searchLimitSet", "Search result limit set to {limit}"),
    ("searchShowingResults", "Showing {shown} of {total} results"),
    ("searchNoResults", "No results found"),
    ("searchError", "Search error"),
    ("searchTooShort", "Type at least 2 characters"),
    ("inventoryEmpty", "Inventory is empty"),
    ("inventoryCategoryEmpty", "No items in category \"{category}\""),
    ("inventoryLoadError", "Error loading inventory"),
    ("categoryAll", "All"),
    ("categoryFavorites", "Favorites"),
    ("favoriteItem", "Add to favorites"),
    ("unfavoriteItem", "Remove from favorites"),
    ("sortBy", "Sort by:"),
    ("sortName", "Name"),
    ("sortCount", "Count"),
    ("sortDate", "Date"),
    ("sortAscending", "Ascending"),
    ("sortDescending", "Descending"),
    ("modalCount", "Count:"),
    ("modalNotes", "Notes:"),
    ("modalConfirmDelete", "Really delete {name}?"),
    ("statsTitle", "Statistics"),
    ("statsTotalInDb", "Items in database:"),
    ("statsInInventory", "Items in inventory:"),
    ("statsTotalCount", "Total count:"),
    ("statsCacheSize", "Cache size:"),
    ("statsByCategory", "By Category"),
    ("confirmClearInventory", "Really set all counts to 0?"),
    ("clearInventoryAborted", "Aborted. Inventory was NOT cleared."),
    ("clearInventorySuccess", "Inventory was cleared! All item counts were set to 0."),
    ("itemAdded", "{name} was added!"),
    ("itemDeleted", "{name} was deleted!"),
    ("countUpdated", "{name}: {count}x"),
    ("notesSaved", "Notes saved for {name}"),
    ("errorAdding", "Error adding item"),
    ("errorDeleting", "Error deleting item"),
    ("errorUpdating", "Error updating count"),
    ("errorGeneric", "Error: {message}"),
    ("itemNotFound", "Item not found: {name}"),
    ("setsNone", "No sets found."),
    ("setsNoneForFilter", "No sets found for this filter."),
    ("times", "x"),
    ("language", "Language:"),
    ("languageName", "English"),
];

static DE: &[(&str, &str)] = &[
    ("appTitle", "GearCrate"),
    ("search", "Suche"),
    ("inventory", "Inventar"),
    ("gearSets", "Gear Sets"),
    ("stats", "Statistiken"),
    ("searchLimit", "Ergebnisse zeigen:"),
    ("searchLimitReset", "Suchergebnis-Limit auf 25 zurückgesetzt"),
    ("searchLimitSet", "Suchergebnis-Limit auf {limit} gesetzt"),
    ("searchShowingResults", "Zeige {shown} von {total} Ergebnissen"),
    ("searchNoResults", "Keine Ergebnisse gefunden"),
    ("searchError", "Fehler bei der Suche"),
    ("searchTooShort", "Mindestens 2 Zeichen eingeben"),
    ("inventoryEmpty", "Inventar ist leer"),
    ("inventoryCategoryEmpty", "Keine Items in Kategorie \"{category}\""),
    ("inventoryLoadError", "Fehler beim Laden des Inventars"),
    ("categoryAll", "Alle"),
    ("categoryFavorites", "Favoriten"),
    ("favoriteItem", "Zu Favoriten hinzufügen"),
    ("unfavoriteItem", "Aus Favoriten entfernen"),
    ("sortBy", "Sortieren nach:"),
    ("sortName", "Name"),
    ("sortCount", "Anzahl"),
    ("sortDate", "Datum"),
    ("sortAscending", "Aufsteigend"),
    ("sortDescending", "Absteigend"),
    ("modalCount", "Anzahl:"),
    ("modalNotes", "Notizen:"),
    ("modalConfirmDelete", "{name} wirklich löschen?"),
    ("statsTitle", "Statistiken"),
    ("statsTotalInDb", "Items in Datenbank:"),
    ("statsInInventory", "Items im Inventar:"),
    ("statsTotalCount", "Gesamtanzahl:"),
    ("statsCacheSize", "Cache-Größe:"),
    ("statsByCategory", "Nach Kategorien"),
    ("confirmClearInventory", "Wirklich alle Counts auf 0 setzen?"),
    ("clearInventoryAborted", "Abgebrochen. Das Inventar wurde NICHT geleert."),
    ("clearInventorySuccess", "Inventar wurde geleert! Alle Item-Counts wurden auf 0 gesetzt."),
    ("itemAdded", "{name} wurde hinzugefügt!"),
    ("itemDeleted", "{name} wurde gelöscht!"),
    ("countUpdated", "{name}: {count}x"),
    ("notesSaved", "Notizen für {name} gespeichert"),
    ("errorAdding", "Fehler beim Hinzufügen"),
    ("errorDeleting", "Fehler beim Löschen"),
    ("errorUpdating", "Fehler beim Aktualisieren der Anzahl"),
    ("errorGeneric", "Fehler: {message}"),
    ("itemNotFound", "Item nicht gefunden: {name}"),
    ("setsNone", "Keine Sets gefunden."),
    ("setsNoneForFilter", "Keine Sets mit diesem Filter gefunden."),
    ("times", "x"),
    ("language", "Sprache:"),
    ("languageName", "Deutsch"),
];

static FR: &[(&str, &str)] = &[
    ("appTitle", "GearCrate"),
    ("search", "Recherche"),
    ("inventory", "Inventaire"),
    ("gearSets", "Ensembles d'équipement"),
    ("stats", "Statistiques"),
    ("searchLimit", "Afficher les résultats:"),
    ("searchLimitReset", "Limite de résultats de recherche réinitialisée à 25"),
    ("searchShowingResults", "Affichage de {shown} sur {total} résultats"),
    ("searchNoResults", "Aucun résultat trouvé"),
    ("searchError", "Erreur de recherche"),
    ("inventoryEmpty", "L'inventaire est vide"),
    ("inventoryCategoryEmpty", "Aucun objet dans la catégorie \"{category}\""),
    ("inventoryLoadError", "Erreur de chargement de l'inventaire"),
    ("categoryAll", "Tous"),
    ("categoryFavorites", "Favoris"),
    ("sortBy", "Trier par:"),
    ("sortName", "Nom"),
    ("sortCount", "Quantité"),
    ("sortDate", "Date"),
    ("sortAscending", "Croissant"),
    ("sortDescending", "Décroissant"),
    ("modalCount", "Quantité:"),
    ("modalNotes", "Notes:"),
    ("modalConfirmDelete", "Vraiment supprimer {name}?"),
    ("statsTitle", "Statistiques"),
    ("statsTotalInDb", "Objets dans la base de données:"),
    ("statsInInventory", "Objets dans l'inventaire:"),
    ("statsTotalCount", "Quantité totale:"),
    ("statsCacheSize", "Taille du cache:"),
    ("statsByCategory", "Par catégorie"),
    ("confirmClearInventory", "Vraiment mettre tous les compteurs à 0?"),
    ("clearInventoryAborted", "Annulé. L'inventaire n'a PAS été vidé."),
    ("clearInventorySuccess", "L'inventaire a été vidé! Tous les compteurs d'objets ont été mis à 0."),
    ("itemAdded", "{name} a été ajouté!"),
    ("itemDeleted", "{name} a été supprimé!"),
    ("errorAdding", "Erreur lors de l'ajout"),
    ("errorDeleting", "Erreur lors de la suppression"),
    ("errorUpdating", "Erreur lors de la mise à jour de la quantité"),
    ("errorGeneric", "Erreur: {message}"),
    ("times", "x"),
    ("language", "Langue:"),
    ("languageName", "Français"),
];

static ES: &[(&str, &str)] = &[
    ("appTitle", "GearCrate"),
    ("search", "Búsqueda"),
    ("inventory", "Inventario"),
    ("gearSets", "Conjuntos de equipo"),
    ("stats", "Estadísticas"),
    ("searchLimit", "Mostrar resultados:"),
    ("searchLimitReset", "Límite de resultados restablecido a 25"),
    ("searchShowingResults", "Mostrando {shown} de {total} resultados"),
    ("searchNoResults", "No se encontraron resultados"),
    ("searchError", "Error de búsqueda"),
    ("inventoryEmpty", "El inventario está vacío"),
    ("inventoryCategoryEmpty", "No hay objetos en la categoría \"{category}\""),
    ("inventoryLoadError", "Error al cargar el inventario"),
    ("categoryAll", "Todos"),
    ("categoryFavorites", "Favoritos"),
    ("sortBy", "Ordenar por:"),
    ("sortName", "Nombre"),
    ("sortCount", "Cantidad"),
    ("sortDate", "Fecha"),
    ("sortAscending", "Ascendente"),
    ("sortDescending", "Descendente"),
    ("modalCount", "Cantidad:"),
    ("modalNotes", "Notas:"),
    ("modalConfirmDelete", "¿Realmente eliminar {name}?"),
    ("statsTitle", "Estadísticas"),
    ("statsTotalInDb", "Objetos en la base de datos:"),
    ("statsInInventory", "Objetos en el inventario:"),
    ("statsTotalCount", "Cantidad total:"),
    ("statsCacheSize", "Tamaño del caché:"),
    ("statsByCategory", "Por categoría"),
    ("confirmClearInventory", "¿Realmente establecer todos los contadores a 0?"),
    ("clearInventoryAborted", "Cancelado. El inventario NO fue vaciado."),
    ("clearInventorySuccess", "¡El inventario fue vaciado! Todos los contadores de objetos fueron establecidos a 0."),
    ("itemAdded", "¡{name} fue añadido!"),
    ("itemDeleted", "¡{name} fue eliminado!"),
    ("errorAdding", "Error al añadir"),
    ("errorDeleting", "Error al eliminar"),
    ("errorUpdating", "Error al actualizar la cantidad"),
    ("errorGeneric", "Error: {message}"),
    ("times", "x"),
    ("language", "Idioma:"),
    ("languageName", "Español"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(Language::detect(Some("fr"), Some("de_DE.UTF-8")), Language::Fr);
        assert_eq!(Language::detect(None, Some("de_DE.UTF-8")), Language::De);
        assert_eq!(Language::detect(None, Some("es-MX")), Language::Es);
        assert_eq!(Language::detect(Some("xx"), Some("ja_JP")), Language::En);
        assert_eq!(Language::detect(None, None), Language::En);
    }

    #[test]
    fn test_placeholders() {
        let t = Translator::new(Language::De);
        assert_eq!(
            t.t("searchShowingResults", &[("shown", "25"), ("total", "40")]),
            "Zeige 25 von 40 Ergebnissen"
        );
    }

    #[test]
    fn test_fallbacks() {
        let t = Translator::new(Language::Fr);
        // Present only in the English table
        assert_eq!(t.tr("searchTooShort"), "Type at least 2 characters");
        assert_eq!(t.tr("noSuchKey"), "noSuchKey");
    }

    #[test]
    fn test_every_language_has_core_keys() {
        for lang in Language::ALL {
            for key in ["searchShowingResults", "searchNoResults", "inventoryEmpty", "languageName"] {
                assert!(lookup(lang, key).is_some(), "{} missing {}", lang, key);
            }
        }
        assert_eq!(Language::Es.native_name(), "Español");
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(" DE ".parse::<Language>().unwrap(), Language::De);
        assert!("jp".parse::<Language>().is_err());
    }
}
