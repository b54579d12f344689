//! Subcommand implementations.

pub mod clear;
pub mod init;
pub mod inventory;
pub mod item;
pub mod prefs;
pub mod search;
pub mod sets;
pub mod stats;

use gearcrate_core::CatalogItem;
use std::io::{self, Write};

/// Ask a yes/no question on stdin; anything but `y` means no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("j")
}

/// One-line rendering of an item: `★ ADP Core Black [Torso] 2x`
pub fn item_line(item: &CatalogItem, times: &str) -> String {
    let star = if item.is_favorite { "★" } else { " " };
    let mut line = format!("{} {}", star, item.name);
    if let Some(ref category) = item.category {
        line.push_str(&format!(" [{}]", category));
    }
    line.push_str(&format!(" {}{}", item.count, times));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_line() {
        let item = CatalogItem::new("ADP Core Black", 2)
            .with_category("Torso")
            .with_favorite(true);
        assert_eq!(item_line(&item, "x"), "★ ADP Core Black [Torso] 2x");
        assert_eq!(item_line(&CatalogItem::new("Rifle", 0), "x"), "  Rifle 0x");
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" J "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("yes please"));
    }
}
