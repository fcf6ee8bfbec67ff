// Language chips for repository cards
use crate::models::LanguageBadge;

pub const UNKNOWN_COLOR: &str = "#586069";
pub const UNKNOWN_SYMBOL: &str = "?";

/// (name, symbol, colour). Colours follow GitHub's linguist palette.
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("JavaScript", "JS", "#f1e05a"),
    ("TypeScript", "TS", "#2b7489"),
    ("Python", "PY", "#3572A5"),
    ("Java", "JV", "#b07219"),
    ("C++", "C++", "#f34b7d"),
    ("C#", "C#", "#239120"),
    ("C", "C", "#555555"),
    ("PHP", "PHP", "#4F5D95"),
    ("Ruby", "RB", "#701516"),
    ("Go", "GO", "#00ADD8"),
    ("Rust", "RS", "#dea584"),
    ("Swift", "SW", "#ffac45"),
    ("Kotlin", "KT", "#F18E33"),
    ("Dart", "DT", "#00B4AB"),
    ("Scala", "SC", "#c22d40"),
    ("Objective-C", "OC", "#438eff"),
    ("R", "R", "#198CE7"),
    ("Perl", "PL", "#0298c3"),
    ("Haskell", "HS", "#5e5086"),
    ("Elixir", "EX", "#6e4a7e"),
    ("Clojure", "CJ", "#db5855"),
    ("Lua", "LUA", "#000080"),
    ("Julia", "JL", "#a270ba"),
    ("PowerShell", "PS", "#012456"),
    ("Shell", "SH", "#89e051"),
    ("HTML", "HTML", "#e34c26"),
    ("CSS", "CSS", "#563d7c"),
    ("SCSS", "SCSS", "#c6538c"),
    ("Less", "LESS", "#1d365d"),
    ("Vue", "VUE", "#4FC08D"),
    ("Svelte", "SV", "#ff3e00"),
    ("Makefile", "MK", "#427819"),
    ("CMake", "CM", "#da3434"),
    ("Dockerfile", "DOC", "#384d54"),
    ("Markdown", "MD", "#083fa1"),
    ("TOML", "TOML", "#9c4221"),
];

fn lookup(language: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    LANGUAGES.iter().find(|(name, _, _)| *name == language)
}

pub fn symbol(language: &str) -> &'static str {
    lookup(language).map(|l| l.1).unwrap_or(UNKNOWN_SYMBOL)
}

pub fn color(language: &str) -> &'static str {
    lookup(language).map(|l| l.2).unwrap_or(UNKNOWN_COLOR)
}

/// Turn a name -> bytes breakdown into chips, biggest share first
pub fn badges<'a, I>(breakdown: I) -> Vec<LanguageBadge>
where
    I: IntoIterator<Item = (&'a String, &'a u64)>,
{
    let mut entries: Vec<(&String, u64)> = breakdown.into_iter().map(|(n, b)| (n, *b)).collect();
    let total = entries
        .iter()
        .fold(0u64, |acc, (_, bytes)| acc.saturating_add(*bytes));
    if total == 0 {
        return Vec::new();
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1));

    entries
        .into_iter()
        .map(|(name, bytes)| LanguageBadge {
            name: name.clone(),
            symbol: symbol(name).to_string(),
            color: color(name).to_string(),
            percent: ((bytes as f64 / total as f64) * 100.0).round() as u8,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_badges_sorted_by_bytes() {
        let breakdown: BTreeMap<String, u64> = [
            ("CSS".to_string(), 800),
            ("JavaScript".to_string(), 9000),
            ("HTML".to_string(), 200),
        ]
        .into_iter()
        .collect();

        let chips = badges(&breakdown);
        let names: Vec<&str> = chips.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["JavaScript", "CSS", "HTML"]);

        assert_eq!(chips[0].symbol, "JS");
        assert_eq!(chips[0].percent, 90);
        assert_eq!(chips[1].percent, 8);
        assert_eq!(chips[2].percent, 2);
        assert_eq!(chips[2].title(), "HTML");
    }

    #[test]
    fn test_unknown_language_gets_fallbacks() {
        assert_eq!(symbol("Brainfuck"), UNKNOWN_SYMBOL);
        assert_eq!(color("Brainfuck"), UNKNOWN_COLOR);
        assert_eq!(color("Rust"), "#dea584");
    }

    #[test]
    fn test_empty_breakdown_has_no_badges() {
        let breakdown: BTreeMap<String, u64> = BTreeMap::new();
        assert!(badges(&breakdown).is_empty());

        let zeros: BTreeMap<String, u64> = [("Rust".to_string(), 0)].into_iter().collect();
        assert!(badges(&zeros).is_empty());
    }

    #[test]
    fn test_huge_byte_counts_do_not_overflow() {
        let breakdown: BTreeMap<String, u64> = [
            ("Rust".to_string(), u64::MAX),
            ("Shell".to_string(), 1),
        ]
        .into_iter()
        .collect();

        let chips = badges(&breakdown);
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].name, "Rust");
        assert_eq!(chips[0].percent, 100);
        assert_eq!(chips[1].percent, 0);
    }
}
