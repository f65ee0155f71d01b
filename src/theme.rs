#[derive(Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub bg_primary: &'static str,
    pub bg_secondary: &'static str,
    pub fg_primary: &'static str,
    pub fg_secondary: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub stat_box: &'static str,
    pub stat_box_border: &'static str,
    languages: &'static [(&'static str, &'static str)],
}

impl Theme {
    /// Color for a language, falling back to the accent color
    pub fn language_color(&self, language: &str) -> &'static str {
        self.languages
            .iter()
            .find(|(name, _)| *name == language)
            .map(|(_, color)| *color)
            .unwrap_or(self.accent)
    }
}

pub const KANAGAWA: Theme = Theme {
    name: "Kanagawa",
    bg_primary: "#1f1f28",
    bg_secondary: "#16161d",
    fg_primary: "#dcd7ba",
    fg_secondary: "#727169",
    border: "#2a2a37",
    accent: "#e6c384",
    stat_box: "#2a2a37",
    stat_box_border: "#3a3a47",
    languages: KANAGAWA_LANGUAGES,
};

// Muted variants of each language's usual brand color
const KANAGAWA_LANGUAGES: &[(&str, &str)] = &[
    ("Python", "#ffa066"),
    ("JavaScript", "#c0a36e"),
    ("TypeScript", "#7e9cd8"),
    ("Java", "#d27e99"),
    ("C", "#938aa9"),
    ("C++", "#938aa9"),
    ("C#", "#957fb8"),
    ("Go", "#7fb4ca"),
    ("Rust", "#c8826b"),
    ("Ruby", "#c34043"),
    ("PHP", "#938aa9"),
    ("Swift", "#d27e99"),
    ("Kotlin", "#957fb8"),
    ("Shell", "#98bb6c"),
    ("Dart", "#7fb4ca"),
    ("Scala", "#c8826b"),
    ("R", "#7e9cd8"),
    ("Perl", "#938aa9"),
    ("Haskell", "#957fb8"),
    ("Lua", "#7e9cd8"),
    ("Elixir", "#957fb8"),
    ("Clojure", "#98bb6c"),
    ("OCaml", "#c8826b"),
    ("Vim script", "#98bb6c"),
    ("Makefile", "#c8826b"),
    ("HTML", "#d27e99"),
    ("CSS", "#7e9cd8"),
    ("SCSS", "#d27e99"),
    ("Vue", "#98bb6c"),
    ("Svelte", "#d27e99"),
    ("Objective-C", "#7fb4ca"),
    ("Assembly", "#727169"),
    ("Dockerfile", "#7fb4ca"),
    ("YAML", "#c0a36e"),
    ("JSON", "#c0a36e"),
    ("Markdown", "#727169"),
    ("TeX", "#98bb6c"),
    ("SQL", "#7e9cd8"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_uses_palette() {
        assert_eq!(KANAGAWA.language_color("Rust"), "#c8826b");
        assert_eq!(KANAGAWA.language_color("C#"), "#957fb8");
    }

    #[test]
    fn unknown_language_uses_accent() {
        assert_eq!(KANAGAWA.language_color("Zig"), KANAGAWA.accent);
        assert_eq!(KANAGAWA.language_color("rust"), KANAGAWA.accent);
    }
}
