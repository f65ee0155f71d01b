mod languages;

pub use languages::Languages;

use crate::svg::escape;
use crate::theme::Theme;

/// Configuration for rendering a tile
pub struct RenderConfig<'a> {
    pub username: Option<&'a str>,
    pub theme: Theme,
}

impl<'a> RenderConfig<'a> {
    pub fn new(username: Option<&'a str>, theme: Theme) -> Self {
        Self { username, theme }
    }
}

/// Trait for generating SVG tiles
pub trait Tile {
    /// The base name of the tile (e.g., "languages")
    fn name(&self) -> &'static str;

    /// Render the tile as an SVG string
    fn render(&self, config: &RenderConfig) -> String;

    /// File the tile is written to
    fn filename(&self) -> String {
        format!("{}.svg", self.name())
    }
}

/// Generate an empty placeholder SVG
pub fn empty_svg(message: &str, theme: Theme) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="100" viewBox="0 0 600 100">
  <style>{}</style>
  <rect width="600" height="100" rx="12" fill="{}"/>
  <text x="300" y="55" fill="{}" class="font-lang" text-anchor="middle">{}</text>
</svg>"#,
        FONT_STYLES,
        theme.bg_primary,
        theme.fg_primary,
        escape(message)
    )
}

/// Font classes shared by the tiles
pub const FONT_STYLES: &str = "\
.font-title { font-family: 'Courier New', monospace; font-size: 18px; font-weight: bold; }
.font-lang { font-family: 'Courier New', monospace; font-size: 13px; }
.font-percent { font-family: 'Courier New', monospace; font-size: 12px; }
.font-footer { font-family: 'Courier New', monospace; font-size: 10px; }
.stat-value { font-family: 'Courier New', monospace; font-size: 16px; font-weight: bold; }
.stat-label { font-family: 'Courier New', monospace; font-size: 10px; }";
