use super::{empty_svg, RenderConfig, Tile, FONT_STYLES};
use crate::apportion::apportion;
use crate::contributions::ContributionSummary;
use crate::languages::{percent, LanguageTotals};
use crate::svg::{css_class, escape, format_number};
use crate::theme::Theme;
use log::debug;

// Layout constants
const WIDTH: u32 = 600;
const HEIGHT: u32 = 280;
const HEIGHT_WITH_STATS: u32 = 355;
const BAR_WIDTH: u32 = 480;
const BAR_HEIGHT: u32 = 24;
const BAR_X: u32 = (WIDTH - BAR_WIDTH) / 2;
const BAR_Y: u32 = 85;
const LEGEND_GAP: u32 = 25;
const ROW_HEIGHT: u32 = 22;
const STATS_GAP: u32 = 20;
const BOX_WIDTH: u32 = 150;
const BOX_HEIGHT: u32 = 65;
const FOOTER_GAP: u32 = 15;
const FOOTER_MARGIN: u32 = 60;
const BOTTOM_PADDING: u32 = 55;

/// Language bar, legend and optional contribution statistics
pub struct Languages {
    pub languages: Vec<(String, u64)>,
    pub total_bytes: u64,
    pub contributions: Option<ContributionSummary>,
}

impl Languages {
    /// Take the `top` largest languages from the aggregated totals
    pub fn new(
        totals: &LanguageTotals,
        top: usize,
        contributions: Option<ContributionSummary>,
    ) -> Self {
        Self {
            languages: totals.top(top),
            total_bytes: totals.total(),
            contributions,
        }
    }

    /// Pixel width of each bar segment
    pub fn segment_widths(&self) -> Vec<u32> {
        let weights: Vec<u64> = self.languages.iter().map(|(_, bytes)| *bytes).collect();
        apportion(&weights, BAR_WIDTH)
    }

    fn styles(&self, theme: &Theme) -> String {
        let mut styles = format!(
            ".bg-primary {{ fill: {}; }}\n\
             .bg-secondary {{ fill: {}; }}\n\
             .fg-primary {{ fill: {}; }}\n\
             .fg-secondary {{ fill: {}; }}\n\
             .border {{ stroke: {}; }}\n\
             .stat-box {{ fill: {}; stroke: {}; stroke-width: 1; rx: 6; ry: 6; }}\n\
             {}\n",
            theme.bg_primary,
            theme.bg_secondary,
            theme.fg_primary,
            theme.fg_secondary,
            theme.border,
            theme.stat_box,
            theme.stat_box_border,
            FONT_STYLES
        );
        for (name, _) in &self.languages {
            styles.push_str(&format!(
                ".{} {{ fill: {}; }}\n",
                css_class(name),
                theme.language_color(name)
            ));
        }
        styles
    }

    fn bar(&self) -> String {
        let mut bar = String::from(
            r#"<g id="language-bar" clip-path="url(#barClip)" shape-rendering="crispEdges">"#,
        );
        let mut x = BAR_X;
        for ((name, _), width) in self.languages.iter().zip(self.segment_widths()) {
            if width == 0 {
                continue;
            }
            bar.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" class="{}"/>"#,
                x,
                BAR_Y,
                width,
                BAR_HEIGHT,
                css_class(name)
            ));
            x += width;
        }
        bar.push_str("</g>");
        bar
    }

    fn legend(&self, start_y: u32) -> String {
        let col_width = BAR_WIDTH / 2;
        let per_column = self.rows();
        let mut legend = String::new();

        for (i, (name, bytes)) in self.languages.iter().enumerate() {
            let col = i as u32 / per_column;
            let row = i as u32 % per_column;
            let x = BAR_X + col * col_width;
            let y = start_y + row * ROW_HEIGHT;
            legend.push_str(&format!(
                r#"
  <g transform="translate({}, {})">
    <circle cx="8" cy="-3" r="5" class="{}"/>
    <text x="24" y="0" class="fg-primary font-lang">{}</text>
    <text x="{}" y="0" class="fg-secondary font-percent" text-anchor="end">{:.2}%</text>
  </g>"#,
                x,
                y,
                css_class(name),
                escape(name),
                col_width - 4,
                percent(*bytes, self.total_bytes)
            ));
        }
        legend
    }

    /// Legend rows per column
    fn rows(&self) -> u32 {
        (self.languages.len() as u32).div_ceil(2).max(1)
    }

    fn stats(&self, summary: &ContributionSummary, y: u32, theme: &Theme) -> String {
        let spacing = (WIDTH - 3 * BOX_WIDTH) / 4;
        let boxes = [
            (
                format_number(summary.total_contributions),
                "TOTAL CONTRIBUTIONS",
                theme.fg_primary,
            ),
            (
                format!("{} DAYS", summary.streaks.current),
                "CURRENT STREAK",
                theme.accent,
            ),
            (
                format!("{} DAYS", summary.streaks.longest),
                "LONGEST STREAK",
                theme.fg_primary,
            ),
        ];

        let mut stats = String::new();
        let mut x = spacing;
        for (value, label, color) in boxes {
            let center = x + BOX_WIDTH / 2;
            stats.push_str(&format!(
                r#"
  <rect x="{x}" y="{y}" width="{BOX_WIDTH}" height="{BOX_HEIGHT}" class="stat-box"/>
  <text x="{center}" y="{}" text-anchor="middle" dominant-baseline="middle" fill="{color}" class="stat-value">{value}</text>
  <text x="{center}" y="{}" text-anchor="middle" dominant-baseline="middle" fill="{}" class="stat-label">{label}</text>"#,
                y + 25,
                y + 45,
                theme.fg_secondary,
            ));
            x += BOX_WIDTH + spacing;
        }
        stats
    }
}

impl Tile for Languages {
    fn name(&self) -> &'static str {
        "languages"
    }

    fn render(&self, config: &RenderConfig) -> String {
        debug!("Rendering languages tile");
        let theme = config.theme;

        if self.languages.is_empty() {
            return empty_svg("No Languages Found", theme);
        }

        let legend_y = BAR_Y + BAR_HEIGHT + LEGEND_GAP;
        let legend_end = legend_y + self.rows() * ROW_HEIGHT;

        let (stats, footer_y, min_height) = match &self.contributions {
            Some(summary) => {
                let stats_y = legend_end + STATS_GAP;
                (
                    self.stats(summary, stats_y, &theme),
                    stats_y + BOX_HEIGHT + FOOTER_GAP,
                    HEIGHT_WITH_STATS,
                )
            }
            None => (String::new(), legend_end + FOOTER_GAP, HEIGHT),
        };
        let height = min_height.max(footer_y + BOTTOM_PADDING);
        let center = WIDTH / 2;

        let profile = match config.username {
            Some(username) => format!(
                r#"
  <text x="{center}" y="{}" text-anchor="middle" class="fg-secondary font-footer">Based on repository analysis • github.com/{}</text>"#,
                footer_y + 18,
                escape(username)
            ),
            None => String::new(),
        };

        format!(
            r##"<svg width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <style>
{styles}
    </style>
    <clipPath id="barClip"><rect x="{BAR_X}" y="{BAR_Y}" width="{BAR_WIDTH}" height="{BAR_HEIGHT}" rx="4" ry="4"/></clipPath>
  </defs>
  <rect width="{WIDTH}" height="{height}" fill="{bg}" rx="12"/>
  <rect x="8" y="8" width="{inner_w}" height="{inner_h}" fill="none" stroke="{border}" stroke-width="2" rx="8"/>
  <text x="{center}" y="35" text-anchor="middle" fill="{fg}" class="font-title">
    <tspan x="{center}" dy="0">Most Used Languages</tspan>
    <tspan x="{center}" dy="1.2em">(Public and Private Repositories)</tspan>
  </text>
  {bar}
  <rect x="{BAR_X}" y="{BAR_Y}" width="{BAR_WIDTH}" height="{BAR_HEIGHT}" fill="{bg}" rx="4">
    <animate attributeName="width" from="{BAR_WIDTH}" to="0" dur="1.2s" fill="freeze"/>
  </rect>{legend}{stats}
  <line x1="{FOOTER_MARGIN}" y1="{footer_y}" x2="{footer_x2}" y2="{footer_y}" stroke="{border}" stroke-width="1"/>{profile}
  <text x="{center}" y="{credit_y}" text-anchor="middle" class="fg-secondary font-footer" opacity="0.7">{theme_name} Theme • Updated automatically</text>
</svg>
"##,
            styles = self.styles(&theme),
            bg = theme.bg_primary,
            inner_w = WIDTH - 16,
            inner_h = height - 16,
            border = theme.border,
            fg = theme.fg_primary,
            bar = self.bar(),
            legend = self.legend(legend_y),
            footer_x2 = WIDTH - FOOTER_MARGIN,
            credit_y = footer_y + 33,
            theme_name = theme.name,
        )
    }
}
