//! Retained-mode SVG render surface.
//!
//! [`SvgSurface`] keeps the current scene keyed by [`EntityKey`], applies
//! [`RenderFrame`]s to it, and serializes the scene to a standalone SVG
//! document. Light and dark mode are handled via CSS media queries.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::chart::domain::Domains;
use crate::chart::entity::{EntityKey, RenderEntity};
use crate::chart::scale::Scales;
use crate::chart::surface::{RenderFrame, RenderSurface, Tooltip};
use crate::config::ChartConfig;

const STYLE: &str = r#"<style>
  :root {
    --bg-color: #ffffff;
    --text-color: #1a1a1a;
    --grid-color: #e0e0e0;
    --axis-color: #333333;
    --tooltip-bg: #ffffff;
    --tooltip-border: #cccccc;
  }
  @media (prefers-color-scheme: dark) {
    :root {
      --bg-color: #1a1a1a;
      --text-color: #e0e0e0;
      --grid-color: #404040;
      --axis-color: #b0b0b0;
      --tooltip-bg: #2a2a2a;
      --tooltip-border: #505050;
    }
  }
  .background { fill: var(--bg-color); }
  .title { font: bold 16px system-ui, sans-serif; fill: var(--text-color); }
  .label { font: 12px system-ui, sans-serif; fill: var(--text-color); }
  .tick-label { font: 10px system-ui, sans-serif; fill: var(--text-color); }
  .legend { font: 12px system-ui, sans-serif; fill: var(--text-color); }
  .grid { stroke: var(--grid-color); stroke-width: 1; }
  .axis { stroke: var(--axis-color); stroke-width: 1; }
  .tooltip-bg { fill: var(--tooltip-bg); stroke: var(--tooltip-border); }
  .tooltip { font: 11px system-ui, sans-serif; fill: var(--text-color); }
</style>
"#;

/// Counts of instructions applied by the last frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Entities created.
    pub entered: usize,
    /// Entities replaced.
    pub updated: usize,
    /// Entities removed.
    pub exited: usize,
}

/// SVG render surface.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    config: ChartConfig,
    scene: BTreeMap<EntityKey, RenderEntity>,
    domains: Option<Domains>,
    tooltip: Option<Tooltip>,
    last_apply: ApplyStats,
}

impl SvgSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            scene: BTreeMap::new(),
            domains: None,
            tooltip: None,
            last_apply: ApplyStats::default(),
        }
    }

    /// Entities currently in the scene.
    #[must_use]
    pub fn scene(&self) -> &BTreeMap<EntityKey, RenderEntity> {
        &self.scene
    }

    /// What the last applied frame did.
    #[must_use]
    pub fn last_apply(&self) -> ApplyStats {
        self.last_apply
    }

    /// Current tooltip, if any.
    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Serialize the scene.
    ///
    /// Returns an empty document body (axes only) before the first frame.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let config = &self.config;
        let m = config.margins;
        let mut svg = String::with_capacity(8192 + self.scene.len() * 96);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = config.width,
            h = config.height
        );
        svg.push_str(STYLE);
        let _ = writeln!(
            svg,
            r#"<rect class="background" width="{}" height="{}"/>"#,
            config.width, config.height
        );

        if !config.title.is_empty() {
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="18" text-anchor="middle" class="title">{}</text>"#,
                f64::from(config.width) / 2.0,
                escape_xml(&config.title)
            );
        }

        let _ = writeln!(svg, r#"<g transform="translate({},{})">"#, m.left, m.top);

        if let Some(domains) = &self.domains {
            self.write_axes(&mut svg, &Scales::new(domains, config), domains.years.is_some());
        }
        self.write_axis_labels(&mut svg);

        svg.push_str("<g class=\"lines\">\n");
        for entity in self.scene.values() {
            if let RenderEntity::Line(line) = entity {
                let mut path = String::new();
                for (i, (x, y)) in line.path.iter().enumerate() {
                    let prefix = if i == 0 { "M" } else { " L" };
                    let _ = write!(path, "{} {:.2},{:.2}", prefix, x, y);
                }
                let _ = writeln!(
                    svg,
                    r#"<path class="series" data-genre="{}" d="{}" stroke="{}" stroke-width="{}" fill="none"/>"#,
                    escape_xml(&line.genre),
                    path,
                    line.color,
                    config.stroke_width
                );
            }
        }
        svg.push_str("</g>\n<g class=\"dots\">\n");
        for entity in self.scene.values() {
            if let RenderEntity::Point(p) = entity {
                let _ = writeln!(
                    svg,
                    r#"<circle class="dot" data-genre="{}" data-year="{}" cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
                    escape_xml(&p.genre),
                    p.year,
                    p.x,
                    p.y,
                    config.point_radius,
                    p.color
                );
            }
        }
        svg.push_str("</g>\n");

        self.write_legend(&mut svg);

        if let Some(tooltip) = &self.tooltip {
            self.write_tooltip(&mut svg, tooltip);
        }

        svg.push_str("</g>\n</svg>\n");
        svg
    }

    fn write_axes(&self, svg: &mut String, scales: &Scales, has_years: bool) {
        let plot_w = self.config.plot_width();
        let plot_h = self.config.plot_height();

        for value in scales.y.ticks(self.config.value_ticks) {
            let y = scales.y.map(value);
            let _ = writeln!(
                svg,
                r#"<line x1="0" y1="{y:.2}" x2="{plot_w}" y2="{y:.2}" class="grid"/>"#
            );
            let _ = writeln!(
                svg,
                r#"<text x="-8" y="{:.2}" text-anchor="end" class="tick-label">{}</text>"#,
                y + 3.0,
                format_value_tick(value)
            );
        }

        let year_ticks = if has_years {
            scales.year_ticks((plot_w / 80.0).max(2.0) as usize)
        } else {
            Vec::new()
        };
        for year in year_ticks {
            let x = scales.x.map(f64::from(year));
            let _ = writeln!(
                svg,
                r#"<text x="{:.2}" y="{}" text-anchor="middle" class="tick-label">{}</text>"#,
                x,
                plot_h + 16.0,
                year
            );
        }

        let _ = writeln!(
            svg,
            r#"<line x1="0" y1="{plot_h}" x2="{plot_w}" y2="{plot_h}" class="axis"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<line x1="0" y1="0" x2="0" y2="{plot_h}" class="axis"/>"#
        );
    }

    fn write_axis_labels(&self, svg: &mut String) {
        let plot_w = self.config.plot_width();
        let plot_h = self.config.plot_height();
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" class="label">{}</text>"#,
            plot_w / 2.0,
            plot_h + 36.0,
            escape_xml(&self.config.x_label)
        );
        let _ = writeln!(
            svg,
            r#"<text transform="rotate(-90)" x="{}" y="-44" text-anchor="middle" class="label">{}</text>"#,
            -plot_h / 2.0,
            escape_xml(&self.config.y_label)
        );
    }

    fn write_legend(&self, svg: &mut String) {
        let config = &self.config;
        let _ = writeln!(
            svg,
            r#"<g class="legend-layer" transform="translate({},6)">"#,
            config.plot_width() + 16.0
        );
        for entity in self.scene.values() {
            if let RenderEntity::LegendItem(item) = entity {
                let _ = writeln!(
                    svg,
                    r#"<g class="item" data-genre="{}" transform="translate(0,{})">"#,
                    escape_xml(&item.genre),
                    item.slot as f64 * config.legend_row_height
                );
                let _ = writeln!(
                    svg,
                    r#"<rect x="0" y="{}" width="{s}" height="{s}" rx="2" fill="{}" fill-opacity="{}"/>"#,
                    -(config.legend_swatch * 0.75),
                    item.color,
                    item.opacity,
                    s = config.legend_swatch
                );
                let _ = writeln!(
                    svg,
                    r#"<text x="{}" y="0" dominant-baseline="middle" class="legend">{}</text>"#,
                    config.legend_swatch + 6.0,
                    escape_xml(&item.genre)
                );
                svg.push_str("</g>\n");
            }
        }
        svg.push_str("</g>\n");
    }

    fn write_tooltip(&self, svg: &mut String, tooltip: &Tooltip) {
        let (x, y) = (tooltip.anchor.0 + 12.0, tooltip.anchor.1 + 12.0);
        let longest = tooltip.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let _ = writeln!(svg, r#"<g class="tooltip-layer" transform="translate({x:.2},{y:.2})">"#);
        let _ = writeln!(
            svg,
            r#"<rect class="tooltip-bg" width="{}" height="{}" rx="3"/>"#,
            longest as f64 * 6.5 + 12.0,
            tooltip.lines.len() as f64 * 14.0 + 8.0
        );
        for (i, line) in tooltip.lines.iter().enumerate() {
            let _ = writeln!(
                svg,
                r#"<text x="6" y="{}" class="tooltip">{}</text>"#,
                16.0 + i as f64 * 14.0,
                escape_xml(line)
            );
        }
        svg.push_str("</g>\n");
    }
}

impl RenderSurface for SvgSurface {
    fn apply(&mut self, frame: &RenderFrame) {
        let batch = &frame.batch;
        for entity in &batch.enter {
            self.scene.insert(entity.key(), entity.clone());
        }
        for entity in &batch.update {
            self.scene.insert(entity.key(), entity.clone());
        }
        for key in &batch.exit {
            self.scene.remove(key);
        }
        if let Some(tooltip) = &self.tooltip {
            if !self.scene.contains_key(&tooltip.key) {
                self.tooltip = None;
            }
        }
        self.domains = Some(frame.domains);
        self.last_apply = ApplyStats {
            entered: batch.enter.len(),
            updated: batch.update.len(),
            exited: batch.exit.len(),
        };
    }

    fn set_tooltip(&mut self, tooltip: Option<Tooltip>) {
        self.tooltip = tooltip;
    }
}

/// Format a value-axis tick with at most two decimals.
fn format_value_tick(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
