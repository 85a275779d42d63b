//! Session command: replay scripted interactions against one chart.
//!
//! Script format, one step per line (`#` starts a comment):
//!
//! ```text
//! region EU_Sales
//! family Nintendo
//! toggle Action
//! hover Role-Playing 2005
//! unhover
//! reload
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use genre_trends::{
    ChartConfig, Controller, EntityKey, FamilyFilter, FilterChange, Gesture, GestureResponse,
    Region, RenderFrame, RenderSurface, SvgSurface, Trigger,
};

use crate::Selection;

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Region(Region),
    Family(FamilyFilter),
    Toggle(String),
    Hover(String, i32),
    Unhover,
    Reload,
}

impl Step {
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        let step = match command.to_ascii_lowercase().as_str() {
            "region" => Self::Region(rest.parse()?),
            "family" => Self::Family(rest.parse()?),
            "toggle" | "click" => {
                if rest.is_empty() {
                    bail!("toggle needs a genre");
                }
                Self::Toggle(rest.to_string())
            }
            "hover" => {
                let Some((genre, year)) = rest.rsplit_once(char::is_whitespace) else {
                    bail!("hover needs a genre and a year");
                };
                let year = year
                    .parse()
                    .with_context(|| format!("invalid year '{}'", year))?;
                Self::Hover(genre.trim().to_string(), year)
            }
            "unhover" => Self::Unhover,
            "reload" => Self::Reload,
            other => bail!("unknown command '{}'", other),
        };
        Ok(Some(step))
    }
}

pub fn run(
    selection: &Selection,
    script: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let script = match script {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            buf
        }
    };
    let steps = parse_script(&script)?;

    let config = super::chart_config(config.as_deref())?;
    let mut out = std::io::stdout().lock();
    let mut session = Session::open(selection, config, &mut out)?;
    for (label, step) in steps {
        session.step(&label, step, &mut out)?;
    }

    if let Some(path) = output {
        std::fs::write(&path, session.surface.to_svg())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        writeln!(out, "Saved to: {}", path.display())?;
    }

    Ok(())
}

/// Parse a whole script, keeping each step's source line as its label.
fn parse_script(script: &str) -> Result<Vec<(String, Step)>> {
    let mut steps = Vec::new();
    for (idx, line) in script.lines().enumerate() {
        if let Some(step) = Step::parse(line).with_context(|| format!("script line {}", idx + 1))? {
            steps.push((line.trim().to_string(), step));
        }
    }
    Ok(steps)
}

/// One chart being driven by scripted steps.
struct Session<'a> {
    selection: &'a Selection,
    controller: Controller,
    surface: SvgSurface,
}

impl<'a> Session<'a> {
    /// Load the selection and render the first pass. Fails if that load fails.
    fn open(selection: &'a Selection, config: ChartConfig, out: &mut impl Write) -> Result<Self> {
        let mut session = Self {
            selection,
            controller: super::controller(selection, config.clone()),
            surface: SvgSurface::new(config),
        };
        let frame = super::load(&mut session.controller, selection)?;
        session.apply("load", &frame, out)?;
        Ok(session)
    }

    fn step(&mut self, label: &str, step: Step, out: &mut impl Write) -> Result<()> {
        match step {
            Step::Region(region) => {
                let frame = self
                    .controller
                    .handle(Trigger::FilterChanged(FilterChange::Region(region)));
                self.apply(label, &frame, out)?;
            }
            Step::Family(family) => {
                let frame = self
                    .controller
                    .handle(Trigger::FilterChanged(FilterChange::Family(family)));
                self.apply(label, &frame, out)?;
            }
            Step::Toggle(genre) => {
                if let GestureResponse::Render(frame) =
                    self.controller.gesture(Gesture::LegendClick(genre))
                {
                    self.apply(label, &frame, out)?;
                }
            }
            Step::Hover(genre, year) => {
                if let GestureResponse::Tooltip(tooltip) = self
                    .controller
                    .gesture(Gesture::Hover(EntityKey::Point(genre, year)))
                {
                    match &tooltip {
                        Some(t) => writeln!(out, "{:<28} {}", label, t.lines.join(" | "))?,
                        None => writeln!(out, "{:<28} (nothing under cursor)", label)?,
                    }
                    self.surface.set_tooltip(tooltip);
                }
            }
            Step::Unhover => {
                if let GestureResponse::Tooltip(tooltip) = self.controller.gesture(Gesture::HoverEnd)
                {
                    self.surface.set_tooltip(tooltip);
                }
                writeln!(out, "{:<28} tooltip cleared", label)?;
            }
            Step::Reload => match super::load(&mut self.controller, self.selection) {
                Ok(frame) => self.apply(label, &frame, out)?,
                // A failed reload keeps the chart.
                Err(e) => {
                    log::warn!("reload failed: {:#}", e);
                    writeln!(out, "{:<28} failed, chart kept", label)?;
                }
            },
        }
        Ok(())
    }

    /// Apply a frame and report its `+enter ~update -exit` counts.
    fn apply(&mut self, label: &str, frame: &RenderFrame, out: &mut impl Write) -> Result<()> {
        self.surface.apply(frame);
        let batch = &frame.batch;
        writeln!(
            out,
            "{:<28} +{} ~{} -{}",
            label,
            batch.enter.len(),
            batch.update.len(),
            batch.exit.len()
        )?;
        Ok(())
    }
}
