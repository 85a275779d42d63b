//! Interaction controller: the three-trigger state machine.
//!
//! | Trigger | Visibility | Pipeline stages re-run |
//! |---|---|---|
//! | [`Trigger::DataReplaced`] | reset | aggregate, domains, reconcile |
//! | [`Trigger::FilterChanged`] | kept | aggregate, domains, reconcile |
//! | [`Trigger::VisibilityToggled`] | one genre flipped | reconcile |
//!
//! Loads are identified by [`LoadTicket`]s. Only the most recently issued
//! ticket may deliver data; anything older is discarded whatever order the
//! completions arrive in.

use crate::aggregate::{Series, aggregate_with};
use crate::chart::{
    ColorAssignment, Domains, EntityKey, Gesture, Reconciler, RenderEntity, RenderFrame,
    RenderSurface, Scales, Tooltip, target_entities,
};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::import::{DataSource, RawRecord, RecordSchema};
use crate::platform::FamilyFilter;
use crate::region::Region;
use crate::visibility::VisibilityState;

/// A filter selector change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// New region column.
    Region(Region),
    /// New platform family filter.
    Family(FamilyFilter),
}

/// Events that drive the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// A new dataset replaced the old one.
    DataReplaced(Vec<RawRecord>),
    /// A selector changed.
    FilterChanged(FilterChange),
    /// A legend entry was toggled.
    VisibilityToggled(String),
}

/// Identity of one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The data was current and has been rendered.
    Applied(RenderFrame),
    /// A newer load was requested meanwhile; the result was dropped.
    Superseded,
}

/// What a surface should do in response to a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureResponse {
    /// Apply a new frame.
    Render(RenderFrame),
    /// Show (or, with `None`, clear) a tooltip.
    Tooltip(Option<Tooltip>),
}

/// Owns filter selections, visibility and colors, and runs the pipeline.
#[derive(Debug, Clone)]
pub struct Controller {
    config: ChartConfig,
    schema: RecordSchema,
    rows: Vec<RawRecord>,
    region: Region,
    family: FamilyFilter,
    visibility: VisibilityState,
    colors: ColorAssignment,
    series: Vec<Series>,
    domains: Domains,
    reconciler: Reconciler,
    issued: u64,
}

impl Controller {
    /// Create a controller with no data and default filters.
    #[must_use]
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            schema: RecordSchema::default(),
            rows: Vec::new(),
            region: Region::default(),
            family: FamilyFilter::All,
            visibility: VisibilityState::new(),
            colors: ColorAssignment::new(),
            series: Vec::new(),
            domains: Domains::compute(&[]),
            reconciler: Reconciler::new(),
            issued: 0,
        }
    }

    /// Use custom column names for aggregation.
    #[must_use]
    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Set the initial region without rendering.
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Set the initial family filter without rendering.
    #[must_use]
    pub fn with_family(mut self, family: FamilyFilter) -> Self {
        self.family = family;
        self
    }

    /// Run a trigger through the pipeline.
    pub fn handle(&mut self, trigger: Trigger) -> RenderFrame {
        match trigger {
            Trigger::DataReplaced(rows) => {
                log::info!("dataset replaced: {} records", rows.len());
                self.rows = rows;
                self.visibility.reset();
                self.colors.reset();
                self.recompute()
            }
            Trigger::FilterChanged(change) => {
                match change {
                    FilterChange::Region(region) => self.region = region,
                    FilterChange::Family(family) => self.family = family,
                }
                log::debug!("filters: region={}, family={}", self.region, self.family);
                self.recompute()
            }
            Trigger::VisibilityToggled(genre) => {
                let visible = self.visibility.toggle(&genre);
                log::debug!("{} now {}", genre, if visible { "shown" } else { "hidden" });
                self.reconcile()
            }
        }
    }

    /// Run a trigger and apply the result to a surface.
    pub fn dispatch(&mut self, trigger: Trigger, surface: &mut dyn RenderSurface) {
        let frame = self.handle(trigger);
        surface.apply(&frame);
    }

    /// Issue a ticket for a new load, superseding all earlier ones.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Deliver the result of a load.
    ///
    /// A stale ticket is discarded whether it succeeded or failed. A failure
    /// on the current ticket is returned and leaves all state untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<RawRecord>>,
    ) -> Result<LoadOutcome> {
        if ticket.0 != self.issued {
            log::warn!(
                "discarding load #{} superseded by #{}",
                ticket.0,
                self.issued
            );
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(rows) => Ok(LoadOutcome::Applied(self.handle(Trigger::DataReplaced(rows)))),
            Err(e) => {
                log::warn!("load #{} failed: {}", ticket.0, e);
                Err(e)
            }
        }
    }

    /// Load synchronously from a source and render.
    pub fn load_from(&mut self, source: &dyn DataSource) -> Result<RenderFrame> {
        let ticket = self.begin_load();
        log::debug!("load #{} from {}", ticket.0, source.name());
        match self.complete_load(ticket, source.load())? {
            LoadOutcome::Applied(frame) => Ok(frame),
            // Nothing can issue a ticket between begin and complete here.
            LoadOutcome::Superseded => Ok(self.reconcile()),
        }
    }

    /// React to a surface gesture.
    pub fn gesture(&mut self, gesture: Gesture) -> GestureResponse {
        match gesture {
            Gesture::LegendClick(genre) => {
                GestureResponse::Render(self.handle(Trigger::VisibilityToggled(genre)))
            }
            Gesture::Hover(key) => GestureResponse::Tooltip(self.tooltip_for(&key)),
            Gesture::HoverEnd => GestureResponse::Tooltip(None),
        }
    }

    /// Current aggregated series, in encounter order.
    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Current domains.
    #[must_use]
    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Current visibility state.
    #[must_use]
    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    /// Current color assignment.
    #[must_use]
    pub fn colors(&self) -> &ColorAssignment {
        &self.colors
    }

    /// Selected region.
    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    /// Selected family filter.
    #[must_use]
    pub fn family(&self) -> FamilyFilter {
        self.family
    }

    /// Entities on the surface after the last pass.
    #[must_use]
    pub fn rendered(&self) -> &std::collections::BTreeMap<EntityKey, RenderEntity> {
        self.reconciler.rendered()
    }

    /// Chart configuration.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn recompute(&mut self) -> RenderFrame {
        self.series = aggregate_with(&self.rows, &self.schema, self.region.column(), self.family);
        self.visibility
            .initialize(self.series.iter().map(|s| s.genre.as_str()));
        self.colors.assign(&self.series);
        self.domains = Domains::compute(&self.series);
        self.reconcile()
    }

    fn reconcile(&mut self) -> RenderFrame {
        let scales = Scales::new(&self.domains, &self.config);
        let target = target_entities(
            &self.series,
            &self.visibility,
            &self.colors,
            &scales,
            &self.config,
        );
        RenderFrame {
            batch: self.reconciler.pass(target),
            domains: self.domains,
            colors: self.colors.entries(),
        }
    }

    fn tooltip_for(&self, key: &EntityKey) -> Option<Tooltip> {
        match self.reconciler.get(key)? {
            RenderEntity::Point(p) => Some(Tooltip {
                key: key.clone(),
                lines: vec![
                    format!("Year: {}", p.year),
                    format!("Genre: {}", p.genre),
                    format!("{}: {:.2}M", self.region.column(), p.value),
                ],
                anchor: (p.x, p.y),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{PALETTE, SvgSurface};
    use crate::error::Error;
    use crate::import::CsvSource;
    use crate::platform::PlatformFamily;

    fn row(year: &str, genre: &str, platform: &str, global: &str) -> RawRecord {
        RawRecord::new()
            .with("Year", year)
            .with("Genre", genre)
            .with("Platform", platform)
            .with("Global_Sales", global)
            .with("JP_Sales", "0.1")
    }

    fn dataset() -> Vec<RawRecord> {
        vec![
            row("2001", "Action", "PS2", "1.5"),
            row("2001", "Action", "PS3", "2.0"),
            row("2002", "Action", "Wii", "1.0"),
            row("2002", "Puzzle", "DS", "0.5"),
            row("2003", "Sports", "X360", "3.0"),
        ]
    }

    fn loaded() -> Controller {
        let mut controller = Controller::new(ChartConfig::default());
        controller.handle(Trigger::DataReplaced(dataset()));
        controller
    }

    #[test]
    fn test_data_replaced_renders_everything() {
        let mut controller = Controller::new(ChartConfig::default());
        let frame = controller.handle(Trigger::DataReplaced(dataset()));

        // 3 lines + 4 points + 3 legend rows
        assert_eq!(frame.batch.enter.len(), 10);
        assert!(frame.batch.update.is_empty());
        assert!(frame.batch.exit.is_empty());
        assert_eq!(frame.colors.len(), 3);
        assert_eq!(controller.domains().values.max, 3.5);
    }

    #[test]
    fn test_family_filter_keeps_visibility() {
        let mut controller = loaded();
        controller.handle(Trigger::VisibilityToggled("Action".into()));

        let frame = controller.handle(Trigger::FilterChanged(FilterChange::Family(
            PlatformFamily::Nintendo.into(),
        )));
        assert!(!controller.visibility().is_visible("Action"));
        assert!(frame.batch.exit.contains(&EntityKey::LegendItem("Sports".into())));
        let genres: Vec<_> = controller.series().iter().map(|s| s.genre.as_str()).collect();
        assert_eq!(genres, vec!["Action", "Puzzle"]);
    }

    #[test]
    fn test_toggle_only_touches_rendering() {
        let mut controller = loaded();
        let series_before = controller.series().to_vec();
        let domains_before = *controller.domains();

        let frame = controller.handle(Trigger::VisibilityToggled("Action".into()));

        assert_eq!(controller.series(), series_before.as_slice());
        assert_eq!(*controller.domains(), domains_before);
        assert!(frame.batch.enter.is_empty());
        assert_eq!(
            frame.batch.exit,
            vec![
                EntityKey::Line("Action".into()),
                EntityKey::Point("Action".into(), 2001),
                EntityKey::Point("Action".into(), 2002),
            ]
        );
        let legend = frame.batch.update.iter().find_map(|e| match e {
            RenderEntity::LegendItem(l) if l.genre == "Action" => Some(l.opacity),
            _ => None,
        });
        assert_eq!(legend, Some(0.25));
    }

    #[test]
    fn test_toggle_off_on_restores_keys() {
        let mut controller = loaded();
        let keys_before: Vec<EntityKey> = controller.rendered().keys().cloned().collect();
        let series_before = controller.series().to_vec();

        controller.handle(Trigger::VisibilityToggled("Action".into()));
        let frame = controller.handle(Trigger::VisibilityToggled("Action".into()));

        let entered: Vec<EntityKey> = frame.batch.enter_keys().collect();
        assert_eq!(
            entered,
            vec![
                EntityKey::Line("Action".into()),
                EntityKey::Point("Action".into(), 2001),
                EntityKey::Point("Action".into(), 2002),
            ]
        );
        let keys_after: Vec<EntityKey> = controller.rendered().keys().cloned().collect();
        assert_eq!(keys_before, keys_after);
        assert_eq!(controller.series(), series_before.as_slice());
    }

    #[test]
    fn test_hidden_genre_still_drives_domain() {
        let mut controller = loaded();
        controller.handle(Trigger::VisibilityToggled("Action".into()));
        controller.handle(Trigger::FilterChanged(FilterChange::Region(Region::Global)));
        assert_eq!(controller.domains().values.max, 3.5);
    }

    #[test]
    fn test_region_change_rescales() {
        let mut controller = loaded();
        let frame = controller.handle(Trigger::FilterChanged(FilterChange::Region(Region::Japan)));
        assert_eq!(controller.region(), Region::Japan);
        assert!((controller.domains().values.max - 0.2).abs() < 1e-9);
        assert!(frame.batch.enter.is_empty());
        assert!(frame.batch.exit.is_empty());
    }

    #[test]
    fn test_data_replaced_resets_visibility_and_colors() {
        let mut controller = loaded();
        controller.handle(Trigger::VisibilityToggled("Action".into()));

        controller.handle(Trigger::DataReplaced(vec![
            row("2005", "Racing", "PC", "1.0"),
            row("2005", "Action", "PC", "1.0"),
        ]));
        assert!(controller.visibility().is_visible("Action"));
        assert_eq!(controller.visibility().len(), 2);
        assert_eq!(controller.colors().color("Racing"), Some(PALETTE[0]));
        assert_eq!(controller.colors().color("Puzzle"), None);
    }

    #[test]
    fn test_colors_stable_across_filters() {
        let mut controller = loaded();
        let before = controller.colors().entries();
        controller.handle(Trigger::FilterChanged(FilterChange::Family(
            PlatformFamily::Xbox.into(),
        )));
        controller.handle(Trigger::FilterChanged(FilterChange::Family(FamilyFilter::All)));
        assert_eq!(controller.colors().entries(), before);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut controller = Controller::new(ChartConfig::default());
        let slow = controller.begin_load();
        let fast = controller.begin_load();

        let applied = controller
            .complete_load(fast, Ok(vec![row("2010", "Shooter", "PC", "2.0")]))
            .unwrap();
        assert!(matches!(applied, LoadOutcome::Applied(_)));

        let stale = controller
            .complete_load(slow, Ok(dataset()))
            .unwrap();
        assert_eq!(stale, LoadOutcome::Superseded);
        assert_eq!(controller.series().len(), 1);
        assert_eq!(controller.series()[0].genre, "Shooter");
    }

    #[test]
    fn test_failed_load_keeps_chart() {
        let mut controller = loaded();
        let rendered_before = controller.rendered().clone();

        let ticket = controller.begin_load();
        let err = controller
            .complete_load(
                ticket,
                Err(Error::Load {
                    source_name: "vgsales.csv".into(),
                    reason: "truncated".into(),
                }),
            )
            .unwrap_err();
        assert!(err.is_load_error());
        assert_eq!(controller.rendered(), &rendered_before);
        assert_eq!(controller.series().len(), 3);
    }

    #[test]
    fn test_hover_tooltip() {
        let mut controller = loaded();
        let response = controller.gesture(Gesture::Hover(EntityKey::Point("Action".into(), 2001)));
        let tooltip = match response {
            GestureResponse::Tooltip(Some(tooltip)) => tooltip,
            other => panic!("expected tooltip, got {other:?}"),
        };
        assert_eq!(
            tooltip.lines,
            vec!["Year: 2001", "Genre: Action", "Global_Sales: 3.50M"]
        );

        assert_eq!(
            controller.gesture(Gesture::Hover(EntityKey::Line("Action".into()))),
            GestureResponse::Tooltip(None)
        );
        assert_eq!(controller.gesture(Gesture::HoverEnd), GestureResponse::Tooltip(None));
    }

    #[test]
    fn test_legend_click_toggles() {
        let mut controller = loaded();
        let response = controller.gesture(Gesture::LegendClick("Puzzle".into()));
        assert!(matches!(response, GestureResponse::Render(_)));
        assert!(!controller.visibility().is_visible("Puzzle"));
    }

    #[test]
    fn test_dispatch_to_surface() {
        let mut controller = Controller::new(ChartConfig::default());
        let mut surface = SvgSurface::new(ChartConfig::default());
        controller.dispatch(Trigger::DataReplaced(dataset()), &mut surface);
        controller.dispatch(Trigger::VisibilityToggled("Sports".into()), &mut surface);

        assert_eq!(surface.scene(), controller.rendered());
        assert!(surface.to_svg().contains(r#"fill-opacity="0.25""#));
    }

    #[test]
    fn test_load_from_source() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"Year,Genre,Platform,Global_Sales\n2001,Action,PS2,1.5\n2002,Puzzle,DS,0.5\n")
            .unwrap();

        let mut controller = Controller::new(ChartConfig::default());
        let frame = controller
            .load_from(&CsvSource::new(file.path()))
            .unwrap();
        // 2 lines + 2 points + 2 legend rows
        assert_eq!(frame.batch.enter.len(), 6);
        assert_eq!(controller.series().len(), 2);
    }

    #[test]
    fn test_load_from_failure_keeps_chart() {
        let mut controller = loaded();
        controller.handle(Trigger::VisibilityToggled("Sports".into()));
        let rendered_before = controller.rendered().clone();

        let err = controller
            .load_from(&CsvSource::new("/nonexistent/vgsales.csv"))
            .unwrap_err();
        assert!(err.is_load_error());
        assert_eq!(controller.rendered(), &rendered_before);
        assert!(!controller.visibility().is_visible("Sports"));
        assert_eq!(controller.series().len(), 3);
    }

    #[test]
    fn test_custom_schema() {
        let schema = RecordSchema::builder()
            .year_column("yr")
            .genre_column("kind")
            .platform_column("system")
            .build();
        let mut controller = Controller::new(ChartConfig::default())
            .with_schema(schema)
            .with_family(PlatformFamily::Nintendo.into());
        controller.handle(Trigger::DataReplaced(vec![
            RawRecord::new()
                .with("yr", "2006")
                .with("kind", "Sports")
                .with("system", "Wii")
                .with("Global_Sales", "82.74"),
            RawRecord::new()
                .with("yr", "2006")
                .with("kind", "Racing")
                .with("system", "PS2")
                .with("Global_Sales", "1.0"),
            row("2006", "Action", "Wii", "9.0"),
        ]));

        assert_eq!(controller.series().len(), 1);
        assert_eq!(controller.series()[0].genre, "Sports");
        assert_eq!(controller.series()[0].value_at(2006), Some(82.74));
    }

    #[test]
    fn test_tiny_values_render() {
        let mut controller = Controller::new(ChartConfig::default());
        let mut surface = SvgSurface::new(ChartConfig::default());
        controller.dispatch(
            Trigger::DataReplaced(vec![row("2001", "Action", "PS2", "1e-323")]),
            &mut surface,
        );

        assert!(controller.domains().values.max > 0.0);
        let svg = surface.to_svg();
        assert!(svg.contains(r#"data-year="2001""#));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_overflowing_values_render() {
        let mut controller = Controller::new(ChartConfig::default());
        let mut surface = SvgSurface::new(ChartConfig::default());
        controller.dispatch(
            Trigger::DataReplaced(vec![
                row("2001", "Action", "PS2", "1e308"),
                row("2001", "Action", "PS3", "1e308"),
                row("2002", "Action", "PS3", "1.0"),
            ]),
            &mut surface,
        );

        assert!(controller.domains().values.max.is_finite());
        let svg = surface.to_svg();
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_empty_dataset() {
        let mut controller = Controller::new(ChartConfig::default());
        let frame = controller.handle(Trigger::DataReplaced(Vec::new()));
        assert!(frame.batch.is_empty());
        assert_eq!(frame.domains.years, None);
        assert_eq!(frame.domains.values.max, 1.0);
    }
}
