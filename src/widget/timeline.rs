use crate::style;
use crate::widget::{format_time_label, time_ticks};

use data::config::theme;
use data::timeline::Dataset;
use data::timeline::index::SampleIndex;
use data::timeline::scale::{DEFAULT_PLOT_HEIGHT, PanelLayout, SIDE_MARGIN, Scales};
use data::timeline::scrub::Scrubber;
use data::timeline::view::{VisualState, visual_state};

use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::theme::palette::Extended;
use iced::widget::canvas;
use iced::{
    Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector, mouse, window,
};
use iced_core::renderer::Quad;

const TEXT_SIZE: f32 = style::TEXT_SIZE;

// Header geometry, px from the panel's top edge.
const READOUT_DOT_X: f32 = 10.0;
const READOUT_FIRST_ROW: f32 = 10.0;
const READOUT_ROW_STEP: f32 = 14.0;
const DATE_LABEL_ROW: f32 = 16.0;
const PROMOTED_ROW: f32 = 24.0;
const PROMOTED_OFFSET: f32 = 8.0;

const MARKER_RADIUS: f32 = 3.2;
const READOUT_DOT_RADIUS: f32 = 3.0;
const EVENT_RADIUS: f32 = 4.5;

/// Event triangles sit this far above the bottom rule.
const EVENT_RAISE: f32 = 6.0;

/// Strip below the plot holding the tick marks and their labels.
const AXIS_FOOTER: f32 = 20.0;
const AXIS_TICK_LEN: f32 = 5.0;
const MIN_X_TICK_PX: f32 = 80.0;

struct State {
    plot_cache: canvas::Cache,
    overlay_cache: canvas::Cache,
    scrubber: Scrubber,
    last_cache_rev: u64,
}

impl State {
    fn new(last_index: usize) -> Self {
        Self {
            plot_cache: canvas::Cache::new(),
            overlay_cache: canvas::Cache::new(),
            scrubber: Scrubber::new(last_index),
            last_cache_rev: 0,
        }
    }

    fn clear_all_caches(&mut self) {
        self.plot_cache.clear();
        self.overlay_cache.clear();
    }
}

/// Multi-series metric trend with event markers and a snapping scrubber.
///
/// The widget owns no data; it borrows a validated [`Dataset`] and keeps
/// only the scrubber selection in its internal state tree. Lines and the
/// x-axis live in one canvas cache, everything selection-dependent in a
/// second one that is invalidated on each scrubber transition.
pub struct Timeline<'a> {
    dataset: &'a Dataset,
    plot_height: f32,
    stroke_width: f32,
    version: u64,
}

impl<'a> Timeline<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            plot_height: DEFAULT_PLOT_HEIGHT,
            stroke_width: 2.0,
            version: 0,
        }
    }

    /// Plot area height, header and axis strip excluded.
    pub fn with_height(mut self, plot_height: f32) -> Self {
        self.plot_height = plot_height;
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    /// Bump when the dataset is swapped so cached geometry is rebuilt and
    /// the scrubber returns to the most recent sample.
    pub fn version(mut self, rev: u64) -> Self {
        self.version = rev;
        self
    }

    fn panel(&self, container_width: f32) -> PanelLayout {
        PanelLayout::new(
            container_width,
            self.plot_height,
            self.dataset.series.len(),
            self.dataset.has_events(),
        )
    }

    fn total_height(&self) -> f32 {
        // Header rows don't depend on the width.
        self.panel(0.0).total_height() + AXIS_FOOTER
    }

    fn scene(&self, container_width: f32) -> Scene {
        let panel = self.panel(container_width);
        let scales = Scales::compute(self.dataset, &panel);
        Scene { panel, scales }
    }
}

struct Scene {
    panel: PanelLayout,
    scales: Scales,
}

impl Scene {
    fn plot_rect(&self) -> Rectangle {
        Rectangle {
            x: SIDE_MARGIN,
            y: self.panel.header_height,
            width: self.panel.width,
            height: self.panel.plot_height,
        }
    }

    fn bottom_y(&self) -> f32 {
        self.panel.header_height + self.panel.plot_height
    }

    fn center_x(&self) -> f32 {
        SIDE_MARGIN + self.panel.width / 2.0
    }

    fn screen_x(&self, timestamp: u64) -> f32 {
        SIDE_MARGIN + self.scales.time.map(timestamp as f64)
    }

    /// Value scales run bottom-up; flip into screen space here.
    fn screen_y(&self, series: usize, value: f32) -> f32 {
        self.bottom_y() - self.scales.values[series].map(f64::from(value))
    }

    fn time_at(&self, x: f32) -> f64 {
        self.scales.time.invert(x - SIDE_MARGIN)
    }
}

impl<'a, M> Widget<M, Theme, Renderer> for Timeline<'a> {
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::new(self.dataset.last_index()))
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fill,
            height: Length::Fixed(self.total_height()),
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::atomic(limits, Length::Fill, self.total_height())
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        if shell.is_event_captured() {
            return;
        }

        match event {
            Event::Mouse(mouse_event) => {
                let state = tree.state.downcast_mut::<State>();
                let bounds = layout.bounds();

                match mouse_event {
                    mouse::Event::CursorMoved { .. } => match cursor.position_in(bounds) {
                        Some(position) => {
                            let scene = self.scene(bounds.width);
                            if scene.panel.width <= 0.0 {
                                return;
                            }

                            let t = scene.time_at(position.x);
                            let index = SampleIndex::new(self.dataset);
                            if state.scrubber.pointer_move(t, &index) {
                                state.overlay_cache.clear();
                            }
                        }
                        None => {
                            if state.scrubber.pointer_leave() {
                                state.overlay_cache.clear();
                            }
                        }
                    },
                    mouse::Event::CursorLeft => {
                        if state.scrubber.pointer_leave() {
                            state.overlay_cache.clear();
                        }
                    }
                    _ => {}
                }
            }
            Event::Window(window::Event::RedrawRequested(_)) => {
                let state = tree.state.downcast_mut::<State>();

                if state.last_cache_rev != self.version {
                    state.clear_all_caches();
                    state.scrubber = Scrubber::new(self.dataset.last_index());
                    state.last_cache_rev = self.version;
                }
            }
            _ => {}
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use advanced::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let bounds = layout.bounds();
        let scene = self.scene(bounds.width);
        if scene.panel.width <= 0.0 {
            return;
        }

        let palette = theme.extended_palette();
        let visual = visual_state(self.dataset, state.scrubber.selection());

        let plot_geom = state.plot_cache.draw(renderer, bounds.size(), |frame| {
            self.fill_series_lines(frame, &scene);
            self.fill_x_axis(frame, &scene, palette);
        });

        let overlay_geom = state.overlay_cache.draw(renderer, bounds.size(), |frame| {
            self.fill_event_markers(frame, &scene, &visual);
            self.fill_sample_markers(frame, &scene, &visual);
            self.fill_header(frame, &scene, &visual, palette);
        });

        renderer.with_translation(Vector::new(bounds.x, bounds.y), |r| {
            r.fill_quad(
                Quad {
                    bounds: Rectangle {
                        x: SIDE_MARGIN,
                        y: scene.bottom_y(),
                        width: scene.panel.width,
                        height: 1.0,
                    },
                    snap: true,
                    ..Default::default()
                },
                style::axis_color(palette),
            );

            use iced::advanced::graphics::geometry::Renderer as _;
            r.draw_geometry(plot_geom);
            r.draw_geometry(overlay_geom);
        });
    }

    fn mouse_interaction(
        &self,
        _state: &Tree,
        layout: Layout<'_>,
        cursor: advanced::mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> advanced::mouse::Interaction {
        if let Some(position) = cursor.position_in(layout.bounds()) {
            let scene = self.scene(layout.bounds().width);
            if scene.plot_rect().contains(position) {
                return advanced::mouse::Interaction::Crosshair;
            }
        }
        advanced::mouse::Interaction::default()
    }
}

impl<'a> Timeline<'a> {
    fn fill_series_lines(&self, frame: &mut canvas::Frame, scene: &Scene) {
        for (i, series) in self.dataset.series.iter().enumerate() {
            let mut builder = canvas::path::Builder::new();
            let mut connected = false;

            for sample in series {
                let Some(value) = sample.value else {
                    // Gaps break the line; neighbours are never bridged.
                    connected = false;
                    continue;
                };

                let point = Point::new(scene.screen_x(sample.timestamp), scene.screen_y(i, value));
                if connected {
                    builder.line_to(point);
                } else {
                    builder.move_to(point);
                    connected = true;
                }
            }

            frame.stroke(
                &builder.build(),
                canvas::Stroke::default()
                    .with_color(theme::series_color(i))
                    .with_width(self.stroke_width),
            );
        }
    }

    fn fill_x_axis(&self, frame: &mut canvas::Frame, scene: &Scene, palette: &Extended) {
        let (t_min, t_max) = scene.scales.time.domain();
        let px_per_ms = scene.panel.width / ((t_max - t_min).max(1.0) as f32);
        let (ticks, step) = time_ticks(t_min as u64, t_max as u64, px_per_ms, MIN_X_TICK_PX);

        let axis_color = style::axis_color(palette);
        let mut last_right = f32::NEG_INFINITY;

        for tick in ticks {
            let x = scene.screen_x(tick);

            let mut mark = canvas::path::Builder::new();
            mark.move_to(Point::new(x, scene.bottom_y()));
            mark.line_to(Point::new(x, scene.bottom_y() + AXIS_TICK_LEN));
            frame.stroke(
                &mark.build(),
                canvas::Stroke::default().with_color(axis_color).with_width(1.0),
            );

            let label = format_time_label(tick, step);
            let est_w = label.len() as f32 * style::CHAR_W + 8.0;
            if x - est_w * 0.5 <= last_right {
                continue;
            }
            last_right = x + est_w * 0.5;

            frame.fill_text(canvas::Text {
                content: label,
                position: Point::new(x, scene.bottom_y() + AXIS_TICK_LEN + 2.0 + TEXT_SIZE * 0.5),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::MONO,
                align_x: iced::Alignment::Center.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }
    }

    fn fill_event_markers(&self, frame: &mut canvas::Frame, scene: &Scene, visual: &VisualState) {
        let highlighted = visual.highlight.as_ref().map(|h| h.event);

        for (i, event) in self.dataset.events.iter().enumerate() {
            let fill = if highlighted == Some(i) {
                theme::event_highlight()
            } else {
                theme::EVENT_FILL
            };

            let marker = triangle(
                Point::new(scene.screen_x(event.timestamp), scene.bottom_y() - EVENT_RAISE),
                EVENT_RADIUS,
            );
            frame.fill(&marker, fill);
            frame.stroke(
                &marker,
                canvas::Stroke::default()
                    .with_color(theme::EVENT_STROKE)
                    .with_width(1.0),
            );
        }
    }

    fn fill_sample_markers(&self, frame: &mut canvas::Frame, scene: &Scene, visual: &VisualState) {
        for marker in &visual.markers {
            let x = scene.screen_x(marker.timestamp);
            // A gap still shows a dot, pinned to the bottom of the plot.
            let y = match marker.value {
                Some(value) => scene.screen_y(marker.series, value),
                None => scene.bottom_y(),
            };

            let fill = theme::series_color(marker.series);
            let outline = if theme::is_dark(fill) {
                Color::WHITE
            } else {
                Color::BLACK
            };

            let dot = canvas::Path::circle(Point::new(x, y), MARKER_RADIUS);
            frame.fill(&dot, fill);
            frame.stroke(
                &dot,
                canvas::Stroke::default().with_color(outline).with_width(1.0),
            );
        }
    }

    fn fill_header(
        &self,
        frame: &mut canvas::Frame,
        scene: &Scene,
        visual: &VisualState,
        palette: &Extended,
    ) {
        for (i, readout) in visual.readouts.iter().enumerate() {
            let y = READOUT_FIRST_ROW + i as f32 * READOUT_ROW_STEP;

            let dot = canvas::Path::circle(Point::new(READOUT_DOT_X, y), READOUT_DOT_RADIUS);
            frame.fill(&dot, theme::series_color(i));

            frame.fill_text(canvas::Text {
                content: readout.clone(),
                position: Point::new(READOUT_DOT_X + READOUT_DOT_RADIUS + 5.0, y),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::MONO,
                align_x: iced::Alignment::Start.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }

        if let Some(date) = &visual.date_label {
            frame.fill_text(canvas::Text {
                content: date.clone(),
                position: Point::new(scene.center_x(), DATE_LABEL_ROW),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::MONO,
                align_x: iced::Alignment::Center.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }

        if let Some(highlight) = &visual.highlight {
            let center = Point::new(scene.center_x() + PROMOTED_OFFSET, PROMOTED_ROW);
            let marker = triangle(center, EVENT_RADIUS + 1.5);
            frame.fill(&marker, theme::event_highlight());
            frame.stroke(
                &marker,
                canvas::Stroke::default()
                    .with_color(theme::EVENT_STROKE)
                    .with_width(1.0),
            );

            frame.fill_text(canvas::Text {
                content: highlight.label.clone(),
                position: Point::new(center.x + EVENT_RADIUS + 7.0, PROMOTED_ROW),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::MONO,
                align_x: iced::Alignment::Start.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }
    }
}

fn triangle(center: Point, radius: f32) -> canvas::Path {
    let mut builder = canvas::path::Builder::new();
    builder.move_to(Point::new(center.x, center.y - radius));
    builder.line_to(Point::new(center.x - radius, center.y + radius));
    builder.line_to(Point::new(center.x + radius, center.y + radius));
    builder.close();
    builder.build()
}

impl<'a, M: 'a> From<Timeline<'a>> for Element<'a, M, Theme, Renderer> {
    fn from(timeline: Timeline<'a>) -> Self {
        Element::new(timeline)
    }
}
