//! Static chart panels: the correlation ("Goldilocks") line chart and the
//! leakage-collapse bar chart.
//!
//! Layout is a pure function of dataset and viewport; drawing goes through
//! [`Canvas`]. There is no animation state, so the frontend only redraws on
//! mount and when the window resizes.

use crate::canvas::{fit_to_container, Canvas, Rect, Rgba, Stroke, TextAlign, TextStyle, Viewport};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartDataPoint {
    pub name: f32,
    pub value: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeakageDataPoint {
    pub leakage: f32,
    pub clusters: u32,
    pub color: Rgba,
}

pub const CORRELATION_DATA: [ChartDataPoint; 5] = [
    ChartDataPoint { name: 0.0, value: 0.951 },
    ChartDataPoint { name: 0.2, value: 0.999 },
    ChartDataPoint { name: 0.5, value: 1.007 },
    ChartDataPoint { name: 0.8, value: 0.993 },
    ChartDataPoint { name: 1.0, value: 0.960 },
];

pub const CORRELATION_Y_DOMAIN: (f32, f32) = (0.94, 1.02);
pub const OPTIMAL_CORRELATION: f32 = 0.5;

const GREEN: Rgba = Rgba::hex(0x22c55e);
const RED: Rgba = Rgba::hex(0xef4444);
const ORANGE: Rgba = Rgba::hex(0xf97316);
const GREY: Rgba = Rgba::hex(0x94a3b8);

pub const LEAKAGE_DATA: [LeakageDataPoint; 6] = [
    LeakageDataPoint { leakage: 0.0, clusters: 8, color: GREEN },
    LeakageDataPoint { leakage: 0.1, clusters: 2, color: RED },
    LeakageDataPoint { leakage: 0.25, clusters: 2, color: RED },
    LeakageDataPoint { leakage: 0.5, clusters: 6, color: ORANGE },
    LeakageDataPoint { leakage: 0.75, clusters: 8, color: ORANGE },
    LeakageDataPoint { leakage: 1.0, clusters: 6, color: GREY },
];

// Palette
const GRID_COLOR: Rgba = Rgba::hex(0x334155);
const AXIS_COLOR: Rgba = Rgba::hex(0x94a3b8);
const LINE_COLOR: Rgba = Rgba::hex(0xe879f9);
const BAR_OPACITY: f32 = 0.8;

// Plot margins in pixels
const MARGIN_TOP: f32 = 5.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 24.0;
const MARGIN_LEFT: f32 = 40.0;

const Y_TICK_INTERVALS: u32 = 4;
/// Fraction of each band left empty on either side of a bar.
const BAR_GAP_RATIO: f32 = 0.1;
const LABEL_PX: f32 = 10.0;

/// Linear map from a data interval onto a pixel interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f32, f32),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f32::EPSILON {
            return (r0 + r1) * 0.5;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Smallest of 1, 2, 5 (times a power of ten) that is >= `raw`.
pub fn nice_step(raw: f32) -> f32 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f32.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

pub fn plot_area(viewport: Viewport) -> Rect {
    Rect::new(
        MARGIN_LEFT,
        MARGIN_TOP,
        (viewport.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        (viewport.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel position along the axis.
    pub pos: f32,
    pub label: String,
}

fn y_ticks(scale: &LinearScale, decimals: usize) -> Vec<Tick> {
    let (d0, d1) = scale.domain;
    (0..=Y_TICK_INTERVALS)
        .map(|i| {
            let v = d0 + (d1 - d0) * i as f32 / Y_TICK_INTERVALS as f32;
            Tick {
                pos: scale.map(v),
                label: format!("{:.*}", decimals, v),
            }
        })
        .collect()
}

fn format_category(v: f32) -> String {
    // 0.25 keeps its second digit, 0.5 and 1 stay short
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineChartLayout {
    pub plot: Rect,
    pub points: Vec<Vec2>,
    /// Pixel x of the "Optimal" marker.
    pub reference_x: f32,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

pub fn correlation_layout(data: &[ChartDataPoint], viewport: Viewport) -> LineChartLayout {
    let plot = plot_area(viewport);
    let (x0, x1) = data
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.name), hi.max(p.name))
        });
    let (x0, x1) = if x0.is_finite() { (x0, x1) } else { (0.0, 1.0) };
    let xs = LinearScale::new((x0, x1), (plot.x, plot.right()));
    let ys = LinearScale::new(CORRELATION_Y_DOMAIN, (plot.bottom(), plot.y));
    LineChartLayout {
        plot,
        points: data
            .iter()
            .map(|p| Vec2::new(xs.map(p.name), ys.map(p.value)))
            .collect(),
        reference_x: xs.map(OPTIMAL_CORRELATION),
        x_ticks: data
            .iter()
            .map(|p| Tick {
                pos: xs.map(p.name),
                label: format_category(p.name),
            })
            .collect(),
        y_ticks: y_ticks(&ys, 2),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub rect: Rect,
    pub color: Rgba,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChartLayout {
    pub plot: Rect,
    pub bars: Vec<Bar>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

pub fn leakage_layout(data: &[LeakageDataPoint], viewport: Viewport) -> BarChartLayout {
    let plot = plot_area(viewport);
    let max = data.iter().map(|d| d.clusters).max().unwrap_or(0) as f32;
    let step = nice_step(max / Y_TICK_INTERVALS as f32);
    let top = (max / step).ceil().max(1.0) * step;
    let ys = LinearScale::new((0.0, top), (plot.bottom(), plot.y));
    let band = plot.width / data.len().max(1) as f32;
    let gap = band * BAR_GAP_RATIO;

    let mut bars = Vec::with_capacity(data.len());
    let mut x_ticks = Vec::with_capacity(data.len());
    for (i, d) in data.iter().enumerate() {
        let left = plot.x + band * i as f32;
        let y = ys.map(d.clusters as f32);
        bars.push(Bar {
            rect: Rect::new(left + gap, y, band - 2.0 * gap, plot.bottom() - y),
            color: d.color.with_alpha(BAR_OPACITY),
        });
        x_ticks.push(Tick {
            pos: left + band * 0.5,
            label: format_category(d.leakage),
        });
    }
    BarChartLayout {
        plot,
        bars,
        x_ticks,
        y_ticks: y_ticks(&ys, 0),
    }
}

fn axis_label(align: TextAlign) -> TextStyle {
    TextStyle {
        color: AXIS_COLOR,
        size_px: LABEL_PX,
        align,
    }
}

fn draw_y_axis(canvas: &mut dyn Canvas, plot: Rect, ticks: &[Tick]) {
    let grid = Stroke::dashed(GRID_COLOR, 1.0, 3.0, 3.0);
    for t in ticks {
        canvas.stroke_line(Vec2::new(plot.x, t.pos), Vec2::new(plot.right(), t.pos), grid);
        canvas.fill_text(
            &t.label,
            Vec2::new(plot.x - 6.0, t.pos + LABEL_PX * 0.35),
            axis_label(TextAlign::Right),
        );
    }
    let axis = Stroke::solid(AXIS_COLOR, 1.0);
    canvas.stroke_line(Vec2::new(plot.x, plot.y), Vec2::new(plot.x, plot.bottom()), axis);
}

fn draw_x_axis(canvas: &mut dyn Canvas, plot: Rect, ticks: &[Tick]) {
    let axis = Stroke::solid(AXIS_COLOR, 1.0);
    canvas.stroke_line(
        Vec2::new(plot.x, plot.bottom()),
        Vec2::new(plot.right(), plot.bottom()),
        axis,
    );
    for t in ticks {
        canvas.fill_text(
            &t.label,
            Vec2::new(t.pos, plot.bottom() + LABEL_PX + 4.0),
            axis_label(TextAlign::Center),
        );
    }
}

/// Pointer readout for one data point, as drawn over a hovered chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Index into the chart's dataset.
    pub index: usize,
    /// Pixel position the box is attached to.
    pub anchor: Vec2,
    pub title: String,
    pub line: String,
    pub line_color: Rgba,
}

/// Point nearest to `pointer` along x, while the pointer is over the plot.
pub fn correlation_hover(
    data: &[ChartDataPoint],
    layout: &LineChartLayout,
    pointer: Vec2,
) -> Option<Tooltip> {
    if !layout.plot.contains(pointer) {
        return None;
    }
    let (index, anchor) = layout
        .points
        .iter()
        .enumerate()
        .min_by(|a, b| (a.1.x - pointer.x).abs().total_cmp(&(b.1.x - pointer.x).abs()))?;
    let d = data.get(index)?;
    Some(Tooltip {
        index,
        anchor: *anchor,
        title: format!("Correlation: {}", format_category(d.name)),
        line: format!("Org Index: {}", d.value),
        line_color: LINE_COLOR,
    })
}

/// Bar whose band contains `pointer`, while the pointer is over the plot.
pub fn leakage_hover(
    data: &[LeakageDataPoint],
    layout: &BarChartLayout,
    pointer: Vec2,
) -> Option<Tooltip> {
    if data.is_empty() || !layout.plot.contains(pointer) {
        return None;
    }
    let band = layout.plot.width / data.len() as f32;
    let index = (((pointer.x - layout.plot.x) / band) as usize).min(data.len() - 1);
    let d = data[index];
    let bar = layout.bars.get(index)?;
    Some(Tooltip {
        index,
        anchor: Vec2::new(bar.rect.x + bar.rect.width * 0.5, bar.rect.y),
        title: format_category(d.leakage),
        line: format!("clusters: {}", d.clusters),
        line_color: d.color,
    })
}

const TOOLTIP_BACKGROUND: Rgba = Rgba::hex(0x1e293b);
const TOOLTIP_BORDER: Rgba = Rgba::hex(0x475569);
const TOOLTIP_TEXT: Rgba = Rgba::hex(0xf8fafc);
const TOOLTIP_PAD: f32 = 6.0;
const ACTIVE_DOT_RADIUS: f32 = 6.0;

/// Box placed up and to the right of the anchor, kept inside the viewport.
pub fn tooltip_box(tip: &Tooltip, viewport: Viewport) -> Rect {
    // monospace labels: roughly 0.6em per character
    let chars = tip.title.chars().count().max(tip.line.chars().count()) as f32;
    let w = chars * LABEL_PX * 0.6 + TOOLTIP_PAD * 2.0;
    let h = LABEL_PX * 2.0 + TOOLTIP_PAD * 3.0;
    let x = (tip.anchor.x + 10.0).min(viewport.width - w).max(0.0);
    let y = (tip.anchor.y - h - 10.0).max(0.0);
    Rect::new(x, y, w, h)
}

fn draw_tooltip(canvas: &mut dyn Canvas, tip: &Tooltip, viewport: Viewport) {
    let b = tooltip_box(tip, viewport);
    canvas.fill_rect(
        Rect::new(b.x - 1.0, b.y - 1.0, b.width + 2.0, b.height + 2.0),
        TOOLTIP_BORDER,
    );
    canvas.fill_rect(b, TOOLTIP_BACKGROUND);
    let left = TextStyle {
        color: TOOLTIP_TEXT,
        size_px: LABEL_PX,
        align: TextAlign::Left,
    };
    let x = b.x + TOOLTIP_PAD;
    canvas.fill_text(&tip.title, Vec2::new(x, b.y + TOOLTIP_PAD + LABEL_PX), left);
    canvas.fill_text(
        &tip.line,
        Vec2::new(x, b.y + TOOLTIP_PAD * 2.0 + LABEL_PX * 2.0),
        TextStyle {
            color: tip.line_color,
            ..left
        },
    );
}

fn render_correlation(canvas: &mut dyn Canvas, pointer: Option<Vec2>) {
    let viewport = fit_to_container(canvas);
    canvas.clear();
    let layout = correlation_layout(&CORRELATION_DATA, viewport);
    let plot = layout.plot;

    let grid = Stroke::dashed(GRID_COLOR, 1.0, 3.0, 3.0);
    for t in &layout.x_ticks {
        canvas.stroke_line(Vec2::new(t.pos, plot.y), Vec2::new(t.pos, plot.bottom()), grid);
    }
    draw_y_axis(canvas, plot, &layout.y_ticks);
    draw_x_axis(canvas, plot, &layout.x_ticks);

    canvas.stroke_line(
        Vec2::new(layout.reference_x, plot.y),
        Vec2::new(layout.reference_x, plot.bottom()),
        Stroke::dashed(Rgba::WHITE, 1.0, 3.0, 3.0),
    );
    canvas.fill_text(
        "Optimal",
        Vec2::new(layout.reference_x, plot.y + LABEL_PX + 2.0),
        TextStyle {
            color: Rgba::WHITE,
            size_px: LABEL_PX,
            align: TextAlign::Center,
        },
    );

    let line = Stroke::solid(LINE_COLOR, 3.0);
    for pair in layout.points.windows(2) {
        canvas.stroke_line(pair[0], pair[1], line);
    }
    let hover = pointer.and_then(|p| correlation_hover(&CORRELATION_DATA, &layout, p));
    for (i, p) in layout.points.iter().enumerate() {
        let r = match &hover {
            Some(tip) if tip.index == i => ACTIVE_DOT_RADIUS,
            _ => 4.0,
        };
        canvas.fill_circle(*p, r, LINE_COLOR, None);
    }

    canvas.fill_text(
        "Strength",
        Vec2::new(plot.x + plot.width * 0.5, viewport.height - 1.0),
        axis_label(TextAlign::Center),
    );
    if let Some(tip) = &hover {
        draw_tooltip(canvas, tip, viewport);
    }
}

fn render_leakage(canvas: &mut dyn Canvas, pointer: Option<Vec2>) {
    let viewport = fit_to_container(canvas);
    canvas.clear();
    let layout = leakage_layout(&LEAKAGE_DATA, viewport);
    let hover = pointer.and_then(|p| leakage_hover(&LEAKAGE_DATA, &layout, p));
    if let Some(tip) = &hover {
        let band = layout.plot.width / LEAKAGE_DATA.len() as f32;
        canvas.fill_rect(
            Rect::new(
                layout.plot.x + band * tip.index as f32,
                layout.plot.y,
                band,
                layout.plot.height,
            ),
            Rgba::WHITE.with_alpha(0.05),
        );
    }
    draw_y_axis(canvas, layout.plot, &layout.y_ticks);
    for bar in &layout.bars {
        canvas.fill_rect(bar.rect, bar.color);
    }
    draw_x_axis(canvas, layout.plot, &layout.x_ticks);
    if let Some(tip) = &hover {
        draw_tooltip(canvas, tip, viewport);
    }
}

/// Panel B: organisation index against correlation strength.
pub fn draw_correlation_chart(canvas: &mut dyn Canvas) {
    render_correlation(canvas, None);
}

/// Panel C: surviving clusters against paternal leakage.
pub fn draw_leakage_chart(canvas: &mut dyn Canvas) {
    render_leakage(canvas, None);
}

/// The two static chart panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartPanel {
    Correlation,
    Leakage,
}

impl ChartPanel {
    pub fn draw(self, canvas: &mut dyn Canvas) {
        self.draw_with_pointer(canvas, None);
    }

    /// Draw, adding the readout for the data point under `pointer` (canvas
    /// pixels) when there is one.
    pub fn draw_with_pointer(self, canvas: &mut dyn Canvas, pointer: Option<Vec2>) {
        match self {
            ChartPanel::Correlation => render_correlation(canvas, pointer),
            ChartPanel::Leakage => render_leakage(canvas, pointer),
        }
    }
}
