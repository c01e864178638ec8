use crate::log;
use crate::models::TraceRecord;
use crate::output::statistics::LatencySummary;
use crate::utils::constants::{
    ACCESS_PATTERN_PNG, DEFAULT_DPI, DEFAULT_FIGURE_SIZE_INCHES, LATENCY_DISTRIBUTION_PNG,
};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};

/// Plotters 차트 생성을 위한 공통 설정
///
/// Sizes are given the way a figure is described (inches, points) and turned
/// into pixels through `dpi`.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub dpi: u32,
    pub figure_size: (f64, f64), // inches
    pub font_family: &'static str,
    pub title_font_pt: f64,
    pub axis_label_font_pt: f64,
    pub tick_label_font_pt: f64,
    pub legend_font_pt: f64,
    pub point_radius_pt: f64,
    pub point_alpha: f64,
    pub bar_alpha: f64,
    pub grid_alpha: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            figure_size: DEFAULT_FIGURE_SIZE_INCHES,
            font_family: "sans-serif",
            title_font_pt: 14.0,
            axis_label_font_pt: 12.0,
            tick_label_font_pt: 9.0,
            legend_font_pt: 10.0,
            point_radius_pt: 1.8,
            point_alpha: 0.6,
            bar_alpha: 0.7,
            grid_alpha: 0.3,
        }
    }
}

impl ChartConfig {
    /// Points to pixels at the configured DPI, at least 1 px.
    pub fn px(&self, points: f64) -> u32 {
        ((points * self.dpi as f64 / 72.0).round() as u32).max(1)
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size;
        (
            (w * self.dpi as f64).round() as u32,
            (h * self.dpi as f64).round() as u32,
        )
    }
}

/// 데이터 범위에 패딩을 추가하는 함수
///
/// A zero-width range is widened by 1 on each side so the axis stays drawable.
pub fn add_padding_to_range(min: f64, max: f64, padding_percent: f64) -> (f64, f64) {
    let range = max - min;
    if range <= 0.0 {
        return (min - 1.0, max + 1.0);
    }
    let padding = range * padding_percent;
    (min - padding, max + padding)
}

/// X tick label of one histogram bin: "lo-hi" with one decimal.
pub fn bin_label(lower: f64, upper: f64) -> String {
    format!("{lower:.1}-{upper:.1}")
}

fn axis_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Scatter of LBA (bytes) over normalized arrival time, Write blue, Read red.
///
/// Records of other kinds set the axis ranges but are not drawn.
pub fn create_access_pattern_chart(
    records: &[TraceRecord],
    png_path: &Path,
    config: &ChartConfig,
) -> Result<(), String> {
    if records.is_empty() {
        return Err("No I/O records available for the access pattern chart".to_string());
    }

    // I/O type에 따라 데이터 분리
    let mut write_points = Vec::new();
    let mut read_points = Vec::new();
    for record in records {
        let point = (record.arrival_time() as f64, record.address() as f64);
        if record.operation().is_write() {
            write_points.push(point);
        } else if record.operation().is_read() {
            read_points.push(point);
        }
    }

    let (min_time, max_time) = axis_bounds(records.iter().map(|r| r.arrival_time() as f64));
    let (min_lba, max_lba) = axis_bounds(records.iter().map(|r| r.address() as f64));
    let (min_time, max_time) = add_padding_to_range(min_time, max_time, 0.05);
    let (min_lba, max_lba) = add_padding_to_range(min_lba, max_lba, 0.05);

    let root = BitMapBackend::new(png_path, config.pixel_size()).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let font = config.font_family;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "LBA Access Pattern",
            (font, config.px(config.title_font_pt)).into_font(),
        )
        .margin(config.px(10.0))
        .x_label_area_size(config.px(36.0))
        .y_label_area_size(config.px(60.0))
        .build_cartesian_2d(min_time..max_time, min_lba..max_lba)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_desc("Arrival Time")
        .y_desc("LBA")
        .y_label_formatter(&|v| format!("{v:.3e}"))
        .x_label_formatter(&|v| format!("{v:.3e}"))
        .bold_line_style(BLACK.mix(config.grid_alpha))
        .light_line_style(WHITE)
        .axis_desc_style((font, config.px(config.axis_label_font_pt)))
        .label_style((font, config.px(config.tick_label_font_pt)))
        .draw()
        .map_err(|e| e.to_string())?;

    let radius = config.px(config.point_radius_pt);
    let legend_radius = config.px(config.legend_font_pt / 3.0);

    for (label, color, points) in [("Write", BLUE, &write_points), ("Read", RED, &read_points)] {
        if points.is_empty() {
            continue;
        }
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), radius, color.mix(config.point_alpha).filled())),
            )
            .map_err(|e| e.to_string())?
            .label(label)
            .legend(move |(x, y)| Circle::new((x, y), legend_radius, color.filled()));
    }

    if !write_points.is_empty() || !read_points.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.5))
            .label_font((font, config.px(config.legend_font_pt)))
            .draw()
            .map_err(|e| e.to_string())?;
    }

    root.present().map_err(|e| e.to_string())?;

    Ok(())
}

/// Bar chart of a latency histogram, one bar per bin.
pub fn create_latency_distribution_chart(
    summary: &LatencySummary,
    png_path: &Path,
    config: &ChartConfig,
) -> Result<(), String> {
    if summary.bins.is_empty() {
        return Err("No histogram bins available for the latency chart".to_string());
    }

    let bin_count = summary.bins.len() as u32;
    let max_count = summary.bins.iter().map(|b| b.count).max().unwrap_or(0) as u32;
    let y_max = max_count + max_count / 20 + 1;

    let labels: Vec<String> = summary
        .bins
        .iter()
        .map(|b| bin_label(b.lower_us, b.upper_us))
        .collect();

    let root = BitMapBackend::new(png_path, config.pixel_size()).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let font = config.font_family;
    let title = format!("{} Command Latency Distribution", summary.operation);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (font, config.px(config.title_font_pt)).into_font())
        .margin(config.px(10.0))
        .x_label_area_size(config.px(80.0))
        .y_label_area_size(config.px(50.0))
        .build_cartesian_2d((0u32..bin_count).into_segmented(), 0u32..y_max)
        .map_err(|e| e.to_string())?;

    let tick_font = (font, config.px(config.tick_label_font_pt))
        .into_font()
        .transform(FontTransform::Rotate90);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(BLACK.mix(config.grid_alpha))
        .light_line_style(WHITE)
        .x_desc("Latency Range (us)")
        .y_desc("Number of Commands")
        .x_labels(bin_count as usize)
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_style(tick_font)
        .axis_desc_style((font, config.px(config.axis_label_font_pt)))
        .label_style((font, config.px(config.tick_label_font_pt)))
        .draw()
        .map_err(|e| e.to_string())?;

    let bar_data = || {
        summary
            .bins
            .iter()
            .enumerate()
            .map(|(i, b)| (i as u32, b.count as u32))
    };
    let bar_margin = config.px(2.0);

    // 막대 채우기 + 검은 테두리
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(config.bar_alpha).filled())
                .margin(bar_margin)
                .data(bar_data()),
        )
        .map_err(|e| e.to_string())?;
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLACK.stroke_width(config.px(0.8)))
                .margin(bar_margin)
                .data(bar_data()),
        )
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())?;

    Ok(())
}

/// Renders `access_pattern.png` into `output_dir`, overwriting it.
pub fn save_access_pattern_chart(
    records: &[TraceRecord],
    output_dir: &Path,
    config: &ChartConfig,
) -> Result<PathBuf, String> {
    let png_path = output_dir.join(ACCESS_PATTERN_PNG);
    create_access_pattern_chart(records, &png_path, config)?;
    log!("Plot saved as '{}'", png_path.display());
    Ok(png_path)
}

/// Renders `latency_distribution.png` into `output_dir`, overwriting it.
pub fn save_latency_distribution_chart(
    summary: &LatencySummary,
    output_dir: &Path,
    config: &ChartConfig,
) -> Result<PathBuf, String> {
    let png_path = output_dir.join(LATENCY_DISTRIBUTION_PNG);
    create_latency_distribution_chart(summary, &png_path, config)?;
    log!("\nPlot saved as '{}'", png_path.display());
    Ok(png_path)
}
