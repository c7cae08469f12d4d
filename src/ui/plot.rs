use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::StagePalette;
use crate::state::AppState;
use crate::views::rankings::RankedItem;
use crate::views::scatter::ScatterPoint;
use crate::views::stages::{StageContribution, StageMean};
use crate::views::{format_value, ChartSpec, View, ViewData};

use super::table;

const PLOT_HEIGHT: f32 = 340.0;
const BAR_WIDTH: f64 = 0.7;

// ---------------------------------------------------------------------------
// Dashboard page (central panel)
// ---------------------------------------------------------------------------

/// Render the page: header, one chart per built view, data table, footnote.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("🌍 Environmental Impact of Food Production");
            ui.label(
                RichText::new("Project 3: Multi-Metric Sustainability Insights (GHG, Water, Land Use)")
                    .strong(),
            );
            ui.hyperlink_to("View Details on GitHub", &state.config.source_url);
            ui.separator();

            if state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a file to view the dashboard  (File → Open…)");
                });
                return;
            }

            for view in &state.views {
                ui.add_space(8.0);
                ui.heading(view.kind.heading());
                view_chart(ui, view, &state.stage_palette);
            }

            if let Some(filtered) = &state.filtered {
                ui.add_space(8.0);
                egui::CollapsingHeader::new("Data")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| table::data_table(ui, filtered));
            }

            ui.separator();
            ui.label(
                "💡 Data source: Environmental impacts of food production dataset (Our World in Data).",
            );
        });
}

fn view_chart(ui: &mut Ui, view: &View, palette: &StagePalette) {
    let id = format!("view_{:?}", view.kind);
    if let Some(title) = &view.chart.title {
        ui.label(RichText::new(title).strong());
    }
    match &view.data {
        ViewData::Ranking(items) => ranking_chart(ui, &id, &view.chart, items),
        ViewData::StageAverages(means) => stage_average_chart(ui, &id, &view.chart, means),
        ViewData::Breakdown(segments) => breakdown_chart(ui, &id, &view.chart, segments, palette),
        ViewData::Scatter(points) => scatter_chart(ui, &id, &view.chart, points),
        ViewData::Correlation(corr) => scatter_chart(ui, &id, &view.chart, &corr.points),
    }
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

/// Horizontal bars, smallest at the bottom, each labelled with its value.
fn ranking_chart(ui: &mut Ui, id: &str, chart: &ChartSpec, items: &[RankedItem]) {
    let labels: Vec<String> = items.iter().map(|i| i.product.clone()).collect();
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(pos, item)| {
            Bar::new(pos as f64, item.value)
                .name(&item.product)
                .width(BAR_WIDTH)
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_scroll(false)
        .y_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (pos, item) in items.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(item.value, pos as f64),
                        format!(" {}", format_value(Some(item.value))),
                    )
                    .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}

/// Vertical bars, one per stage, largest first.
fn stage_average_chart(ui: &mut Ui, id: &str, chart: &ChartSpec, means: &[StageMean]) {
    let labels: Vec<String> = means.iter().map(|m| m.stage.clone()).collect();
    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(pos, m)| {
            Bar::new(pos as f64, m.mean.unwrap_or(0.0))
                .name(&m.stage)
                .width(BAR_WIDTH)
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_scroll(false)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            for (pos, m) in means.iter().enumerate() {
                if let Some(mean) = m.mean {
                    plot_ui.text(
                        Text::new(PlotPoint::new(pos as f64, mean), format_value(Some(mean)))
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
}

/// One horizontal bar per product, stacked by stage.
fn breakdown_chart(
    ui: &mut Ui,
    id: &str,
    chart: &ChartSpec,
    segments: &[StageContribution],
    palette: &StagePalette,
) {
    let mut products: Vec<&str> = Vec::new();
    let mut stages: Vec<&str> = Vec::new();
    for s in segments {
        if !products.contains(&s.product.as_str()) {
            products.push(&s.product);
        }
        if !stages.contains(&s.stage.as_str()) {
            stages.push(&s.stage);
        }
    }

    // Every stage gets a bar per product in the same order so stacking lines up.
    let mut charts: Vec<BarChart> = Vec::with_capacity(stages.len());
    for stage in &stages {
        let bars: Vec<Bar> = products
            .iter()
            .enumerate()
            .map(|(pos, product)| {
                let value: f64 = segments
                    .iter()
                    .filter(|s| s.stage == *stage && s.product == *product)
                    .filter_map(|s| s.value)
                    .sum();
                Bar::new(pos as f64, value)
                    .name(format!("{product} – {stage}"))
                    .width(BAR_WIDTH)
            })
            .collect();

        let below: Vec<&BarChart> = charts.iter().collect();
        let stacked = BarChart::new(bars)
            .horizontal()
            .name(*stage)
            .color(palette.color_for(stage))
            .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                format!("{}: {}", bar.name, format_value(Some(bar.value)))
            }))
            .stack_on(&below);
        charts.push(stacked);
    }

    let labels: Vec<String> = products.iter().map(|p| p.to_string()).collect();
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_scroll(false)
        .legend(Legend::default())
        .y_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            for c in charts {
                plot_ui.bar_chart(c);
            }
        });
}

fn scatter_chart(ui: &mut Ui, id: &str, chart: &ChartSpec, points: &[ScatterPoint]) {
    let series: PlotPoints = points.iter().map(|p| [p.x, p.y]).collect();
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(Points::new(series).radius(4.0));
        });
}

/// Axis labels for category positions `0, 1, 2, ...`.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}
