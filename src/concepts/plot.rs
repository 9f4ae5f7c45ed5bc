// Bar-chart rendering for the category summary.
//
// One chart, three bars (unique / common / frequent), written as a PNG in
// the output directory. Purely a reporting side effect — nothing reads
// this image back.

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;

use super::analysis::ConceptCategories;

const CATEGORY_LABELS: [&str; 3] = ["Unique", "Common", "Frequent"];

/// Render the category distribution chart as `concept_analysis.png`.
pub fn render_category_chart(
    categories: &ConceptCategories,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("concept_analysis.png");
    let counts = [
        categories.unique.len(),
        categories.common.len(),
        categories.frequent.len(),
    ];
    draw(&counts, &path)
        .map_err(|e| anyhow::anyhow!("Failed to render concept chart: {e}"))?;
    Ok(path)
}

fn draw(counts: &[usize; 3], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    // Headroom above the tallest bar so it doesn't touch the frame.
    let tallest = counts.iter().copied().max().unwrap_or(0).max(1);
    let y_max = tallest + (tallest / 10).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Distribution of Concept Categories",
            ("sans-serif", 40).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..3usize).into_segmented(), 0usize..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Category")
        .y_desc("Number of Concepts")
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) if *i < CATEGORY_LABELS.len() => {
                CATEGORY_LABELS[*i].to_string()
            }
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.6).filled())
            .margin(30)
            .data(counts.iter().enumerate().map(|(i, &c)| (i, c))),
    )?;

    root.present()?;
    Ok(())
}
