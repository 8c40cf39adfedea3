//! # 表面能绘图
//!
//! 把结果表的表面能按晶面画成 PNG 散点连线图。
//!
//! ## 依赖关系
//! - 被 `commands/process.rs` 调用
//! - 使用 `models/facet.rs` 的 FacetTable
//! - 使用 `plotters` 绘图库

use crate::error::{Result, SurfdataError};
use crate::models::FacetTable;
use std::path::Path;

/// 绘制各晶面表面能 (mJ/m²)
pub fn plot_surface_energy(table: &FacetTable, output_path: &Path) -> Result<()> {
    use plotters::prelude::*;

    let labels: Vec<String> = table.records.iter().map(|r| r.hkl.clone()).collect();
    let data: Vec<(usize, f64)> = table
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.surface_energy.is_nan())
        .map(|(i, r)| (i, r.surface_energy))
        .collect();

    if data.is_empty() {
        return Err(SurfdataError::Other("No surface energy data to plot".to_string()));
    }

    let y_min = data.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let y_max = data
        .iter()
        .map(|(_, y)| *y)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut y_margin = (y_max - y_min).abs() * 0.1;
    if y_margin == 0.0 {
        y_margin = 1.0;
    }

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| SurfdataError::Other(e.to_string()))?;

    let n = labels.len();
    let mut chart = ChartBuilder::on(&root)
        .caption("Surface Energy by Facet", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            -0.5f64..(n as f64 - 0.5),
            (y_min - y_margin)..(y_max + y_margin),
        )
        .map_err(|e| SurfdataError::Other(e.to_string()))?;

    let tick_labels = labels.clone();
    chart
        .configure_mesh()
        .x_desc("Facet (hkl)")
        .y_desc("Surface energy (mJ/m²)")
        .x_labels(n)
        .x_label_formatter(&move |x| {
            let i = x.round();
            if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < tick_labels.len() {
                tick_labels[i as usize].clone()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| SurfdataError::Other(e.to_string()))?;

    chart
        .draw_series(
            data.iter()
                .map(|(x, y)| Circle::new((*x as f64, *y), 5, RED.filled())),
        )
        .map_err(|e| SurfdataError::Other(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            data.iter().map(|(x, y)| (*x as f64, *y)),
            RED.stroke_width(2),
        ))
        .map_err(|e| SurfdataError::Other(e.to_string()))?;

    root.present()
        .map_err(|e| SurfdataError::Other(e.to_string()))?;

    Ok(())
}
