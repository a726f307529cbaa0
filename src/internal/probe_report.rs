#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::pedantic)]

use std::collections::HashMap;
use std::error::Error;
use std::hint::black_box;
use std::time::{Duration, Instant};

use plotters::prelude::*;
use probetable::{LatencyLog, ProbeStrategy, ProbeTable, Scenario};

// Batch sizes per configuration; the middle one feeds the chart.
const BATCH_SIZES: [usize; 3] = [256, 1024, 4096];
const CHART_BATCH: usize = 1024;
const REPETITIONS: usize = 5;

const LOG_PATH: &str = "latency_samples.csv";
const CHART_PATH: &str = "collision_counts.png";

fn value_for(key: u64) -> String {
    format!("value_{key}")
}

fn populated_table(strategy: ProbeStrategy, keys: &[u64]) -> ProbeTable {
    let mut table = ProbeTable::new();
    table.set_probe_strategy(strategy);
    for &key in keys {
        table.insert(key, value_for(key));
    }
    table
}

// Average wall-clock time per operation for one batch.
fn time_per_op(count: usize, run: impl FnOnce()) -> Duration {
    let start = Instant::now();
    run();
    start.elapsed() / count.max(1) as u32
}

fn run_table_batches(
    log: &mut LatencyLog,
    scenario: Scenario,
    strategy: ProbeStrategy,
    n: usize,
    keys: &[u64],
) -> Result<(), Box<dyn Error>> {
    for _ in 0..REPETITIONS {
        let mut table = ProbeTable::new();
        table.set_probe_strategy(strategy);

        let insert = time_per_op(keys.len(), || {
            for &key in keys {
                table.insert(key, value_for(key));
            }
        });
        log.record("insert", scenario.label(), n, strategy.label(), insert)?;

        let find = time_per_op(keys.len(), || {
            for &key in keys {
                black_box(table.find(key));
            }
        });
        log.record("find", scenario.label(), n, strategy.label(), find)?;

        let upsert = time_per_op(keys.len(), || {
            for &key in keys {
                table.upsert(key, value_for(key));
            }
        });
        log.record("upsert", scenario.label(), n, strategy.label(), upsert)?;

        let erase = time_per_op(keys.len(), || {
            for &key in keys {
                table.erase(key);
            }
        });
        log.record("erase", scenario.label(), n, strategy.label(), erase)?;
    }

    Ok(())
}

fn run_reference_batches(
    log: &mut LatencyLog,
    scenario: Scenario,
    keys: &[u64],
) -> Result<(), Box<dyn Error>> {
    for _ in 0..REPETITIONS {
        let mut map = HashMap::new();

        let insert = time_per_op(keys.len(), || {
            for &key in keys {
                map.insert(key, value_for(key));
            }
        });
        log.record("insert", scenario.label(), CHART_BATCH, "std_hashmap", insert)?;

        let find = time_per_op(keys.len(), || {
            for &key in keys {
                black_box(map.get(&key));
            }
        });
        log.record("find", scenario.label(), CHART_BATCH, "std_hashmap", find)?;
    }

    Ok(())
}

fn render_collision_chart(series: &[(ProbeStrategy, Vec<usize>)]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(CHART_PATH, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_count = series.iter().flat_map(|(_, counts)| counts.iter()).copied().max().unwrap_or(0);
    let y_max = (max_count as f64 * 1.1).max(1.0);

    let colors = [
        RGBColor(220, 50, 50),  // Bright red
        RGBColor(50, 90, 220),  // Bright blue
        RGBColor(50, 180, 50),  // Bright green
    ];

    let mut chart = ChartBuilder::on(&root)
        .caption("Collisions by Scenario and Probe Strategy", ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..Scenario::ALL.len() - 1, 0.0..y_max)?;

    let x_labels: Vec<&str> = Scenario::ALL.iter().map(|scenario| scenario.label()).collect();

    chart
        .configure_mesh()
        .x_labels(Scenario::ALL.len())
        .x_label_formatter(&|x| {
            if *x < x_labels.len() { x_labels[*x].to_string() } else { String::new() }
        })
        .x_desc("Scenario")
        .y_desc("Collision Count (n = 1024)")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for (index, (strategy, counts)) in series.iter().enumerate() {
        let color = colors[index % colors.len()];
        let line_style = ShapeStyle::from(&color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(
                counts.iter().enumerate().map(|(x, &count)| (x, count as f64)),
                line_style,
            ))?
            .label(strategy.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            counts
                .iter()
                .enumerate()
                .map(|(x, &count)| Circle::new((x, count as f64), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("Running probe table measurements with CSV export...");
    println!("Scenarios: {:?}", Scenario::ALL.map(Scenario::label));
    println!("Strategies: {:?}", ProbeStrategy::ALL.map(ProbeStrategy::label));

    let mut log = LatencyLog::create(LOG_PATH)?;
    let mut collision_series: Vec<(ProbeStrategy, Vec<usize>)> =
        ProbeStrategy::ALL.iter().map(|&strategy| (strategy, Vec::new())).collect();

    for scenario in Scenario::ALL {
        for strategy in ProbeStrategy::ALL {
            for n in BATCH_SIZES {
                let keys = scenario.keys(n);
                run_table_batches(&mut log, scenario, strategy, n, &keys)?;

                if n == CHART_BATCH {
                    let table = populated_table(strategy, &keys);
                    println!(
                        "  {}/{} (n = {}): collisions = {}, entries = {}, capacity = {}, load factor = {:.3}",
                        scenario.label(),
                        strategy.label(),
                        n,
                        table.collision_count(),
                        table.len(),
                        table.capacity(),
                        table.load_factor()
                    );

                    if let Some((_, counts)) =
                        collision_series.iter_mut().find(|(s, _)| *s == strategy)
                    {
                        counts.push(table.collision_count());
                    }
                }
            }
        }

        let keys = scenario.keys(CHART_BATCH);
        run_reference_batches(&mut log, scenario, &keys)?;
    }

    log.flush()?;
    render_collision_chart(&collision_series)?;

    println!("Latency samples written to {LOG_PATH}");
    println!("Collision chart written to {CHART_PATH}");
    Ok(())
}
