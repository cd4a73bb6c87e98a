//! Depth/time polyline of a planned dive for plotting.

use serde::Serialize;

use crate::deco::tables::ASCENT_RATE;
use crate::deco::DecompressionStop;

/// Descent speed assumed for the chart, meters per minute.
const CHART_DESCENT_RATE: f64 = 20.0;

/// One vertex of the dive chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Elapsed time formatted as `m:ss`
    pub time: String,
    /// Meters
    pub depth: f64,
    #[serde(skip)]
    pub elapsed_seconds: u64,
}

/// Ordered chart vertices from surface to surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiveChart {
    pub points: Vec<ChartPoint>,
}

impl DiveChart {
    /// Elapsed time at the last point, in seconds.
    pub fn runtime_seconds(&self) -> u64 {
        self.points.last().map_or(0, |p| p.elapsed_seconds)
    }
}

fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Whole seconds to travel `distance` meters at `rate` m/min.
fn travel_seconds(distance: f64, rate: f64) -> u64 {
    (distance.abs() / rate * 60.0) as u64
}

struct ChartBuilder {
    points: Vec<ChartPoint>,
    elapsed: u64,
}

impl ChartBuilder {
    fn new() -> Self {
        let mut builder = Self {
            points: Vec::new(),
            elapsed: 0,
        };
        builder.mark(0.0);
        builder
    }

    fn mark(&mut self, depth: f64) {
        self.points.push(ChartPoint {
            time: format_elapsed(self.elapsed),
            depth,
            elapsed_seconds: self.elapsed,
        });
    }

    fn current_depth(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.depth)
    }

    fn travel_to(&mut self, depth: f64, rate: f64) {
        self.elapsed += travel_seconds(self.current_depth() - depth, rate);
        self.mark(depth);
    }

    fn hold(&mut self, minutes: u32) {
        let depth = self.current_depth();
        self.elapsed += u64::from(minutes) * 60;
        self.mark(depth);
    }
}

/// Build the chart for a dive, visiting `stops` in the order given.
pub fn build_chart(max_depth: f64, bottom_time: u32, stops: &[DecompressionStop]) -> DiveChart {
    let mut chart = ChartBuilder::new();

    chart.travel_to(max_depth, CHART_DESCENT_RATE);
    chart.hold(bottom_time);

    for stop in stops {
        chart.travel_to(stop.depth, ASCENT_RATE);
        chart.hold(stop.duration);
    }

    chart.travel_to(0.0, ASCENT_RATE);

    DiveChart {
        points: chart.points,
    }
}
