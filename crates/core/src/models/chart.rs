use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::coin::Coin;

/// Line colors assigned to chart series in creation order (CSS hex).
/// Deterministic by index, so the same pin order always renders the same way.
const SERIES_PALETTE: [&str; 10] = [
    "#E6194B", "#3CB44B", "#4363D8", "#F58231", "#911EB4",
    "#46F0F0", "#F032E6", "#BCF60C", "#008080", "#9A6324",
];

/// One line on the live chart: a coin's recent prices inside the rolling
/// window, plus the legend label and color the view should draw it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Legend label — the coin's display name
    pub label: String,

    /// Line color, assigned once when the series is created
    pub color: String,

    points: VecDeque<f64>,
}

impl ChartSeries {
    fn new(label: String, index: usize) -> Self {
        Self {
            label,
            color: SERIES_PALETTE[index % SERIES_PALETTE.len()].to_string(),
            points: VecDeque::new(),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The bounded in-memory price window behind the live chart.
///
/// Holds one shared row of timestamp labels plus one `ChartSeries` per
/// pinned coin, all index-aligned: the sample at position `i` of every
/// series was taken at the time described by label `i`. Once the window
/// size is exceeded, the oldest sample (and label) falls off — the window
/// slides by one per tick.
///
/// Lives only for the duration of one report-view session; it is never
/// persisted.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    window: usize,
    labels: VecDeque<String>,
    series: Vec<ChartSeries>,
}

impl RollingHistory {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            labels: VecDeque::new(),
            series: Vec::new(),
        }
    }

    /// Record one poll tick: `quotes` in request order, one sample each.
    ///
    /// Series are matched to quotes by position. A quote at an index with
    /// no series yet gets a fresh series named after the coin, with the
    /// next palette color. This positional mapping relies on the upstream
    /// API preserving requested id order.
    pub fn record(&mut self, label: String, quotes: &[Coin]) {
        for (index, coin) in quotes.iter().enumerate() {
            if self.series.len() <= index {
                self.series.push(ChartSeries::new(coin.name.clone(), index));
            }
            let series = &mut self.series[index];
            series.points.push_back(coin.current_price);
            if series.points.len() > self.window {
                series.points.pop_front();
            }
        }

        self.labels.push_back(label);
        if self.labels.len() > self.window {
            self.labels.pop_front();
        }
    }

    /// Discard all labels and series. Called when the pinned set becomes
    /// empty mid-session.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.series.clear();
    }

    /// Number of ticks currently inside the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    /// Copy the current window into plain render data for the view layer.
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            labels: self.labels.iter().cloned().collect(),
            series: self
                .series
                .iter()
                .map(|s| SeriesSnapshot {
                    label: s.label.clone(),
                    color: s.color.clone(),
                    points: s.points.iter().copied().collect(),
                })
                .collect(),
        }
    }
}

/// Plain-data copy of the rolling window, handed to the view for redraw.
/// The view owns no state — it renders exactly what it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    /// Time-of-day labels, oldest first
    pub labels: Vec<String>,

    /// One entry per pinned coin, in pin order
    pub series: Vec<SeriesSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub label: String,
    pub color: String,
    pub points: Vec<f64>,
}
