use crate::model::{Measurement, WeatherDataset};

/// Aggregates over one dataset. Always recomputed from the dataset that
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub highest: f64,
    pub lowest: Option<f64>,
    pub average: Option<f64>,
    pub range: Option<f64>,
    pub highest_apparent: Option<f64>,
    pub days: usize,
}

impl DerivedStats {
    /// `None` when the max-temperature series has no values.
    pub fn compute(dataset: &WeatherDataset) -> Option<Self> {
        let series = |m: Measurement| dataset.daily.values(m).iter().flatten().copied();

        let highest = series(Measurement::TemperatureMax).reduce(f64::max)?;
        let lowest = series(Measurement::TemperatureMin).reduce(f64::min);
        let highest_apparent = series(Measurement::ApparentMax).reduce(f64::max);

        let (sum, count) = series(Measurement::TemperatureMean)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        let average = (count > 0).then(|| sum / count as f64);

        Some(Self {
            highest,
            lowest,
            average,
            range: lowest.map(|low| highest - low),
            highest_apparent,
            days: dataset.day_count(),
        })
    }

    /// Summary cards in display order.
    pub fn cards(&self, dataset: &WeatherDataset) -> Vec<StatCard> {
        let units = &dataset.daily_units;
        let fmt = |value: Option<f64>, m: Measurement| match value {
            Some(v) => format!("{v:.1}{}", units.unit(m)),
            None => "N/A".to_string(),
        };

        vec![
            StatCard {
                title: "Highest Temperature",
                value: fmt(Some(self.highest), Measurement::TemperatureMax),
                note: None,
            },
            StatCard {
                title: "Lowest Temperature",
                value: fmt(self.lowest, Measurement::TemperatureMin),
                note: None,
            },
            StatCard {
                title: "Average Temperature",
                value: fmt(self.average, Measurement::TemperatureMean),
                note: None,
            },
            StatCard {
                title: "Temperature Range",
                value: fmt(self.range, Measurement::TemperatureMax),
                note: Some(format!("{} days analyzed", self.days)),
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub note: Option<String>,
}
