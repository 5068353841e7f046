//! Volume-spike detection over a fixed watchlist
//!
//! Independent of news and social evidence: for each watched symbol the
//! latest daily volume is compared with the mean of the preceding days in a
//! short trailing window.

use crate::config::VolumeSpikeSettings;
use crate::market::VolumeHistory;
use crate::symbols::Symbol;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub use crate::market::VolumeObservation;

/// `latest / mean(all but latest)`
///
/// `None` when there are fewer than two observations or the prior mean is
/// zero; such a window is never a spike.
pub fn volume_ratio(observations: &[VolumeObservation]) -> Option<f64> {
    let (latest, prior) = observations.split_last()?;
    if prior.is_empty() {
        return None;
    }

    let mean = prior.iter().map(|o| o.volume as f64).sum::<f64>() / prior.len() as f64;
    if mean <= 0.0 {
        return None;
    }
    Some(latest.volume as f64 / mean)
}

/// The trailing `capacity` observations for one symbol, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeWindow {
    capacity: usize,
    observations: Vec<VolumeObservation>,
}

impl VolumeWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            observations: Vec::with_capacity(capacity),
        }
    }

    /// Keep the last `capacity` of `observations`
    pub fn from_observations(
        capacity: usize,
        observations: impl IntoIterator<Item = VolumeObservation>,
    ) -> Self {
        let mut window = Self::new(capacity);
        for observation in observations {
            window.push(observation);
        }
        window
    }

    /// Append the newest observation, evicting the oldest when full
    pub fn push(&mut self, observation: VolumeObservation) {
        if self.capacity == 0 {
            return;
        }
        if self.observations.len() == self.capacity {
            self.observations.remove(0);
        }
        self.observations.push(observation);
    }

    pub fn observations(&self) -> &[VolumeObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&VolumeObservation> {
        self.observations.last()
    }

    pub fn ratio(&self) -> Option<f64> {
        volume_ratio(&self.observations)
    }

    /// Close-to-close change between the last two observations
    pub fn price_change(&self) -> Option<f64> {
        match self.observations.as_slice() {
            [.., prior, latest] => Some(latest.close - prior.close),
            _ => None,
        }
    }
}

/// A flagged symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSpike {
    pub symbol: Symbol,
    pub price: f64,
    pub volume_ratio: f64,
    pub price_change: f64,
    pub current_volume: u64,
    pub average_volume: f64,
}

/// Why a watched symbol produced no ratio
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum VolumeSkipReason {
    FetchFailed(String),
    TooFewObservations(usize),
    ZeroBaseline,
}

impl fmt::Display for VolumeSkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeSkipReason::FetchFailed(msg) => write!(f, "fetch failed: {msg}"),
            VolumeSkipReason::TooFewObservations(n) => write!(f, "only {n} observation(s)"),
            VolumeSkipReason::ZeroBaseline => f.write_str("no prior volume"),
        }
    }
}

/// Result of scanning the watchlist
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeScan {
    /// Flagged symbols, highest ratio first, at most `top_n`
    pub spikes: Vec<VolumeSpike>,
    pub skipped: Vec<(Symbol, VolumeSkipReason)>,
    pub scanned: usize,
}

/// Scans the watchlist for unusual volume
pub struct VolumeSpikeDetector {
    history: Arc<dyn VolumeHistory>,
    settings: VolumeSpikeSettings,
}

impl VolumeSpikeDetector {
    pub fn new(history: Arc<dyn VolumeHistory>, settings: VolumeSpikeSettings) -> Self {
        Self { history, settings }
    }

    pub fn settings(&self) -> &VolumeSpikeSettings {
        &self.settings
    }

    /// Evaluate one window against the threshold
    pub fn evaluate(
        &self,
        symbol: &Symbol,
        window: &VolumeWindow,
    ) -> Result<Option<VolumeSpike>, VolumeSkipReason> {
        if window.len() < 2 {
            return Err(VolumeSkipReason::TooFewObservations(window.len()));
        }
        let ratio = window.ratio().ok_or(VolumeSkipReason::ZeroBaseline)?;
        if ratio <= self.settings.ratio_threshold {
            return Ok(None);
        }

        let (latest, prior) = window
            .observations()
            .split_last()
            .ok_or(VolumeSkipReason::TooFewObservations(0))?;
        let average_volume = latest.volume as f64 / ratio;
        debug!(%symbol, ratio, prior = prior.len(), "Volume spike");

        Ok(Some(VolumeSpike {
            symbol: symbol.clone(),
            price: latest.close,
            volume_ratio: ratio,
            price_change: window.price_change().unwrap_or(0.0),
            current_volume: latest.volume,
            average_volume,
        }))
    }

    /// Fetch and evaluate every watched symbol
    pub async fn scan(&self) -> VolumeScan {
        let mut scan = VolumeScan::default();

        for symbol in &self.settings.watchlist {
            scan.scanned += 1;

            let observations = match self
                .history
                .trailing_window(symbol, self.settings.window)
                .await
            {
                Ok(observations) => observations,
                Err(e) => {
                    warn!(%symbol, error = %e, "Volume history unavailable");
                    scan.skipped
                        .push((symbol.clone(), VolumeSkipReason::FetchFailed(e.to_string())));
                    continue;
                }
            };

            let window = VolumeWindow::from_observations(self.settings.window, observations);
            match self.evaluate(symbol, &window) {
                Ok(Some(spike)) => scan.spikes.push(spike),
                Ok(None) => {}
                Err(reason) => scan.skipped.push((symbol.clone(), reason)),
            }
        }

        scan.spikes
            .sort_by(|a, b| b.volume_ratio.total_cmp(&a.volume_ratio));
        scan.spikes.truncate(self.settings.top_n);
        scan
    }
}
