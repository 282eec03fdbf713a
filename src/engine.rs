//! Scan orchestration
//!
//! Binarize, then for every enabled symbology locate candidates, sample and
//! decode them. Symbologies left empty-handed are retried on a wider window.
//! Candidate failures are logged and dropped; nothing short of a malformed
//! input buffer ever fails a scan.

use log::{debug, trace};
use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::decoder::decoder_for;
use crate::detector::locate;
use crate::models::{BitMatrix, DecodedSymbol, PixelBuffer, SymbologyType};
use crate::sampler::sample;
use crate::utils::binarization::adaptive_binarize;

/// Reusable, thread-safe scanner
#[derive(Debug, Clone, Default)]
pub struct ScanEngine {
    config: ScanConfig,
}

impl ScanEngine {
    /// Engine with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Decode every symbol in `image`
    ///
    /// Results are grouped by symbology, then ordered by the top edge of their
    /// bounding box, then by discovery. Each `(data, symbology)` pair appears
    /// once, with the bounding box of its first sighting.
    ///
    /// Symbologies that decode nothing are retried on wider binarizer windows,
    /// which keeps large modules from thresholding hollow.
    pub fn scan(&self, image: &PixelBuffer<'_>) -> Vec<DecodedSymbol> {
        if image.width() == 0 || image.height() == 0 || self.config.symbologies.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<(SymbologyType, Vec<DecodedSymbol>)> = Vec::new();
        let mut pending: Vec<SymbologyType> = self.config.symbologies.iter().collect();
        let ladder = self.config.binarizer.window_ladder(image.width(), image.height());

        for binarizer in &ladder {
            let binary = adaptive_binarize(image, binarizer);
            let results = self.scan_pending(&binary, &pending);
            for (symbology, symbols) in pending.iter().copied().zip(results) {
                if !symbols.is_empty() {
                    found.push((symbology, symbols));
                }
            }
            pending.retain(|s| !found.iter().any(|(done, _)| done == s));
            if pending.is_empty() {
                break;
            }
            trace!(
                "window {}: {} symbologies without results",
                binarizer.window,
                pending.len()
            );
        }

        found.sort_by_key(|(symbology, _)| *symbology);
        found.into_iter().flat_map(|(_, symbols)| symbols).collect()
    }

    fn scan_pending(&self, binary: &BitMatrix, pending: &[SymbologyType]) -> Vec<Vec<DecodedSymbol>> {
        if self.config.parallel {
            pending
                .par_iter()
                .map(|&symbology| scan_symbology(binary, symbology))
                .collect()
        } else {
            pending
                .iter()
                .map(|&symbology| scan_symbology(binary, symbology))
                .collect()
        }
    }
}

fn scan_symbology(binary: &BitMatrix, symbology: SymbologyType) -> Vec<DecodedSymbol> {
    let decoder = decoder_for(symbology);
    let mut found: Vec<DecodedSymbol> = Vec::new();
    let mut candidates = 0usize;

    for (index, candidate) in locate(binary, symbology).enumerate() {
        candidates += 1;
        let decoded = sample(binary, &candidate).and_then(|raw| decoder.decode(&raw));
        match decoded {
            Ok(symbol) if found.iter().any(|s| s.data == symbol.data) => {
                trace!("{symbology} candidate {index}: duplicate of an earlier symbol");
            }
            Ok(symbol) => found.push(symbol.with_bounding_box(candidate.bounding_box())),
            Err(err) => debug!("{symbology} candidate {index} dropped: {err}"),
        }
    }

    found.sort_by(|a, b| top(a).total_cmp(&top(b)));
    debug!(
        "{symbology}: {} symbols from {candidates} candidates",
        found.len()
    );
    found
}

fn top(symbol: &DecodedSymbol) -> f32 {
    symbol.bounding_box.map_or(f32::INFINITY, |b| b.top())
}
