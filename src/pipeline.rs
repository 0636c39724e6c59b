//! Scan state machine
//!
//! One scan walks `Idle → ScoringRegions → DecodingRegions →
//! (Success | ZoomRetrying) → Done`. Every transition goes through
//! [`ScanMachine::step`], one region or one zoom level per step, so the
//! region/mode/zoom ordering lives in a single match and cancellation is
//! checked between units of work.

use crate::config::ScanOptions;
use crate::decoder::Decoder;
use crate::decoder::adapter::DecodeAdapter;
use crate::decoder::mapper::ResultMapper;
use crate::detector::planner::RegionPlanner;
use crate::detector::scoring::{ContrastCheck, EdgeDensityScorer};
use crate::detector::zoom::{ZoomLevel, ZoomRetryController};
use crate::error::LocatorError;
use crate::models::{GlobalMatch, PixelBuffer, PixelSource, ScanOutcome, ScoredRegion};

/// Coarse phase of a scan, recorded in [`ScanReport::phases`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanPhase {
    /// Not started
    Idle,
    /// Page contrast check and region scoring
    ScoringRegions,
    /// Decoding worth-decoding regions at native scale
    DecodingRegions,
    /// Full-frame decoding of rescaled pages
    ZoomRetrying,
    /// A symbol was decoded and mapped
    Success,
    /// Terminal
    Done,
}

/// Counters collected during one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Dark-pixel ratio of the coarse page check
    pub dark_ratio: f32,
    /// True when the page failed the contrast check
    pub low_contrast: bool,
    /// Regions produced by the planner
    pub regions_planned: usize,
    /// Regions whose pixels could not be read
    pub regions_rejected: usize,
    /// Regions above the edge density threshold
    pub regions_worth_decoding: usize,
    /// Scored regions, in planner order
    pub scored: Vec<ScoredRegion>,
    /// Calls into the decode primitive
    pub decode_calls: usize,
    /// Calls that failed or panicked
    pub decode_errors: usize,
    /// Zoom passes attempted
    pub zoom_levels_tried: usize,
    /// Phases visited, in order, without repeats
    pub phases: Vec<ScanPhase>,
}

impl ScanReport {
    fn enter(&mut self, phase: ScanPhase) {
        if self.phases.last() != Some(&phase) {
            self.phases.push(phase);
        }
    }

    /// Whether the scan reached the zoom retry pass
    pub fn reached_zoom(&self) -> bool {
        self.phases.contains(&ScanPhase::ZoomRetrying)
    }
}

#[derive(Debug)]
enum ScanState {
    Idle,
    ScoringRegions,
    DecodingRegions { next: usize },
    ZoomRetrying { next: usize },
    Success(GlobalMatch),
    Done(ScanOutcome),
}

impl ScanState {
    fn phase(&self) -> ScanPhase {
        match self {
            ScanState::Idle => ScanPhase::Idle,
            ScanState::ScoringRegions => ScanPhase::ScoringRegions,
            ScanState::DecodingRegions { .. } => ScanPhase::DecodingRegions,
            ScanState::ZoomRetrying { .. } => ScanPhase::ZoomRetrying,
            ScanState::Success(_) => ScanPhase::Success,
            ScanState::Done(_) => ScanPhase::Done,
        }
    }
}

struct Candidate {
    scored: ScoredRegion,
    window: PixelBuffer,
}

struct ScanMachine<'a, S: ?Sized, D: ?Sized> {
    source: &'a S,
    page: &'a PixelBuffer,
    options: &'a ScanOptions,
    adapter: DecodeAdapter<'a, D>,
    candidates: Vec<Candidate>,
    zoom_plan: Vec<ZoomLevel>,
    report: ScanReport,
}

impl<'a, S, D> ScanMachine<'a, S, D>
where
    S: PixelSource + ?Sized,
    D: Decoder + ?Sized,
{
    fn step(&mut self, state: ScanState) -> Result<ScanState, LocatorError> {
        let next = match state {
            ScanState::Idle => ScanState::ScoringRegions,
            ScanState::ScoringRegions => self.score_regions()?,
            ScanState::DecodingRegions { next } => self.decode_region(next)?,
            ScanState::ZoomRetrying { next } => self.zoom_level(next)?,
            ScanState::Success(found) => {
                tracing::info!(
                    region = %found.source_region_label,
                    zoom = found.zoom_factor,
                    "QR code located"
                );
                ScanState::Done(ScanOutcome::Match(found))
            }
            ScanState::Done(outcome) => ScanState::Done(outcome),
        };
        self.report.enter(next.phase());
        Ok(next)
    }

    fn score_regions(&mut self) -> Result<ScanState, LocatorError> {
        let verdict = ContrastCheck::from_options(self.options).evaluate(self.page);
        self.report.dark_ratio = verdict.dark_ratio;
        if !verdict.has_contrast {
            self.report.low_contrast = true;
            tracing::info!(
                dark_ratio = verdict.dark_ratio,
                "page is blank or low contrast, skipping"
            );
            return Ok(ScanState::Done(ScanOutcome::NotFound));
        }

        let scorer = EdgeDensityScorer::from_options(self.options);
        let (width, height) = (self.page.width(), self.page.height());
        let plan = RegionPlanner::plan(width, height);
        self.report.regions_planned = plan.len();

        for region in plan {
            if self.options.is_cancelled() {
                return Err(LocatorError::Cancelled);
            }
            if !region.fits_within(width, height) {
                self.report.regions_rejected += 1;
                tracing::warn!(region = %region, "region outside page, rejected");
                continue;
            }
            let window = match self.source.read_region(&region) {
                Ok(window) => window,
                Err(err) => {
                    self.report.regions_rejected += 1;
                    tracing::warn!(region = %region.label, "cannot read region: {}", err);
                    continue;
                }
            };
            let scored = scorer.score(region, &window);
            tracing::debug!(
                region = %scored.region,
                edge_density = scored.edge_density,
                worth_decoding = scored.worth_decoding,
                "region scored"
            );
            self.report.scored.push(scored.clone());
            if scored.worth_decoding {
                self.report.regions_worth_decoding += 1;
                self.candidates.push(Candidate { scored, window });
            }
        }
        Ok(ScanState::DecodingRegions { next: 0 })
    }

    fn decode_region(&mut self, index: usize) -> Result<ScanState, LocatorError> {
        let Some(candidate) = self.candidates.get(index) else {
            self.zoom_plan = ZoomRetryController::new(
                self.options.zoom_levels.clone(),
                self.options.max_zoom_dim,
            )
            .schedule(self.page.width(), self.page.height());
            return Ok(ScanState::ZoomRetrying { next: 0 });
        };

        let attempt = self.adapter.decode_window(
            &candidate.window,
            &candidate.scored.region,
            1.0,
            self.options.cancel.as_ref(),
        )?;
        self.sync_counters();
        match attempt.and_then(|a| ResultMapper::map(a, 1.0)) {
            Some(found) => Ok(ScanState::Success(found)),
            None => Ok(ScanState::DecodingRegions { next: index + 1 }),
        }
    }

    fn zoom_level(&mut self, index: usize) -> Result<ScanState, LocatorError> {
        let Some(level) = self.zoom_plan.get(index).copied() else {
            tracing::info!(
                decode_calls = self.report.decode_calls,
                "no QR code found"
            );
            return Ok(ScanState::Done(ScanOutcome::NotFound));
        };

        self.report.zoom_levels_tried += 1;
        tracing::debug!(
            zoom = level.factor,
            width = level.width,
            height = level.height,
            "zoom retry"
        );
        let found = ZoomRetryController::attempt_level(
            self.page,
            &level,
            &mut self.adapter,
            self.options.cancel.as_ref(),
        )?;
        self.sync_counters();
        match found {
            Some(found) => Ok(ScanState::Success(found)),
            None => Ok(ScanState::ZoomRetrying { next: index + 1 }),
        }
    }

    fn sync_counters(&mut self) {
        self.report.decode_calls = self.adapter.calls();
        self.report.decode_errors = self.adapter.errors();
    }
}

/// Run a full scan of `page`, reading region pixels through `source`
///
/// `page` must be the full-page read of `source`; it feeds the contrast check
/// and the zoom passes.
pub(crate) fn run_scan<S, D>(
    source: &S,
    page: &PixelBuffer,
    decoder: &D,
    options: &ScanOptions,
) -> (Result<ScanOutcome, LocatorError>, ScanReport)
where
    S: PixelSource + ?Sized,
    D: Decoder + ?Sized,
{
    let mut machine = ScanMachine {
        source,
        page,
        options,
        adapter: DecodeAdapter::new(decoder),
        candidates: Vec::new(),
        zoom_plan: Vec::new(),
        report: ScanReport::default(),
    };
    machine.report.enter(ScanPhase::Idle);

    let mut state = ScanState::Idle;
    let result = loop {
        if let ScanState::Done(outcome) = state {
            break Ok(outcome);
        }
        if options.is_cancelled() {
            break Err(LocatorError::Cancelled);
        }
        match machine.step(state) {
            Ok(next) => state = next,
            Err(err) => break Err(err),
        }
    };
    machine.sync_counters();
    (result, machine.report)
}
