use super::PipelineParams;
use crate::custody::{ProvenanceRecord, ProvenanceService, RecordMetadata};
use crate::diagnostics::{FailureStage, QueryReport, Stopwatch, TimingBreakdown, ViewFailure};
use crate::error::{Error, Result, Service};
use crate::image::Raster;
use crate::mesh::{Mesh, MeshHandle};
use crate::pose::{PoseCanonicalizer, PrincipalFrame};
use crate::render::{with_retry, SceneRenderer, SharedRenderer};
use crate::scoring::{NeighborHit, ScoreAggregator};
use crate::signature::{ImageMetadata, SignatureId, SignatureMatcher};
use crate::views::{plan_views, PlannedView, ViewPlan, ViewStrategy};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;

/// A model to identify: its renderer handle and its loaded geometry.
#[derive(Clone, Debug)]
pub struct ModelInput {
    pub handle: MeshHandle,
    pub mesh: Mesh,
}

impl ModelInput {
    pub fn new(handle: MeshHandle, mesh: Mesh) -> Self {
        Self { handle, mesh }
    }
}

/// Outcome of registering a new model.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub model_id: String,
    pub record: ProvenanceRecord,
    /// Ingested signatures in plan order.
    pub signatures: Vec<SignatureId>,
    pub failures: Vec<ViewFailure>,
    pub timing: TimingBreakdown,
}

/// Identification pipeline over a renderer, a signature index and a
/// provenance service.
pub struct Match3d<R: SceneRenderer, M: SignatureMatcher, P: ProvenanceService> {
    params: PipelineParams,
    canonicalizer: PoseCanonicalizer,
    aggregator: ScoreAggregator,
    renderers: Vec<SharedRenderer<R>>,
    matcher: M,
    provenance: P,
    registered: Mutex<HashSet<String>>,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl<R, M, P> Match3d<R, M, P>
where
    R: SceneRenderer,
    M: SignatureMatcher,
    P: ProvenanceService,
{
    pub fn new(params: PipelineParams, renderer: R, matcher: M, provenance: P) -> Result<Self> {
        Self::with_renderers(params, vec![renderer], matcher, provenance)
    }

    /// One renderer slot per entry; workers map onto slots round-robin.
    pub fn with_renderers(
        params: PipelineParams,
        renderers: Vec<R>,
        matcher: M,
        provenance: P,
    ) -> Result<Self> {
        if renderers.is_empty() {
            return Err(Error::Config("at least one renderer is required".into()));
        }
        if params.workers == 0 {
            return Err(Error::Config("workers must be positive".into()));
        }
        params.aggregator.validate()?;
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.workers)
            .thread_name(|i| format!("match3d-worker-{i}"))
            .build()
            .map_err(|e| Error::Config(format!("failed to build worker pool: {e}")))?;

        Ok(Self {
            canonicalizer: PoseCanonicalizer::new(params.pose.clone()),
            aggregator: ScoreAggregator::new(params.aggregator.clone()),
            renderers: renderers.into_iter().map(SharedRenderer::new).collect(),
            matcher,
            provenance,
            registered: Mutex::new(HashSet::new()),
            #[cfg(feature = "parallel")]
            pool,
            params,
        })
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    pub fn provenance(&self) -> &P {
        &self.provenance
    }

    pub fn is_registered(&self, model_id: &str) -> bool {
        self.registered.lock().contains(model_id)
    }

    /// Render and ingest every planned view of a model not seen before.
    ///
    /// Returns `Ok(None)` without side effects when `model_id` is already
    /// registered.
    pub fn register(
        &self,
        handle: &MeshHandle,
        mesh: &Mesh,
        origin: Option<&str>,
    ) -> Result<Option<Registration>> {
        if !self.registered.lock().insert(handle.model_id.clone()) {
            debug!("register: {} already registered", handle.model_id);
            return Ok(None);
        }
        let outcome = self.install(|| self.register_new(handle, mesh, origin));
        if outcome.is_err() {
            self.registered.lock().remove(&handle.model_id);
        }
        outcome.map(Some)
    }

    /// Rank known models by similarity to `mesh`.
    pub fn identify(&self, handle: &MeshHandle, mesh: &Mesh) -> Result<QueryReport> {
        self.install(|| self.identify_in_pool(handle, mesh))
    }

    /// [`identify`](Self::identify) every model on the worker pool.
    ///
    /// Per-model failures (degenerate meshes, bad plans) are logged and
    /// returned in place; they never abort the batch.
    pub fn identify_all(&self, models: &[ModelInput]) -> Vec<Result<QueryReport>> {
        self.install(|| {
            self.par_map(models, |m| {
                let outcome = self.identify_in_pool(&m.handle, &m.mesh);
                if let Err(err) = &outcome {
                    warn!("identify_all: skipping {}: {err}", m.handle.model_id);
                }
                outcome
            })
        })
    }

    fn register_new(
        &self,
        handle: &MeshHandle,
        mesh: &Mesh,
        origin: Option<&str>,
    ) -> Result<Registration> {
        let mut watch = Stopwatch::start();
        let (_, plan) = self.prepare(mesh, &mut watch)?;

        let metadata = RecordMetadata {
            title: handle.model_id.clone(),
            file_url: handle.path.display().to_string(),
            owner: None,
        };
        let label = format!("record {}", handle.model_id);
        let (record, _) = with_retry(&self.params.retry, Service::Provenance, &label, || {
            self.provenance.create_record(&metadata)
        })
        .map_err(|(err, _)| err)?;
        watch.lap("record");

        let (rasters, mut failures) = self.produce_views(handle, &plan);
        watch.lap("render");

        let mut signatures = Vec::with_capacity(plan.len());
        for view in &plan.views {
            let Some(raster) = rasters[view.index].as_ref() else {
                continue;
            };
            let meta = ImageMetadata {
                model_id: handle.model_id.clone(),
                view: view.spec.stem(),
                piece_id: Some(record.piece_id.clone()),
                piece_url: Some(record.url.clone()),
                origin: origin.map(str::to_string),
            };
            let label = format!("ingest {}:{}", handle.model_id, meta.view);
            match with_retry(&self.params.retry, Service::SignatureMatcher, &label, || {
                self.matcher.ingest(raster, meta.clone())
            }) {
                Ok((id, _)) => signatures.push(id),
                Err((err, attempts)) => {
                    failures.push(view_failure(view, FailureStage::Ingest, attempts, &err))
                }
            }
        }
        watch.lap("ingest");
        failures.sort_by_key(|f| f.index);

        if signatures.is_empty() && !plan.views.is_empty() {
            let service = if failures.iter().any(|f| f.stage == FailureStage::Ingest) {
                Service::SignatureMatcher
            } else {
                Service::Renderer
            };
            warn!(
                "register {}: all {} views lost; piece {} left without signatures",
                handle.model_id,
                plan.len(),
                record.piece_id
            );
            return Err(Error::external(
                service,
                format!(
                    "no view of {} could be indexed ({} failures)",
                    handle.model_id,
                    failures.len()
                ),
            ));
        }

        info!(
            "register {}: piece {} with {} views ({} failed)",
            handle.model_id,
            record.piece_id,
            signatures.len(),
            failures.len()
        );
        Ok(Registration {
            model_id: handle.model_id.clone(),
            record,
            signatures,
            failures,
            timing: watch.finish(),
        })
    }

    fn identify_in_pool(&self, handle: &MeshHandle, mesh: &Mesh) -> Result<QueryReport> {
        let mut watch = Stopwatch::start();
        let (frame, plan) = self.prepare(mesh, &mut watch)?;

        let (rasters, mut failures) = self.produce_views(handle, &plan);
        watch.lap("render");

        let jobs: Vec<(&PlannedView, &Raster)> = plan
            .views
            .iter()
            .filter_map(|v| rasters[v.index].as_ref().map(|r| (v, r)))
            .collect();
        let outcomes = self.par_map(&jobs, |&(view, raster)| {
            self.search_view(&handle.model_id, view, raster)
        });
        let mut lists = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(hits) => lists.push(hits),
                Err(failure) => failures.push(failure),
            }
        }
        watch.lap("search");

        let scores = self.aggregator.aggregate(&lists);
        let ranking = scores.ranked_ids();
        watch.lap("aggregate");
        failures.sort_by_key(|f| f.index);

        info!(
            "identify {}: {} views searched, {} failed, best={:?}",
            handle.model_id,
            lists.len(),
            failures.len(),
            ranking.first()
        );
        Ok(QueryReport {
            model_id: handle.model_id.clone(),
            frame,
            scores,
            ranking,
            audit: plan.audit(),
            failures,
            timing: watch.finish(),
        })
    }

    fn prepare(&self, mesh: &Mesh, watch: &mut Stopwatch) -> Result<(PrincipalFrame, ViewPlan)> {
        let frame = self.canonicalizer.canonicalize(mesh)?;
        watch.lap("canonicalize");
        let plan = plan_views(&frame, &self.params.view_plan)?;
        watch.lap("plan");
        Ok((frame, plan))
    }

    /// Rasters for every planned view, indexed like the plan; lost views are
    /// `None` and reported.
    fn produce_views(
        &self,
        handle: &MeshHandle,
        plan: &ViewPlan,
    ) -> (Vec<Option<Raster>>, Vec<ViewFailure>) {
        let mut rasters: Vec<Option<Raster>> = (0..plan.len()).map(|_| None).collect();
        let mut failures = Vec::new();
        let retry = &self.params.retry;
        let rendered = plan
            .views
            .iter()
            .filter(|v| v.strategy == ViewStrategy::Rendered);

        let renderer = self.renderer();
        let label = format!("load {}", handle.model_id);
        match with_retry(retry, Service::Renderer, &label, move || {
            renderer.session(handle)
        }) {
            Ok((mut session, _)) => {
                for view in rendered {
                    let label = format!("render {}:{}", handle.model_id, view.spec.stem());
                    match with_retry(retry, Service::Renderer, &label, || {
                        session.render(&view.pose, plan.resolution)
                    }) {
                        Ok((raster, _)) => rasters[view.index] = Some(raster),
                        Err((err, attempts)) => {
                            failures.push(view_failure(view, FailureStage::Render, attempts, &err))
                        }
                    }
                }
            }
            Err((err, attempts)) => {
                warn!("{label}: giving up after {attempts} attempts: {err}");
                for view in rendered {
                    failures.push(view_failure(view, FailureStage::Render, attempts, &err));
                }
            }
        }

        for view in &plan.views {
            let Some(base) = view.strategy.base() else {
                continue;
            };
            let derived = rasters[base].as_ref().and_then(|b| view.strategy.derive(b));
            match derived {
                Some(raster) => rasters[view.index] = Some(raster),
                None => failures.push(ViewFailure {
                    index: view.index,
                    stem: view.spec.stem(),
                    stage: FailureStage::Derive,
                    attempts: 0,
                    message: format!("base view {base} is unavailable"),
                }),
            }
        }
        (rasters, failures)
    }

    fn search_view(
        &self,
        model_id: &str,
        view: &PlannedView,
        raster: &Raster,
    ) -> std::result::Result<Vec<NeighborHit>, ViewFailure> {
        let label = format!("search {model_id}:{}", view.spec.stem());
        let (matches, _) = with_retry(&self.params.retry, Service::SignatureMatcher, &label, || {
            self.matcher.search(raster, self.params.distance_cutoff)
        })
        .map_err(|(err, attempts)| view_failure(view, FailureStage::Search, attempts, &err))?;

        Ok(matches
            .into_iter()
            .filter_map(|m| match self.matcher.model_of(m.signature_id) {
                Some(model) => Some(NeighborHit::new(model, m.distance)),
                None => {
                    debug!("{label}: signature {} has no model", m.signature_id);
                    None
                }
            })
            .collect())
    }

    fn renderer(&self) -> &SharedRenderer<R> {
        #[cfg(feature = "parallel")]
        let slot = rayon::current_thread_index().unwrap_or(0);
        #[cfg(not(feature = "parallel"))]
        let slot = 0;
        &self.renderers[slot % self.renderers.len()]
    }

    fn install<T: Send>(&self, op: impl FnOnce() -> T + Send) -> T {
        #[cfg(feature = "parallel")]
        {
            self.pool.install(op)
        }
        #[cfg(not(feature = "parallel"))]
        {
            op()
        }
    }

    fn par_map<T: Sync, U: Send>(&self, items: &[T], f: impl Fn(&T) -> U + Sync + Send) -> Vec<U> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            items.par_iter().map(f).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            items.iter().map(f).collect()
        }
    }
}

fn view_failure(view: &PlannedView, stage: FailureStage, attempts: u32, err: &Error) -> ViewFailure {
    ViewFailure {
        index: view.index,
        stem: view.spec.stem(),
        stage,
        attempts,
        message: err.to_string(),
    }
}
