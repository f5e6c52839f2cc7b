mod common;

use common::init_logging;
use common::synthetic_mesh::{cloud, mirror_x, some_rotation, transformed};
use match3d::benchmark::GoldenTable;
use match3d::custody::InMemoryProvenance;
use match3d::mesh::{Mesh, MeshHandle};
use match3d::render::SplatRenderer;
use match3d::signature::InMemoryIndex;
use match3d::views::{Facing, LookDirection};
use match3d::{
    plan_views, Benchmarker, CoveragePolicy, Match3d, ModelInput, ModelScore, NeighborHit,
    PipelineParams, PoseCanonicalizer, RankingPolicy, ScoreAggregator, ViewPlanParams,
};
use nalgebra::Vector3;

type Engine = Match3d<SplatRenderer, InMemoryIndex, InMemoryProvenance>;

fn engine(models: &[(&str, &Mesh)], policy: CoveragePolicy) -> Engine {
    let mut renderer = SplatRenderer::default();
    for (id, mesh) in models {
        renderer.register(*id, (*mesh).clone());
    }
    let params = PipelineParams {
        view_plan: ViewPlanParams::default()
            .with_policy(policy)
            .with_resolution(48),
        distance_cutoff: 1.0,
        workers: 3,
        ..Default::default()
    };
    Match3d::new(
        params,
        renderer,
        InMemoryIndex::default(),
        InMemoryProvenance::default(),
    )
    .unwrap()
}

#[test]
fn minimal_plan_scenario() {
    init_logging();
    let mesh = cloud(17, 500, [3.0, 2.0, 1.0]);
    let frame = PoseCanonicalizer::default().canonicalize(&mesh).unwrap();
    assert!(frame.is_orthonormal(1e-9));
    assert!(frame.moment(0) < frame.moment(1) && frame.moment(1) < frame.moment(2));

    let plan = plan_views(
        &frame,
        &ViewPlanParams::default().with_policy(CoveragePolicy::Minimal),
    )
    .unwrap();
    assert_eq!(plan.len(), 1);
    let spec = plan.views[0].spec;
    assert_eq!(spec.direction, LookDirection::Axis(0));
    assert_eq!(spec.rotation, 0);
    assert!(!spec.reflected);
    assert_eq!(spec.facing, Facing::Front);

    let aggregator =
        ScoreAggregator::with_policy(RankingPolicy::BestSingleImage { n_per_view: 5 });
    let scores = aggregator.aggregate(&[vec![
        NeighborHit::new("A", 0.1),
        NeighborHit::new("B", 0.9),
    ]]);
    match scores {
        ModelScore::Distances(map) => {
            assert_eq!(map.len(), 2);
            assert_eq!(map["A"], 0.1);
            assert_eq!(map["B"], 0.9);
        }
        other => panic!("expected distances, got {other:?}"),
    }
}

#[test]
fn rotated_and_mirrored_copy_is_identified_and_benchmarked() {
    init_logging();
    let part = cloud(101, 500, [3.0, 2.0, 1.0]);
    let other = cloud(202, 500, [1.0, 2.6, 0.8]);
    let moved = transformed(
        &part,
        some_rotation() * mirror_x(),
        Vector3::new(4.0, -1.0, 2.5),
    );
    let m = engine(
        &[("part", &part), ("other", &other), ("part-query", &moved)],
        CoveragePolicy::Full,
    );

    let reg = m
        .register(&MeshHandle::new("part", "part.stl"), &part, Some("catalog"))
        .unwrap()
        .expect("first registration");
    assert_eq!(reg.signatures.len(), 48);
    assert!(reg.failures.is_empty());
    m.register(&MeshHandle::new("other", "other.stl"), &other, None)
        .unwrap()
        .expect("first registration");
    assert_eq!(m.matcher().len(), 96);
    assert_eq!(m.provenance().len(), 2);

    let report = m
        .identify(&MeshHandle::new("part-query", "query.stl"), &moved)
        .unwrap();
    assert_eq!(report.audit.len(), 48);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.best_match(), Some("part"));
    let d_part = report.scores.distance("part").unwrap();
    let d_other = report.scores.distance("other").unwrap_or(1.0);
    assert!(d_part < d_other, "part={d_part} other={d_other}");

    let table = GoldenTable::from_reader("part,0,1\nother,0,1\n".as_bytes()).unwrap();
    let bench = Benchmarker::new(&table, None).unwrap();
    let card = bench.every_score("part", &report.ranking).unwrap();
    assert_eq!(card.first_result, 1.0);
    assert_eq!(card.recall1, 1.0);
    assert_eq!(card.disorder, 0.0);
}

#[test]
fn identify_all_reports_each_model_independently() {
    init_logging();
    let a = cloud(5, 300, [3.0, 1.5, 0.7]);
    let flat = Mesh::default();
    let m = engine(&[("a", &a)], CoveragePolicy::Minimal);
    m.register(&MeshHandle::new("a", "a.stl"), &a, None)
        .unwrap()
        .expect("first registration");

    let batch = vec![
        ModelInput::new(MeshHandle::new("a", "a.stl"), a.clone()),
        ModelInput::new(MeshHandle::new("flat", "flat.stl"), flat),
    ];
    let reports = m.identify_all(&batch);
    assert_eq!(reports.len(), 2);
    let first = reports[0].as_ref().unwrap();
    assert_eq!(first.ranking, vec!["a".to_string()]);
    assert_eq!(first.scores.distance("a"), Some(0.0));
    assert!(reports[1].is_err());
}
