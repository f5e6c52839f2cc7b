use match3d::config::view_plan;
use match3d::image::io::{save_raster, write_json_file};
use match3d::image::Raster;
use match3d::mesh::{io::load_stl, MeshHandle};
use match3d::pose::{PoseCanonicalizer, PrincipalFrame};
use match3d::render::{SharedRenderer, SplatRenderer};
use match3d::views::{plan_views, ViewAudit, ViewPlan, ViewStrategy};
use match3d::{Error, Result};
use serde::Serialize;
use std::env;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanSummary {
    input: String,
    faces: usize,
    frame: PrincipalFrame,
    repeated_moments: bool,
    renderer_invocations: usize,
    views: Vec<ViewAudit>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = view_plan::load_config(Path::new(&config_path))?;

    let mesh = load_stl(&config.input)?;
    let frame = PoseCanonicalizer::new(config.pose.clone()).canonicalize(&mesh)?;
    let plan = plan_views(&frame, &config.view_plan)?;

    println!("Principal frame of {} ({} faces)", config.input.display(), mesh.len());
    for i in 0..3 {
        let a = frame.axis(i);
        println!(
            "  axis {i}: moment={:.6} dir=[{:.4} {:.4} {:.4}]",
            frame.moment(i),
            a.x,
            a.y,
            a.z
        );
    }
    println!(
        "Plan: {} views, {} renderer invocations",
        plan.len(),
        plan.renderer_invocations()
    );

    let summary = PlanSummary {
        input: config.input.display().to_string(),
        faces: mesh.len(),
        frame,
        repeated_moments: frame.has_repeated_moments(1e-6),
        renderer_invocations: plan.renderer_invocations(),
        views: plan.audit(),
    };
    write_json_file(&config.output.audit_json, &summary)?;
    println!("Plan audit written to {}", config.output.audit_json.display());

    if let Some(dir) = &config.output.render_dir {
        let model_id = config
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let handle = MeshHandle::new(model_id, &config.input);
        let renderer = SharedRenderer::new(SplatRenderer::new(config.splat.clone()));
        let rasters = render_plan(&renderer, &handle, &plan)?;
        for (view, raster) in plan.views.iter().zip(&rasters) {
            save_raster(raster, &dir.join(format!("{}.png", view.spec.stem())))?;
        }
        println!("{} views written to {}", rasters.len(), dir.display());
    }
    Ok(())
}

fn render_plan(
    renderer: &SharedRenderer<SplatRenderer>,
    handle: &MeshHandle,
    plan: &ViewPlan,
) -> Result<Vec<Raster>> {
    let mut rasters: Vec<Option<Raster>> = vec![None; plan.len()];
    {
        let mut session = renderer.session(handle)?;
        for view in plan.views.iter().filter(|v| v.strategy == ViewStrategy::Rendered) {
            rasters[view.index] = Some(session.render(&view.pose, plan.resolution)?);
        }
    }
    for view in &plan.views {
        if let Some(base) = view.strategy.base() {
            rasters[view.index] = rasters[base].as_ref().and_then(|b| view.strategy.derive(b));
        }
    }
    rasters
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.ok_or_else(|| Error::InvalidViewPlan(format!("view {i} has no raster"))))
        .collect()
}

fn usage() -> Error {
    Error::Config("Usage: view_plan_demo <config.json>".to_string())
}
