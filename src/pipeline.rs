use crate::conversion::ConversionOptions;
use crate::conversion::animation::rebaser::AnimationCurveRebaser;
use crate::conversion::hierarchy::HierarchyWalker;
use crate::instancing::deduplicator::MeshDeduplicator;
use crate::report::{ConversionLog, DedupReport};
use axisfix_scene::Scene;
use log::{debug, info};

#[derive(Debug, Default)]
pub struct ConversionReport {
    pub log: ConversionLog,
    /// Only present when instance optimization ran.
    pub dedup: Option<DedupReport>,
}

/// Runs all enabled passes over one imported scene, in the order they depend on each other:
/// hierarchy walk, animation curves, curve path renames and finally deduplication of the rotated buffers.
pub struct ImportPipeline {
    options: ConversionOptions,
}

impl ImportPipeline {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn run(&self, scene: &mut Scene) -> ConversionReport {
        let mut report = ConversionReport::default();
        let walker = HierarchyWalker::new(&self.options);

        // the depth classification is needed by the animation pass even if the geometry stays as it is
        let depths = if self.options.geometry_fix {
            profiling::scope!("ImportPipeline::walk");
            walker.walk(&mut scene.root, &mut report.log)
        } else {
            walker.classify(&scene.root)
        };

        if self.options.animation_fix {
            profiling::scope!("ImportPipeline::animation");
            let rebaser = AnimationCurveRebaser::new(&self.options, &depths);
            for clip in &mut scene.clips {
                rebaser.rebase_clip(clip, &mut report.log);
            }
        }

        for clip in &mut scene.clips {
            let renamed = AnimationCurveRebaser::rename_paths(clip, &depths);
            if renamed > 0 {
                debug!("{}: pointed {} curves to renamed objects", clip.name, renamed);
            }
        }

        if self.options.optimize_instances {
            profiling::scope!("ImportPipeline::deduplicate");
            let dedup = MeshDeduplicator::deduplicate_hierarchy(&mut scene.root);
            report.log.info(format!(
                "{}: {} unique meshes, {} references instanced",
                scene.root.name, dedup.unique_meshes, dedup.instanced
            ));
            report.dedup = Some(dedup);
        }

        info!(
            "Converted {} ({} objects rebased, {} clips)",
            scene.root.name,
            depths.len(),
            scene.clips.len()
        );
        report
    }
}
