//! What is currently placed in the scene

use tracing::debug;

use crate::model::LoadedModel;

/// Debug skeleton overlay drawn over the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonOverlay {
    pub joint_count: usize,
    pub visible: bool,
}

/// The model shown by the viewer and its helpers
#[derive(Debug, Default)]
pub struct Scene {
    model: Option<LoadedModel>,
    skeleton: Option<SkeletonOverlay>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    pub fn skeleton(&self) -> Option<SkeletonOverlay> {
        self.skeleton
    }

    /// Place a model and its skeleton overlay, replacing any previous one
    pub fn insert_model(&mut self, model: LoadedModel, show_skeleton: bool) {
        self.remove_model();
        self.skeleton = Some(SkeletonOverlay {
            joint_count: model.joint_count,
            visible: show_skeleton,
        });
        debug!(source = ?model.source, "model added to scene");
        self.model = Some(model);
    }

    /// Take the model and its skeleton overlay out of the scene
    pub fn remove_model(&mut self) -> Option<LoadedModel> {
        self.skeleton = None;
        let removed = self.model.take();
        if let Some(model) = &removed {
            debug!(source = ?model.source, "model removed from scene");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::animation::Clip;
    use crate::model::Handedness;

    fn model(handedness: Handedness) -> LoadedModel {
        LoadedModel {
            handedness,
            source: "hand.glb".into(),
            clips: vec![Clip::new("idle", 1.0)],
            joint_count: 21,
        }
    }

    #[test]
    fn test_insert_adds_skeleton() {
        let mut scene = Scene::new();
        scene.insert_model(model(Handedness::Right), true);
        assert_eq!(
            scene.skeleton(),
            Some(SkeletonOverlay {
                joint_count: 21,
                visible: true
            })
        );
    }

    #[test]
    fn test_remove_clears_both() {
        let mut scene = Scene::new();
        scene.insert_model(model(Handedness::Left), false);
        let removed = scene.remove_model().unwrap();
        assert_eq!(removed.handedness, Handedness::Left);
        assert!(scene.model().is_none());
        assert!(scene.skeleton().is_none());
        assert!(scene.remove_model().is_none());
    }

    #[test]
    fn test_insert_replaces_previous() {
        let mut scene = Scene::new();
        scene.insert_model(model(Handedness::Right), true);
        scene.insert_model(model(Handedness::Left), true);
        assert_eq!(scene.model().map(|m| m.handedness), Some(Handedness::Left));
    }
}
