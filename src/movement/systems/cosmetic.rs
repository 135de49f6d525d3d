//! Movement domain: apply the cosmetic tilt to the visual child.

use bevy::prelude::*;

use crate::movement::{MotionController, VisualTilt};

pub(crate) fn apply_visual_tilt(
    controllers: Query<&MotionController>,
    mut visuals: Query<(&ChildOf, &mut Transform), With<VisualTilt>>,
) {
    for (child_of, mut transform) in &mut visuals {
        if let Ok(controller) = controllers.get(child_of.parent()) {
            transform.rotation = controller.tilt().rotation();
        }
    }
}
