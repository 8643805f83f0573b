//! Surface resize handling
//!
//! Applies a pending resize request: the offscreen render target and its
//! copy buffer are recreated at the new size, the camera is retargeted,
//! and its aspect ratio becomes width/height.

use bevy::{
    camera::RenderTarget,
    prelude::*,
    render::{render_resource::Extent3d, renderer::RenderDevice},
};
use tracing::info;

use crate::backdrop::components::ScrollCamera;
use crate::backdrop::plugins::frame_copy::FrameCopier;
use crate::backdrop::resources::{
    RenderTargetHandle, ResizeRequestRes, SurfaceSize, SurfaceSizeRes,
};
use crate::backdrop::systems::scene::create_surface_target;
use crate::bridge::shared_state::SharedResizeRequest;

/// Consume the most recent resize request, if any.
pub fn take_request(cell: &SharedResizeRequest) -> Option<(u32, u32)> {
    cell.0.lock().ok().and_then(|mut guard| guard.take())
}

/// Apply a pending resize request from the page.
pub fn apply_surface_resize(
    mut commands: Commands,
    request: Option<Res<ResizeRequestRes>>,
    bridge_size: Option<Res<SurfaceSizeRes>>,
    mut surface: ResMut<SurfaceSize>,
    mut images: ResMut<Assets<Image>>,
    render_device: Res<RenderDevice>,
    target: Option<ResMut<RenderTargetHandle>>,
    mut cameras: Query<(&mut Camera, &mut Projection), With<ScrollCamera>>,
    copiers: Query<Entity, With<FrameCopier>>,
) {
    let Some(request) = request else { return };
    let Some((width, height)) = take_request(&request.0) else {
        return;
    };
    if (width, height) == (surface.width, surface.height) {
        return;
    }

    *surface = SurfaceSize { width, height };

    // New target plus a copy buffer sized to match; the old copier would
    // read the wrong byte count, so it goes away with the old target
    let handle = create_surface_target(&mut images, width, height);
    for entity in copiers.iter() {
        commands.entity(entity).despawn();
    }
    commands.spawn(FrameCopier::new(
        handle.clone(),
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        &render_device,
    ));

    for (mut camera, mut projection) in cameras.iter_mut() {
        camera.target = RenderTarget::Image(handle.clone().into());
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = surface.aspect();
        }
    }

    if let Some(mut target) = target {
        target.0 = handle;
    }

    if let Some(bridge_size) = bridge_size {
        if let Ok(mut guard) = bridge_size.0 .0.lock() {
            *guard = (width, height);
        }
    }

    info!(width, height, "surface resized");
}
