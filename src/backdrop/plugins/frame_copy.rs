//! GPU-to-CPU frame copy
//!
//! A render-graph node that copies the offscreen render target into a
//! mappable buffer after the cameras have drawn, then ships the bytes to
//! the main world over a channel. Derived from Bevy's headless renderer
//! example:
//! <https://github.com/bevyengine/bevy/blob/main/examples/app/headless_renderer.rs>

use bevy::{
    prelude::*,
    render::{
        render_asset::RenderAssets,
        render_graph::{self, NodeRunError, RenderGraph, RenderGraphContext, RenderLabel},
        render_resource::{
            Buffer, BufferDescriptor, BufferUsages, CommandEncoderDescriptor, Extent3d, MapMode,
            PollType, TexelCopyBufferInfo, TexelCopyBufferLayout,
        },
        renderer::{RenderContext, RenderDevice, RenderQueue},
        texture::GpuImage,
        Extract, Render, RenderApp, RenderSystems,
    },
};
use crossbeam_channel::unbounded;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::backdrop::resources::{MainWorldReceiver, RenderWorldSender};

pub struct FrameCopyPlugin;

impl Plugin for FrameCopyPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = unbounded();

        let render_app = app
            .insert_resource(MainWorldReceiver(receiver))
            .sub_app_mut(RenderApp);

        let mut graph = render_app.world_mut().resource_mut::<RenderGraph>();
        graph.add_node(FrameCopyLabel, FrameCopyNode);
        graph.add_node_edge(bevy::render::graph::CameraDriverLabel, FrameCopyLabel);

        render_app
            .insert_resource(RenderWorldSender(sender))
            .add_systems(ExtractSchedule, extract_frame_copiers)
            .add_systems(Render, send_mapped_frames.after(RenderSystems::Render));
    }
}

/// Copies one source image into a CPU-mappable buffer each frame.
///
/// Spawned in the main world next to the render target it reads; extracted
/// into the render world every frame.
#[derive(Clone, Component)]
pub struct FrameCopier {
    buffer: Buffer,
    enabled: Arc<AtomicBool>,
    src_image: Handle<Image>,
}

impl FrameCopier {
    pub fn new(src_image: Handle<Image>, size: Extent3d, render_device: &RenderDevice) -> Self {
        // Sized to the exact copy stride so a mapped buffer holds nothing
        // but the padded rows
        let padded_bytes_per_row =
            RenderDevice::align_copy_bytes_per_row(size.width as usize * 4);

        let cpu_buffer = render_device.create_buffer(&BufferDescriptor {
            label: None,
            size: padded_bytes_per_row as u64 * size.height as u64,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer: cpu_buffer,
            enabled: Arc::new(AtomicBool::new(true)),
            src_image,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Default, Resource, Deref, DerefMut)]
struct FrameCopiers(pub Vec<FrameCopier>);

fn extract_frame_copiers(mut commands: Commands, copiers: Extract<Query<&FrameCopier>>) {
    commands.insert_resource(FrameCopiers(copiers.iter().cloned().collect()));
}

#[derive(Debug, PartialEq, Eq, Clone, Hash, RenderLabel)]
struct FrameCopyLabel;

#[derive(Default)]
struct FrameCopyNode;

impl render_graph::Node for FrameCopyNode {
    fn run(
        &self,
        _graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let copiers = world.get_resource::<FrameCopiers>().unwrap();
        let gpu_images = world.get_resource::<RenderAssets<GpuImage>>().unwrap();

        for copier in copiers.iter() {
            if !copier.enabled() {
                continue;
            }

            // The source image may be gone for a frame around a resize
            let Some(src_image) = gpu_images.get(&copier.src_image) else {
                continue;
            };

            let mut encoder = render_context
                .render_device()
                .create_command_encoder(&CommandEncoderDescriptor::default());

            let block_dimensions = src_image.texture_format.block_dimensions();
            let block_size = src_image.texture_format.block_copy_size(None).unwrap();

            let padded_bytes_per_row = RenderDevice::align_copy_bytes_per_row(
                (src_image.size.width as usize / block_dimensions.0 as usize)
                    * block_size as usize,
            );

            encoder.copy_texture_to_buffer(
                src_image.texture.as_image_copy(),
                TexelCopyBufferInfo {
                    buffer: &copier.buffer,
                    layout: TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(
                            std::num::NonZero::<u32>::new(padded_bytes_per_row as u32)
                                .unwrap()
                                .into(),
                        ),
                        rows_per_image: None,
                    },
                },
                src_image.size,
            );

            let render_queue = world.get_resource::<RenderQueue>().unwrap();
            render_queue.submit(std::iter::once(encoder.finish()));
        }

        Ok(())
    }
}

/// Map each copier's buffer and ship its contents to the main world.
fn send_mapped_frames(
    copiers: Res<FrameCopiers>,
    render_device: Res<RenderDevice>,
    sender: Res<RenderWorldSender>,
) {
    for copier in copiers.0.iter() {
        if !copier.enabled() {
            continue;
        }

        let buffer_slice = copier.buffer.slice(..);

        let (s, r) = crossbeam_channel::bounded(1);

        buffer_slice.map_async(MapMode::Read, move |result| match result {
            Ok(result) => s.send(result).expect("Failed to send map update"),
            Err(err) => panic!("Failed to map buffer {err}"),
        });

        render_device
            .poll(PollType::wait())
            .expect("Failed to poll device for map async");

        r.recv().expect("Failed to receive the map_async message");

        let _ = sender.send(buffer_slice.get_mapped_range().to_vec());

        copier.buffer.unmap();
    }
}
