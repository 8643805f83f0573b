//! Scene setup
//!
//! One-shot construction of the backdrop: offscreen render target, the
//! three scene objects (torus, avatar cube, moon), lights, and the
//! scroll-driven camera. Everything spawned here lives for the app's
//! lifetime.

use bevy::{
    asset::RenderAssetUsages,
    camera::RenderTarget,
    core_pipeline::tonemapping::Tonemapping,
    image::Image,
    math::primitives::{Cuboid, Sphere, Torus},
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
    render::{
        render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages},
        renderer::RenderDevice,
    },
};
use tracing::info;

use crate::backdrop::components::{EulerAngles, FrameSpin, ScrollCamera, ScrollSpin};
use crate::backdrop::plugins::frame_copy::FrameCopier;
use crate::backdrop::resources::{RenderTargetHandle, SurfaceSize};
use crate::config::{camera, scroll, spin};

/// Setup the backdrop scene: render target, objects, lights, camera.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    render_device: Res<RenderDevice>,
    surface: Res<SurfaceSize>,
) {
    info!(width = surface.width, height = surface.height, "setting up scene");

    let target = create_surface_target(&mut images, surface.width, surface.height);
    commands.insert_resource(RenderTargetHandle(target.clone()));

    // GPU-to-CPU copier sized to the target
    commands.spawn(FrameCopier::new(
        target.clone(),
        Extent3d {
            width: surface.width,
            height: surface.height,
            depth_or_array_layers: 1,
        },
        &render_device,
    ));

    // Camera; its pose is established by the queued startup scroll event
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(target.into()),
            clear_color: ClearColorConfig::Custom(Color::srgb(0.004, 0.008, 0.02)),
            ..default()
        },
        Tonemapping::None,
        Projection::Perspective(PerspectiveProjection {
            fov: camera::FOV_DEGREES.to_radians(),
            aspect_ratio: surface.aspect(),
            near: camera::NEAR,
            far: camera::FAR,
            ..default()
        }),
        Transform::default(),
        ScrollCamera,
    ));

    // Torus, spinning idly at the origin
    commands.spawn((
        Mesh3d(meshes.add(Torus {
            minor_radius: 3.0,
            major_radius: 10.0,
        })),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(255, 99, 71),
            ..default()
        })),
        Transform::default(),
        EulerAngles::default(),
        FrameSpin(spin::TORUS_STEP),
    ));

    // Avatar cube, nudged by scroll events
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(3.0, 3.0, 3.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(images.add(avatar_texture())),
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(2.0, 0.0, -5.0),
        EulerAngles::default(),
        ScrollSpin(scroll::AVATAR_STEP),
    ));

    // Moon, spun by both the frame loop and scroll events
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(3.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(images.add(moon_texture())),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(-10.0, 0.0, 30.0),
        EulerAngles::default(),
        FrameSpin(spin::MOON_STEP),
        ScrollSpin(scroll::MOON_STEP),
    ));

    // Soft light everywhere
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 150.0,
        ..default()
    });

    // Key light for highlights and shadows
    commands.spawn((
        DirectionalLight {
            illuminance: 3000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("scene setup complete");
}

/// Create an offscreen render target that the copy plugin can read back.
pub(crate) fn create_surface_target(
    images: &mut Assets<Image>,
    width: u32,
    height: u32,
) -> Handle<Image> {
    let mut target = Image::new_target_texture(width, height, TextureFormat::bevy_default());
    target.texture_descriptor.usage |= TextureUsages::COPY_SRC;
    images.add(target)
}

/// Two-tone checker for the avatar cube.
fn avatar_texture() -> Image {
    const SIZE: u32 = 8;
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let light = (x + y) % 2 == 0;
            let [r, g, b] = if light { [236, 204, 104] } else { [47, 53, 66] };
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    texture_from_rgba(SIZE, data)
}

/// Grey mottled surface for the moon, from a small integer hash.
fn moon_texture() -> Image {
    const SIZE: u32 = 64;
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let mut h = x
                .wrapping_mul(374_761_393)
                .wrapping_add(y.wrapping_mul(668_265_263));
            h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
            let shade = 110 + (h % 70) as u8;
            data.extend_from_slice(&[shade, shade, shade, 255]);
        }
    }
    texture_from_rgba(SIZE, data)
}

fn texture_from_rgba(size: u32, data: Vec<u8>) -> Image {
    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textures_are_fully_opaque_rgba() {
        for image in [avatar_texture(), moon_texture()] {
            let data = image.data.as_ref().unwrap();
            assert_eq!(
                data.len() as u32,
                image.width() * image.height() * 4
            );
            assert!(data.chunks(4).all(|px| px[3] == 255));
        }
    }

    #[test]
    fn test_moon_texture_is_deterministic() {
        let a = moon_texture();
        let b = moon_texture();
        assert_eq!(a.data, b.data);
    }
}
