//! Rendering against a real adapter. Each test returns early when the
//! machine has no usable GPU (or software) adapter.

use meridian_engine::device::{HeadlessGpu, HeadlessInit, OffscreenTarget};
use meridian_engine::mesh::{GeometryType, Mesh, MeshData, SphereDescriptor};
use meridian_engine::paint::Color;
use meridian_engine::pipeline::{PipelineDescriptor, PipelineState};
use meridian_engine::render::{submit_frame, DrawableSource};
use meridian_engine::scene::SphereScene;
use meridian_engine::shader::{ShaderLibrary, FRAGMENT_MAIN, SPHERE_SHADER, VERTEX_MAIN};
use meridian_engine::RenderError;

const BACKGROUND: [u8; 4] = [255, 255, 204, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn headless() -> Option<HeadlessGpu> {
    match pollster::block_on(HeadlessGpu::new(HeadlessInit::default())) {
        Ok(gpu) => Some(gpu),
        Err(err) => {
            eprintln!("skipping GPU test: {err}");
            None
        }
    }
}

fn target(gpu: &HeadlessGpu, size: u32) -> OffscreenTarget {
    OffscreenTarget::new(gpu, size, size, wgpu::TextureFormat::Bgra8Unorm).unwrap()
}

#[test]
fn sphere_frame_has_red_center_and_clear_background() {
    let Some(gpu) = headless() else { return };
    let mut target = target(&gpu, 64);

    let mut scene = SphereScene::for_target(&target, &SphereDescriptor::default()).unwrap();
    scene.draw(&mut target, Color::CREAM).unwrap();

    let pixels = target.read_pixels().unwrap();
    assert_eq!(pixels.rgba(0, 0), Some(BACKGROUND));
    assert_eq!(pixels.rgba(63, 63), Some(BACKGROUND));
    assert_eq!(pixels.rgba(32, 32), Some(RED));

    // Every pixel is either background or sphere.
    let total = 64 * 64;
    assert_eq!(pixels.count(BACKGROUND) + pixels.count(RED), total);
    assert!(pixels.count(RED) > 0);
}

#[test]
fn sphere_mesh_upload_counts() {
    let Some(gpu) = headless() else { return };

    let mesh = Mesh::sphere(gpu.device(), &SphereDescriptor::default()).unwrap();
    let submesh = mesh.first_submesh().unwrap();

    assert_eq!(mesh.vertex_count(), 101 * 101);
    assert_eq!(submesh.index_count, 100 * 100 * 6);
    assert_eq!(submesh.index_format, wgpu::IndexFormat::Uint16);
    assert_eq!(mesh.submeshes().len(), 1);
}

#[test]
fn shader_library_exposes_both_functions() {
    let Some(gpu) = headless() else { return };

    let library = ShaderLibrary::new(gpu.device(), "sphere shader", SPHERE_SHADER).unwrap();
    let names: Vec<_> = library.function_names().collect();
    assert_eq!(names, [VERTEX_MAIN, FRAGMENT_MAIN]);
    assert_eq!(library.function(VERTEX_MAIN).unwrap().name(), VERTEX_MAIN);

    let err = library.function("main").unwrap_err();
    assert!(matches!(err, RenderError::FunctionNotFound { name } if name == "main"));
}

#[test]
fn malformed_shader_is_rejected_before_the_device() {
    let Some(gpu) = headless() else { return };

    let result = ShaderLibrary::new(gpu.device(), "broken", "fn vertex_main( {");
    assert!(matches!(result, Err(RenderError::ShaderCompilation { .. })));
}

#[test]
fn mismatched_vertex_layout_builds_no_pipeline() {
    let Some(gpu) = headless() else { return };

    let mesh = Mesh::sphere(gpu.device(), &SphereDescriptor::default()).unwrap();
    let library = ShaderLibrary::new(gpu.device(), "sphere shader", SPHERE_SHADER).unwrap();

    let mut layout = mesh.layout().clone();
    layout.attributes.truncate(1);
    let desc = PipelineDescriptor::new(
        "truncated",
        library.function(VERTEX_MAIN).unwrap(),
        library.function(FRAGMENT_MAIN).unwrap(),
        layout,
    );

    let result = PipelineState::new(gpu.device(), &desc, mesh.layout());
    assert!(matches!(result, Err(RenderError::LayoutMismatch(_))));

    let desc = PipelineDescriptor {
        vertex_layout: mesh.layout().clone(),
        ..desc
    };
    assert!(PipelineState::new(gpu.device(), &desc, mesh.layout()).is_ok());
}

#[test]
fn zero_sized_target_has_no_drawable() {
    let Some(gpu) = headless() else { return };
    let mut target = target(&gpu, 16);

    let mut scene = SphereScene::for_target(&target, &SphereDescriptor::default()).unwrap();
    target.resize(0, 0).unwrap();

    let err = scene.draw(&mut target, Color::CREAM).unwrap_err();
    assert!(matches!(err, RenderError::FrameResourceUnavailable(_)));
    assert!(!err.is_fatal());
    assert_eq!(scene.frames(), 0);

    // The same scene draws again once a drawable exists.
    target.resize(16, 16).unwrap();
    scene.draw(&mut target, Color::CREAM).unwrap();
    assert_eq!(scene.frames(), 1);
}

#[test]
fn pipeline_format_must_match_target() {
    let Some(gpu) = headless() else { return };
    let mut target = target(&gpu, 16);

    let mesh = Mesh::sphere(gpu.device(), &SphereDescriptor::default()).unwrap();
    let library = ShaderLibrary::new(gpu.device(), "sphere shader", SPHERE_SHADER).unwrap();
    let pipeline = PipelineState::for_mesh(
        gpu.device(),
        &library,
        wgpu::TextureFormat::Rgba8Unorm,
        &mesh,
    )
    .unwrap();

    let err = submit_frame(&mut target, Color::CREAM, &pipeline, &mesh).unwrap_err();
    assert!(matches!(err, RenderError::LayoutMismatch(_)));
}

#[test]
fn mesh_without_submeshes_is_geometry_absent() {
    let Some(gpu) = headless() else { return };
    let mut target = target(&gpu, 16);

    let mut data = meridian_engine::mesh::sphere::generate(&SphereDescriptor {
        segments: [8, 4],
        ..SphereDescriptor::default()
    })
    .unwrap();
    data.submeshes.clear();
    let empty = Mesh::upload(gpu.device(), "empty", &data).unwrap();

    let library = ShaderLibrary::new(gpu.device(), "sphere shader", SPHERE_SHADER).unwrap();
    let result = PipelineState::for_mesh(gpu.device(), &library, target.color_format(), &empty);
    assert!(matches!(result, Err(RenderError::GeometryAbsent(_))));

    let scene = SphereScene::for_target(&target, &SphereDescriptor::default()).unwrap();
    let err = submit_frame(&mut target, Color::CREAM, scene.pipeline(), &empty).unwrap_err();
    assert!(matches!(err, RenderError::GeometryAbsent(_)));
}

#[test]
fn long_lived_state_is_reused_across_frames() {
    let Some(gpu) = headless() else { return };
    let mut target = target(&gpu, 32);

    let mut scene = SphereScene::for_target(&target, &SphereDescriptor::default()).unwrap();
    for clear in [Color::BLACK, Color::CREAM, Color::CREAM] {
        scene.draw(&mut target, clear).unwrap();
    }
    assert_eq!(scene.frames(), 3);

    let pixels = target.read_pixels().unwrap();
    assert_eq!(pixels.rgba(0, 0), Some(BACKGROUND));
    assert_eq!(pixels.rgba(16, 16), Some(RED));
}

#[test]
fn inward_and_wireframe_spheres_render() {
    let Some(gpu) = headless() else { return };

    for sphere in [
        SphereDescriptor {
            inward_normals: true,
            ..SphereDescriptor::default()
        },
        SphereDescriptor {
            segments: [24, 12],
            geometry: GeometryType::Lines,
            ..SphereDescriptor::default()
        },
    ] {
        let mut target = target(&gpu, 64);
        let mut scene = SphereScene::for_target(&target, &sphere).unwrap();
        scene.draw(&mut target, Color::CREAM).unwrap();

        let pixels = target.read_pixels().unwrap();
        assert_eq!(pixels.rgba(0, 0), Some(BACKGROUND));
        assert!(pixels.count(RED) > 0, "{:?} drew nothing", sphere.geometry);
    }
}

#[test]
fn rgba_target_reads_back_in_rgba_order() {
    let Some(gpu) = headless() else { return };
    let mut target = OffscreenTarget::new(&gpu, 32, 32, wgpu::TextureFormat::Rgba8Unorm).unwrap();

    let mut scene = SphereScene::for_target(&target, &SphereDescriptor::default()).unwrap();
    scene.draw(&mut target, Color::CREAM).unwrap();

    let pixels = target.read_pixels().unwrap();
    assert_eq!(pixels.rgba(0, 0), Some(BACKGROUND));
    assert_eq!(pixels.rgba(16, 16), Some(RED));
}

#[test]
fn unreadable_formats_are_rejected() {
    let Some(gpu) = headless() else { return };
    let result = OffscreenTarget::new(&gpu, 8, 8, wgpu::TextureFormat::Rgba16Float);
    assert!(matches!(result, Err(RenderError::ResourceCreation { .. })));
}

#[test]
fn mesh_data_roundtrip_keeps_layout() {
    let Some(gpu) = headless() else { return };
    let data = MeshData::single(
        meridian_engine::mesh::sphere::generate(&SphereDescriptor {
            segments: [6, 3],
            ..SphereDescriptor::default()
        })
        .unwrap()
        .vertices,
        vec![0, 1, 2],
        GeometryType::Triangles,
    );
    let mesh = Mesh::upload(gpu.device(), "tri", &data).unwrap();
    assert_eq!(mesh.layout(), &data.layout());
    assert_eq!(mesh.first_submesh().unwrap().index_count, 3);
}

#[test]
fn shader_needing_missing_feature_is_a_compile_error() {
    let Some(gpu) = headless() else { return };
    if gpu.device().features().contains(wgpu::Features::SHADER_F64) {
        return;
    }

    let src = r#"
        var<private> scale: f64;

        @vertex
        fn vertex_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position * f32(scale), 1.0);
        }
    "#;
    let result = ShaderLibrary::new(gpu.device(), "f64", src);
    assert!(matches!(result, Err(RenderError::ShaderCompilation { .. })));
}

#[test]
fn integer_position_input_builds_no_pipeline() {
    let Some(gpu) = headless() else { return };

    let src = r#"
        @vertex
        fn vertex_main(@location(0) position: vec3<u32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(vec3<f32>(position), 1.0);
        }

        @fragment
        fn fragment_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;
    let mesh = Mesh::sphere(gpu.device(), &SphereDescriptor::default()).unwrap();
    let library = ShaderLibrary::new(gpu.device(), "uint position", src).unwrap();

    let result = PipelineState::for_mesh(
        gpu.device(),
        &library,
        wgpu::TextureFormat::Bgra8Unorm,
        &mesh,
    );
    assert!(matches!(result, Err(RenderError::LayoutMismatch(_))));
}

#[test]
fn device_rejected_pipeline_is_an_error() {
    let Some(gpu) = headless() else { return };

    // The fragment stage reads a varying the vertex stage never writes.
    let src = r#"
        @vertex
        fn vertex_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0);
        }

        @fragment
        fn fragment_main(@location(0) tint: vec4<f32>) -> @location(0) vec4<f32> {
            return tint;
        }
    "#;
    let mesh = Mesh::sphere(gpu.device(), &SphereDescriptor::default()).unwrap();
    let library = ShaderLibrary::new(gpu.device(), "unlinked varyings", src).unwrap();

    let result = PipelineState::for_mesh(
        gpu.device(),
        &library,
        wgpu::TextureFormat::Bgra8Unorm,
        &mesh,
    );
    assert!(matches!(
        result,
        Err(RenderError::ResourceCreation { what: "render pipeline", .. })
    ));
}

#[test]
fn triangle_pipeline_does_not_draw_line_mesh() {
    let Some(gpu) = headless() else { return };
    let mut target = target(&gpu, 16);

    let lines = Mesh::sphere(
        gpu.device(),
        &SphereDescriptor {
            segments: [12, 6],
            geometry: GeometryType::Lines,
            ..SphereDescriptor::default()
        },
    )
    .unwrap();
    let library = ShaderLibrary::new(gpu.device(), "sphere shader", SPHERE_SHADER).unwrap();
    let desc = PipelineDescriptor::new(
        "triangles",
        library.function(VERTEX_MAIN).unwrap(),
        library.function(FRAGMENT_MAIN).unwrap(),
        lines.layout().clone(),
    );
    assert_eq!(desc.geometry, GeometryType::Triangles);
    let pipeline = PipelineState::new(gpu.device(), &desc, lines.layout()).unwrap();

    let err = submit_frame(&mut target, Color::CREAM, &pipeline, &lines).unwrap_err();
    assert!(matches!(err, RenderError::LayoutMismatch(msg) if msg.contains("Lines")));
}

#[test]
fn oversized_sphere_is_rejected_before_upload() {
    let Some(gpu) = headless() else { return };

    let desc = SphereDescriptor {
        segments: [4000, 4000],
        ..SphereDescriptor::default()
    };
    let (vertex_bytes, _) = desc.byte_sizes();
    if vertex_bytes <= gpu.device().limits().max_buffer_size {
        return;
    }

    let result = Mesh::sphere(gpu.device(), &desc);
    assert!(matches!(
        result,
        Err(RenderError::ResourceCreation { what: "vertex buffer", .. })
    ));
}
