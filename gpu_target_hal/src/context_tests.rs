/// Tests for DeviceContext
///
/// End-to-end creation through the public entry point with the mock driver.
/// Tests that inspect log output install a capture logger and run #[serial].

use super::*;
use crate::driver::mock_graphics_driver::{DriverCall, DriverCallKind, MockGraphicsDriver};
use crate::driver::{CapabilityFlags, CubeFace, DepthStencilFormat, StorageTarget};
use crate::hal_state::{CaptureLogger, Hal};
use crate::log::LogSeverity;
use crate::texture::{PixelType, SamplingMode};
use serial_test::serial;

fn context_with(mock: MockGraphicsDriver) -> (Arc<Mutex<MockGraphicsDriver>>, DeviceContext) {
    let mock = Arc::new(Mutex::new(mock));
    let driver: Arc<Mutex<dyn GraphicsDriver>> = mock.clone();
    let registry = Arc::new(Mutex::new(TextureRegistry::new()));
    let context = DeviceContext::new(driver, registry, DeviceContextConfig::default()).unwrap();
    (mock, context)
}

fn context() -> (Arc<Mutex<MockGraphicsDriver>>, DeviceContext) {
    context_with(MockGraphicsDriver::new())
}

// ============================================================================
// Tests: Creation
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = DeviceContextConfig::default();
    assert_eq!(config.label, "default");
    assert!(config.enforce_max_cube_size);
    assert!(config.release_partial_on_failure);
}

#[test]
fn test_new_probes_capabilities() {
    let caps = CapabilityTable::new(CapabilityFlags::FLOAT_TEXTURE, 2048);
    let (_, context) = context_with(MockGraphicsDriver::with_capabilities(caps));

    assert_eq!(*context.capabilities(), caps);
    assert!(context.capabilities().supports_float_texture());
    assert!(!context.capabilities().supports_float_linear_filter());
}

#[test]
fn test_new_without_current_context_fails() {
    let mut mock = MockGraphicsDriver::new();
    mock.set_context_current(false);
    let driver: Arc<Mutex<dyn GraphicsDriver>> = Arc::new(Mutex::new(mock));

    let result = DeviceContext::new(
        driver,
        Arc::new(Mutex::new(TextureRegistry::new())),
        DeviceContextConfig::default(),
    );
    assert!(matches!(result, Err(Error::ContextInvalid)));
}

// ============================================================================
// Tests: create_cube_render_target
// ============================================================================

#[test]
fn test_default_options_produce_ready_cube() {
    let (_, context) = context();
    for size in [1, 16, 512, 1000] {
        let wrapper = context.create_cube_render_target(size, &RenderTargetOptions::new()).unwrap();
        let texture = wrapper.texture().unwrap();

        assert_eq!(texture.width(), size);
        assert_eq!(texture.height(), size);
        assert!(texture.is_cube());
        assert!(texture.is_ready());
        assert_eq!(texture.sample_count(), 1);
        assert!(wrapper.framebuffer().is_some());
    }
    assert_eq!(context.registry().lock().unwrap().len(), 4);
}

#[test]
fn test_depth_stencil_end_to_end() {
    let (mock, context) = context();
    let options = RenderTargetOptions::new().with_depth_buffer(true).with_stencil_buffer(true);

    let wrapper = context.create_cube_render_target(512, &options).unwrap();

    assert!(wrapper.depth_stencil_buffer().is_some());
    assert!(wrapper.generate_depth_buffer());
    assert!(wrapper.generate_stencil_buffer());
    assert!(wrapper.texture().unwrap().is_ready());

    let mock = mock.lock().unwrap();
    let faces: Vec<&DriverCall> = mock
        .calls
        .iter()
        .filter(|c| matches!(c, DriverCall::AllocateTextureStorage(_)))
        .collect();
    assert_eq!(faces.len(), 6);
    for (call, face) in faces.iter().zip(CubeFace::ALL) {
        match call {
            DriverCall::AllocateTextureStorage(desc) => {
                assert_eq!(desc.target, StorageTarget::CubeFace(face));
                assert_eq!((desc.width, desc.height), (512, 512));
            }
            _ => unreachable!(),
        }
    }
    assert_eq!(mock.count(DriverCallKind::GenerateMipmaps), 1);
    assert!(mock.calls.iter().any(|c| matches!(
        c,
        DriverCall::CreateDepthStencilBuffer { format: DepthStencilFormat::Depth24Stencil8, width: 512, height: 512, .. }
    )));
}

#[test]
fn test_stencil_without_depth_allocates_no_buffer() {
    let (_, context) = context();
    let options = RenderTargetOptions::new().with_depth_buffer(false).with_stencil_buffer(true);

    let wrapper = context.create_cube_render_target(64, &options).unwrap();

    assert!(!wrapper.generate_stencil_buffer());
    assert!(wrapper.depth_stencil_buffer().is_none());
}

#[test]
#[serial]
fn test_zero_size_fails_without_side_effects() {
    let capture = CaptureLogger::install();
    let (mock, context) = context();

    let options = RenderTargetOptions::new().with_pixel_type(PixelType::Float);
    let result = context.create_cube_render_target(0, &options);

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(mock.lock().unwrap().calls.is_empty());
    assert!(context.registry().lock().unwrap().is_empty());
    assert!(capture.entries_from("hal::OptionsResolver").is_empty());

    Hal::reset_logger();
}

#[test]
fn test_context_lost_after_creation() {
    let (mock, context) = context();
    mock.lock().unwrap().set_context_current(false);

    let result = context.create_cube_render_target(64, &RenderTargetOptions::new());

    assert!(matches!(result, Err(Error::ContextInvalid)));
    assert!(mock.lock().unwrap().calls.is_empty());
}

#[test]
#[serial]
fn test_float_downgrade_reaches_driver_as_unsigned_byte() {
    let capture = CaptureLogger::install();
    let caps = CapabilityTable::new(CapabilityFlags::empty(), 4096);
    let (mock, context) = context_with(MockGraphicsDriver::with_capabilities(caps));

    let options = RenderTargetOptions::new()
        .with_pixel_type(PixelType::Float)
        .with_sampling_mode(SamplingMode::Trilinear);
    let wrapper = context.create_cube_render_target(32, &options).unwrap();

    let texture = wrapper.texture().unwrap();
    assert_eq!(texture.pixel_type(), PixelType::UnsignedByte);
    assert_eq!(texture.sampling_mode(), SamplingMode::Trilinear);
    assert_eq!(capture.count("hal::OptionsResolver", LogSeverity::Warn), 1);

    let mock = mock.lock().unwrap();
    assert!(mock.calls.iter().all(|c| match c {
        DriverCall::AllocateTextureStorage(desc) => desc.pixel_type == PixelType::UnsignedByte,
        _ => true,
    }));

    Hal::reset_logger();
}

#[test]
fn test_face_failure_leaves_no_wrapper_and_no_texture() {
    let (mock, context) = context();
    mock.lock()
        .unwrap()
        .fail_on(DriverCallKind::AllocateTextureStorage, 3, Error::OutOfMemory);

    let err = context
        .create_cube_render_target(512, &RenderTargetOptions::new())
        .unwrap_err();

    assert_eq!(err.failed_step(), Some(crate::error::AllocationStep::AllocateFaceStorage(3)));
    assert!(err.is_recoverable());
    assert!(context.registry().lock().unwrap().is_empty());
    let mock = mock.lock().unwrap();
    assert_eq!(mock.live_texture_count(), 0);
    assert_eq!(mock.live_framebuffer_count(), 0);
}

// ============================================================================
// Tests: Dispose and registry sweeps
// ============================================================================

#[test]
fn test_dispose_twice_keeps_attachments_empty() {
    let (mock, context) = context();
    let mut wrapper = context.create_cube_render_target(64, &RenderTargetOptions::new()).unwrap();

    wrapper.dispose().unwrap();
    assert!(wrapper.textures().is_empty());
    wrapper.dispose().unwrap();
    assert!(wrapper.textures().is_empty());

    let mock = mock.lock().unwrap();
    assert_eq!(mock.count(DriverCallKind::DeleteFramebuffer), 1);
    assert_eq!(mock.count(DriverCallKind::DeleteDepthStencilBuffer), 1);
}

#[test]
fn test_sweep_releases_textures_of_disposed_targets() {
    let (mock, context) = context();
    let mut disposed = context.create_cube_render_target(64, &RenderTargetOptions::new()).unwrap();
    let kept = context.create_cube_render_target(64, &RenderTargetOptions::new()).unwrap();

    disposed.dispose().unwrap();
    let released = context.sweep_textures().unwrap();

    assert_eq!(released, 1);
    assert_eq!(context.registry().lock().unwrap().len(), 1);
    assert!(kept.texture().unwrap().is_ready());
    assert_eq!(mock.lock().unwrap().live_texture_count(), 1);
}

#[test]
fn test_release_all_textures_invalidates_live_targets() {
    let (mock, context) = context();
    let wrapper = context.create_cube_render_target(64, &RenderTargetOptions::new()).unwrap();

    assert_eq!(context.release_all_textures().unwrap(), 1);

    assert!(!wrapper.texture().unwrap().is_ready());
    assert!(context.registry().lock().unwrap().is_empty());
    assert_eq!(mock.lock().unwrap().live_texture_count(), 0);
}
