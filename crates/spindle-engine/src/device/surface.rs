use super::platform::ConfigAttribs;

/// What `begin_frame` did about a failed swapchain acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame may succeed.
    Reconfigured,
    /// Transient error; only this frame is lost.
    SkipFrame,
    /// The device is out of memory; every following frame will fail too.
    Fatal,
}

/// Color formats considered for the swapchain, most preferred first.
pub(crate) fn candidate_formats(prefer_srgb: bool) -> [wgpu::TextureFormat; 6] {
    use wgpu::TextureFormat::*;

    if prefer_srgb {
        [Bgra8UnormSrgb, Rgba8UnormSrgb, Bgra8Unorm, Rgba8Unorm, Rgb10a2Unorm, Rgba16Float]
    } else {
        [Bgra8Unorm, Rgba8Unorm, Bgra8UnormSrgb, Rgba8UnormSrgb, Rgb10a2Unorm, Rgba16Float]
    }
}

/// Bits per color channel of the formats in `candidate_formats`.
pub(crate) fn channel_bits(format: wgpu::TextureFormat) -> Option<u8> {
    use wgpu::TextureFormat::*;

    match format {
        Bgra8Unorm | Rgba8Unorm | Bgra8UnormSrgb | Rgba8UnormSrgb => Some(8),
        Rgb10a2Unorm => Some(10),
        Rgba16Float => Some(16),
        _ => None,
    }
}

/// Picks the first candidate that meets `attribs` and that `renderable` accepts.
pub(crate) fn choose_color_format(
    attribs: &ConfigAttribs,
    prefer_srgb: bool,
    renderable: impl Fn(wgpu::TextureFormat) -> bool,
) -> Option<wgpu::TextureFormat> {
    candidate_formats(prefer_srgb).into_iter().find(|&format| {
        channel_bits(format).is_some_and(|bits| attribs.accepts(bits, bits, bits))
            && renderable(format)
    })
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn recover_from_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    err: &wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            surface.configure(device, config);
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        _ => SurfaceErrorAction::SkipFrame,
    }
}
