/// Swapchain image acquired by `begin_frame` and not yet presented.
///
/// Holding it blocks acquisition of the next image, so it lives only between
/// `begin_frame` and `swap_buffers` (or is dropped when the context is unbound).
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
