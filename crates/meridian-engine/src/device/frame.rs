/// Target image for one frame.
///
/// Short-lived: acquire, render into `view`, then hand it back to its source
/// to present. Holding a surface drawable blocks acquisition of the next one.
pub struct Drawable {
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    surface_texture: Option<wgpu::SurfaceTexture>,
}

impl Drawable {
    pub(crate) fn offscreen(view: wgpu::TextureView, width: u32, height: u32) -> Self {
        Self {
            view,
            width,
            height,
            surface_texture: None,
        }
    }

    pub(crate) fn surface(surface_texture: wgpu::SurfaceTexture) -> Self {
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            width: surface_texture.texture.width(),
            height: surface_texture.texture.height(),
            view,
            surface_texture: Some(surface_texture),
        }
    }

    /// Presents a surface drawable; offscreen drawables are simply released.
    pub fn present(self) {
        let Drawable {
            view,
            surface_texture,
            ..
        } = self;
        drop(view);
        if let Some(st) = surface_texture {
            st.present();
        }
    }
}
