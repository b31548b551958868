use lanyard::{preset, Camera, FrameInput, FrameStatus, PointerId, Scene, Vec2};
use wasm_bindgen::prelude::*;

// ---- Lanyard Demo ----

/// Browser-facing wrapper: pointer events in, strap buffers and card pose out.
/// The page does its own rendering from `strap_positions`, `strap_indices`
/// and `card_transform`.
#[wasm_bindgen]
pub struct LanyardDemo {
    scene: Scene<f32>,
    camera: Camera<f32>,
}

#[wasm_bindgen]
impl LanyardDemo {
    /// `preset_name` is `"lanyard"` or `"badge"`; `aspect` is canvas width / height.
    #[wasm_bindgen(constructor)]
    pub fn new(preset_name: &str, aspect: f32) -> Result<LanyardDemo, JsValue> {
        let preset = preset::by_name::<f32>(preset_name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown preset {:?}", preset_name)))?;
        let scene = Scene::new(&preset).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("{} demo ready", preset.name);
        Ok(LanyardDemo { scene, camera: preset.camera(aspect) })
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// Start a drag if the pointer is over the card. Returns whether it was.
    pub fn pointer_down(&mut self, pointer_id: u32, ndc_x: f32, ndc_y: f32) -> bool {
        let ray = self.camera.ray(Vec2::new(ndc_x, ndc_y));
        match self.scene.hit_card(&ray) {
            Some(hit) => self.scene.pointer_down(PointerId(pointer_id), hit).is_ok(),
            None => false,
        }
    }

    pub fn pointer_up(&mut self, pointer_id: u32) {
        self.scene.pointer_up(PointerId(pointer_id));
    }

    /// Advance one displayed frame. Returns false while the chain is not ready.
    pub fn frame(&mut self, elapsed: f32, delta: f32, ndc_x: f32, ndc_y: f32) -> bool {
        let input = FrameInput {
            elapsed,
            delta,
            pointer_ndc: Vec2::new(ndc_x, ndc_y),
            camera: self.camera,
        };
        self.scene.frame(&input).status == FrameStatus::Updated
    }

    pub fn is_dragging(&self) -> bool {
        self.scene.strap().drag_state().is_dragging()
    }

    /// Returns flat [x0, y0, z0, x1, y1, z1, ...] strap vertices
    pub fn strap_positions(&self) -> Vec<f32> {
        let positions = &self.scene.strap().geometry().positions;
        let mut out = Vec::with_capacity(positions.len() * 3);
        for p in positions {
            out.extend_from_slice(&p.to_array());
        }
        out
    }

    /// Returns flat [nx0, ny0, nz0, ...]; empty for the ribbon preset.
    pub fn strap_normals(&self) -> Vec<f32> {
        self.scene
            .strap()
            .geometry()
            .normals
            .iter()
            .flat_map(|n| n.to_array())
            .collect()
    }

    /// Triangle indices; empty for the ribbon preset (draw positions as a line).
    pub fn strap_indices(&self) -> Vec<u32> {
        self.scene.strap().geometry().indices.clone()
    }

    pub fn strap_length(&self) -> f32 {
        self.scene.strap().geometry().length
    }

    /// Returns [px, py, pz, qx, qy, qz, qw], or an empty vec if the card is gone.
    pub fn card_transform(&self) -> Vec<f32> {
        match self.scene.card_transform() {
            Some((p, q)) => vec![p.x, p.y, p.z, q.x, q.y, q.z, q.w],
            None => Vec::new(),
        }
    }
}
