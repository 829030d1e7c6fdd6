/// Level-of-detail tuning knobs.
///
/// The derived `max_lod_power = base_lod^(-user_max_lod)` is the
/// projected-area floor used by the view manager: objects whose
/// projected size falls below it render at the coarsest level. The
/// derived value is recomputed on every setter so reads stay cheap.

#[derive(Debug, Clone)]
pub struct LodSettings {
    base_lod: f32,
    user_max_lod: f32,
    parts_threshold: f32,
    max_lod_power: f32,
}

impl LodSettings {
    pub fn new() -> Self {
        let mut settings = Self {
            base_lod: 2.0,
            user_max_lod: 3.6,
            parts_threshold: 1000.0,
            max_lod_power: 0.0,
        };
        settings.update_max_lod_power();
        settings
    }

    pub fn base_lod(&self) -> f32 {
        self.base_lod
    }

    pub fn set_base_lod(&mut self, base: f32) {
        self.base_lod = base;
        self.update_max_lod_power();
    }

    pub fn user_max_lod(&self) -> f32 {
        self.user_max_lod
    }

    pub fn set_user_max_lod(&mut self, lod: f32) {
        self.user_max_lod = lod;
        self.update_max_lod_power();
    }

    /// Scene part count above which hosts may lower `user_max_lod`.
    pub fn parts_threshold(&self) -> f32 {
        self.parts_threshold
    }

    pub fn set_parts_threshold(&mut self, threshold: f32) {
        self.parts_threshold = threshold;
    }

    /// Projected-area floor derived from the current settings.
    pub fn max_lod_power(&self) -> f32 {
        self.max_lod_power
    }

    fn update_max_lod_power(&mut self) {
        self.max_lod_power = self.base_lod.powf(-self.user_max_lod);
    }
}

impl Default for LodSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "realtime_view_tests.rs"]
mod tests;
