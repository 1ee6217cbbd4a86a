/// Arena-wide constants shared by every room.

#[derive(Debug, Clone, Copy)]
pub struct WorldTuning {
    /// Side length of the square world; coordinates run from 0 to this value.
    pub size: f32,

    /// Upper bound for a single tick delta in milliseconds.
    pub max_delta_ms: u64,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            size: 15000.0,
            max_delta_ms: 100,
        }
    }
}
