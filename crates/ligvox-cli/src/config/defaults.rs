use ligvox::engine::config::ComputeConfig;

pub struct DefaultsConfig {
    pub voxel_size: f32,
    pub box_dims: [f32; 3],
    pub views: Vec<String>,
    pub occupancy: String,
    pub parallel: bool,
    pub chunk_size: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            voxel_size: 1.0,
            box_dims: [24.0, 24.0, 24.0],
            views: vec!["volume".to_string(), "basic".to_string()],
            occupancy: "vdw".to_string(),
            parallel: true,
            chunk_size: ComputeConfig::default().chunk_size,
        }
    }
}
