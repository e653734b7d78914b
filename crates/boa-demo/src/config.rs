use std::path::PathBuf;

/// Demo settings. Defaults reproduce the reference scene; a few can be
/// overridden from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub shader_dir: PathBuf,
    /// Camera movement per frame while a direction key is held.
    pub camera_step: f32,
    pub context_version: (u8, u8),
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "Adder Physics Engine".to_string(),
            shader_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/res/shaders")),
            camera_step: 4.0,
            context_version: (3, 3),
        }
    }
}

impl DemoConfig {
    pub const ENV_WIDTH: &'static str = "BOA_DEMO_WIDTH";
    pub const ENV_HEIGHT: &'static str = "BOA_DEMO_HEIGHT";
    pub const ENV_SHADER_DIR: &'static str = "BOA_DEMO_SHADER_DIR";

    /// Defaults with overrides from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides found through `lookup`. Invalid values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(w) = parse_dimension(Self::ENV_WIDTH, lookup(Self::ENV_WIDTH)) {
            self.width = w;
        }
        if let Some(h) = parse_dimension(Self::ENV_HEIGHT, lookup(Self::ENV_HEIGHT)) {
            self.height = h;
        }
        if let Some(dir) = lookup(Self::ENV_SHADER_DIR).filter(|d| !d.trim().is_empty()) {
            self.shader_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn vertex_shader(&self) -> PathBuf {
        self.shader_dir.join("shader.vert.wgsl")
    }

    pub fn fragment_shader(&self) -> PathBuf {
        self.shader_dir.join("shader.frag.wgsl")
    }
}

fn parse_dimension(key: &str, value: Option<String>) -> Option<u32> {
    let value = value?;
    match value.trim().parse::<u32>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            log::warn!("ignoring {key}={value:?}: expected a positive integer");
            None
        }
    }
}
