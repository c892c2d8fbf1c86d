use anyhow::Result;

use kestrel_engine::logging;
use kestrel_engine::scene::SceneManager;
use kestrel_engine::window::{Runtime, RuntimeConfig};

mod scenes;

use scenes::{IdleScene, QuadScene};

fn main() -> Result<()> {
    logging::init_logging("info,wgpu=warn");

    let config = RuntimeConfig {
        title: "kestrel demo".to_string(),
        resizable: true,
        vsync: true,
        center_on_start: true,
        ..RuntimeConfig::default()
    };

    let mut scenes = SceneManager::new();
    scenes.register(QuadScene::new());
    scenes.register_with(IdleScene::new);

    Runtime::run(config, scenes)
}
