//! ConvertOptions builder tests.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gifmake::{
    ConvertOptions, FrameRateSpec, GifOptions, GifmakeError, OptimizeMode, Optimizer,
};

struct NamedOptimizer;

impl Optimizer for NamedOptimizer {
    fn name(&self) -> &str {
        "stub-optimizer"
    }

    fn probe(&self) -> bool {
        false
    }

    fn optimize(&self, _path: &Path, _timeout: Duration) -> Result<(), GifmakeError> {
        Ok(())
    }
}

// ── ConvertOptions builder ─────────────────────────────────────────

#[test]
fn config_defaults() {
    let config = ConvertOptions::new();
    let debug = format!("{config:?}");
    assert!(debug.contains("ConvertOptions"));
    assert!(debug.contains("batch_size: 1"));
    assert!(debug.contains("name: None"));
    assert!(debug.contains("max_size: None"));
    assert!(debug.contains("optimizer: \"gifsicle\""));
    assert!(debug.contains("optimizer_timeout: 120s"));

    assert_eq!(config.name(), None);
    assert_eq!(config.frame_rate(), FrameRateSpec::Default);
    assert_eq!(config.optimize_mode(), OptimizeMode::BestEffort);
}

#[test]
fn config_default_trait_matches_new() {
    assert_eq!(
        format!("{:?}", ConvertOptions::default()),
        format!("{:?}", ConvertOptions::new())
    );
}

#[test]
fn config_with_batch_size_clamps_zero() {
    let config = ConvertOptions::new().with_batch_size(0);
    let debug = format!("{config:?}");
    // Clamped to 1.
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn config_builder_chain() {
    let config = ConvertOptions::new()
        .with_name("intro")
        .with_max_size(600)
        .with_frame_rate(FrameRateSpec::FramesPerSecond(24))
        .with_gif_options(GifOptions::new().with_repeat(Some(3)).with_speed(20))
        .with_optimize(OptimizeMode::Required)
        .with_optimizer_timeout(Duration::from_secs(5));

    assert_eq!(config.name(), Some("intro"));
    assert_eq!(config.frame_rate(), FrameRateSpec::FramesPerSecond(24));
    assert_eq!(config.optimize_mode(), OptimizeMode::Required);

    let debug = format!("{config:?}");
    assert!(debug.contains("max_size: Some(600)"));
    assert!(debug.contains("repeat: Some(3)"));
    assert!(debug.contains("speed: 20"));
    assert!(debug.contains("optimizer_timeout: 5s"));
}

#[test]
fn config_debug_names_custom_optimizer() {
    let config = ConvertOptions::new().with_optimizer(Arc::new(NamedOptimizer));
    assert!(format!("{config:?}").contains("stub-optimizer"));
}

#[test]
fn config_is_cloneable() {
    let config = ConvertOptions::new().with_name("a");
    let clone = config.clone().with_name("b");
    assert_eq!(config.name(), Some("a"));
    assert_eq!(clone.name(), Some("b"));
}
