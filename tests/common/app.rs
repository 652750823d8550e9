use axum::Router;

use dance_pose_backend::config::{AnalysisEnvConfig, Config, LimitsConfig};
use dance_pose_backend::routes::build_router;
use dance_pose_backend::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

// 直接构造 Config，避免使用 set_var 造成多线程测试环境变量竞态
fn test_config(limits: LimitsConfig) -> Config {
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 5000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "http://localhost:8501".to_string(),
        limits,
        analysis: AnalysisEnvConfig::default(),
    }
}

fn spawn_with_config(config: Config) -> TestApp {
    let state = AppState::new(&config);
    let app = build_router(state.clone());

    TestApp { app, state, config }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with_config(test_config(LimitsConfig::default()))
}

pub async fn spawn_test_app_with_limits(max_frames: usize, max_body_bytes: usize) -> TestApp {
    spawn_with_config(test_config(LimitsConfig {
        max_frames_per_request: max_frames,
        max_body_bytes,
        max_concurrent_analyses: 2,
    }))
}
