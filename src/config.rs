use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_CONCURRENT_ANALYSES, DEFAULT_MAX_FRAMES_PER_REQUEST,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub limits: LimitsConfig,
    pub analysis: AnalysisEnvConfig,
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_frames_per_request: usize,
    pub max_body_bytes: usize,
    pub max_concurrent_analyses: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_frames_per_request: DEFAULT_MAX_FRAMES_PER_REQUEST,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_concurrent_analyses: DEFAULT_MAX_CONCURRENT_ANALYSES,
        }
    }
}

/// Server-wide defaults for analysis runs; requests may override them.
#[derive(Debug, Clone)]
pub struct AnalysisEnvConfig {
    pub confidence_floor: f64,
    pub confirm_frames: u32,
    pub release_frames: u32,
    pub rotation_window: usize,
    pub undetermined_tolerance: u32,
}

impl Default for AnalysisEnvConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.5,
            confirm_frames: 3,
            release_frames: 3,
            rotation_window: 5,
            undetermined_tolerance: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let limits = LimitsConfig::default();
        let analysis = AnalysisEnvConfig::default();
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 5000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:8501"),
            limits: LimitsConfig {
                max_frames_per_request: env_or_parse(
                    "MAX_FRAMES_PER_REQUEST",
                    limits.max_frames_per_request,
                ),
                max_body_bytes: env_or_parse("MAX_BODY_BYTES", limits.max_body_bytes),
                max_concurrent_analyses: env_or_parse(
                    "MAX_CONCURRENT_ANALYSES",
                    limits.max_concurrent_analyses,
                ),
            },
            analysis: AnalysisEnvConfig {
                confidence_floor: env_or_parse("POSE_CONFIDENCE_FLOOR", analysis.confidence_floor),
                confirm_frames: env_or_parse("POSE_CONFIRM_FRAMES", analysis.confirm_frames),
                release_frames: env_or_parse("POSE_RELEASE_FRAMES", analysis.release_frames),
                rotation_window: env_or_parse("POSE_ROTATION_WINDOW", analysis.rotation_window),
                undetermined_tolerance: env_or_parse(
                    "POSE_UNDETERMINED_TOLERANCE",
                    analysis.undetermined_tolerance,
                ),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
