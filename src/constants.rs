/// 首页返回的服务状态消息
pub const HOME_MESSAGE: &str = "Dance Analysis Server is running!";

/// 服务名，用于日志与健康检查
pub const SERVICE_NAME: &str = "dance-pose-backend";

/// 单次请求帧数上限的默认值（30fps 下约 30 分钟）
pub const DEFAULT_MAX_FRAMES_PER_REQUEST: usize = 54_000;

/// 请求体大小上限默认值：64 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// 同时进行的分析任务数默认值
pub const DEFAULT_MAX_CONCURRENT_ANALYSES: usize = 4;
