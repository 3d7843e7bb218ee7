//! 应用配置：从配置文件与环境变量加载
//!
//! 加载顺序：先读配置文件（TOML 或 YAML，按扩展名识别），再用环境变量 `QUILL__*`
//! 覆盖（双下划线表示嵌套，如 `QUILL__LLM__MODEL=qwen2.5`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub novel: NovelSection,
    pub author: AuthorSection,
    pub style: StyleSection,
    pub llm: LlmSection,
    pub rewrite: RewriteSection,
    pub output: OutputSection,
}

/// [novel] 段：作品基本设定
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NovelSection {
    pub title: String,
    pub genre: String,
    pub theme: String,
    /// 目标总字数，正文每部分约为其四分之一
    pub word_count: usize,
    pub target_audience: String,
    /// 参考作家/作品风格，可为空
    pub style_reference: String,
}

impl Default for NovelSection {
    fn default() -> Self {
        Self {
            title: "未命名".to_string(),
            genre: "科幻".to_string(),
            theme: "人与技术".to_string(),
            word_count: 8000,
            target_audience: "青年读者".to_string(),
            style_reference: String::new(),
        }
    }
}

/// [author] 段：作者人设与写作偏好
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthorSection {
    pub role: String,
    pub description: String,
    /// 写作特点列表，逐条拼入系统提示词
    pub preferences: Vec<String>,
}

impl Default for AuthorSection {
    fn default() -> Self {
        Self {
            role: "资深短篇小说作家".to_string(),
            description: "专注于创作高质量的短篇小说。".to_string(),
            preferences: vec![
                "精炼不冗长".to_string(),
                "重视细节描写".to_string(),
                "善用对话刻画人物".to_string(),
            ],
        }
    }
}

/// [style] 段：叙事风格设定
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleSection {
    pub narrative_perspective: String,
    pub tense: String,
    pub tone: String,
    pub dialogue_style: String,
    pub description_focus: Vec<String>,
    pub narrative_technique: Vec<String>,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            narrative_perspective: "第三人称".to_string(),
            tense: "过去时".to_string(),
            tone: "克制而温和".to_string(),
            dialogue_style: "自然口语".to_string(),
            description_focus: vec!["心理".to_string(), "场景氛围".to_string()],
            narrative_technique: vec!["伏笔".to_string(), "象征".to_string()],
        }
    }
}

/// [llm] 段：Ollama 端点与生成参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub temperature: f64,
    pub context_size: u32,
    pub num_predict: i32,
    /// 单次生成调用超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub retry: RetrySection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            port: 11434,
            model: "qwen2.5".to_string(),
            temperature: 0.8,
            context_size: 8192,
            num_predict: 4096,
            request_timeout_secs: default_request_timeout_secs(),
            retry: RetrySection::default(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    300
}

/// [llm.retry] 段：瞬时错误重试（仅 5xx / 超时 / 连接错误）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub max_attempts: u32,
    /// 线性退避步长（秒），第 n 次失败后等待 n * backoff_secs
    pub backoff_secs: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_secs: 1,
        }
    }
}

/// [rewrite] 段：各阶段重写轮数与最终重写阈值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteSection {
    pub outline_rewrites: usize,
    pub character_rewrites: usize,
    pub content_rewrites: usize,
    pub final_rewrites: usize,
    /// 最终重写前对分析质量的最低要求，低于则跳过该轮
    #[serde(default = "default_final_rewrite_min_score")]
    pub final_rewrite_min_score: f64,
}

impl Default for RewriteSection {
    fn default() -> Self {
        Self {
            outline_rewrites: 0,
            character_rewrites: 0,
            content_rewrites: 0,
            final_rewrites: 0,
            final_rewrite_min_score: default_final_rewrite_min_score(),
        }
    }
}

fn default_final_rewrite_min_score() -> f64 {
    0.8
}

/// [output] 段：输出目录与生成篇数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub output_dir: PathBuf,
    #[serde(default = "default_novel_count")]
    pub novel_count: usize,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            novel_count: default_novel_count(),
        }
    }
}

fn default_novel_count() -> usize {
    1
}

/// 从配置文件与环境变量加载配置
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键；YAML 亦可）
/// 3. 最后叠加环境变量 QUILL__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("QUILL")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
